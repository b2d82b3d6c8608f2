use divscan_model::error::SocketError;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

/// Utilised by a [`RestClient`](super::rest::client::RestClient) to deserialise
/// [`RestRequest::Response`](super::rest::request::RestRequest::Response), and upon failure parses
/// API errors returned from the server.
pub trait HttpParser {
    type ApiError: DeserializeOwned;
    type OutputError: From<SocketError>;

    /// Attempt to parse a [`StatusCode`] & bytes payload into a deserialisable `Response`.
    fn parse<Response>(&self, status: StatusCode, payload: &[u8]) -> Result<Response, Self::OutputError>
    where
        Response: DeserializeOwned,
    {
        // Attempt to deserialise reqwest::Response bytes into Ok(Response)
        let parse_ok_error = match serde_json::from_slice::<Response>(payload) {
            Ok(response) => return Ok(response),
            Err(serde_error) => serde_error,
        };

        // Attempt to deserialise API Error if Ok(Response) deserialisation failed
        let parse_api_error_error = match serde_json::from_slice::<Self::ApiError>(payload) {
            Ok(api_error) => return Err(self.parse_api_error(status, api_error)),
            Err(serde_error) => serde_error,
        };

        // Neither the response nor an API error could be deserialised
        tracing::error!(
            %status,
            ?parse_ok_error,
            ?parse_api_error_error,
            response_body = %String::from_utf8_lossy(payload),
            "error deserializing HTTP response"
        );

        Err(Self::OutputError::from(SocketError::DeserializingJson {
            error: parse_ok_error.to_string(),
            payload: String::from_utf8_lossy(payload).into_owned(),
        }))
    }

    /// Map an API error the server returned in place of the expected `Response`.
    fn parse_api_error(&self, status: StatusCode, error: Self::ApiError) -> Self::OutputError;
}

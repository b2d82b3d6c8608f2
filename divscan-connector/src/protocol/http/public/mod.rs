use divscan_model::error::SocketError;

use super::{builder::HttpRequestBuilder, rest::request::RestRequest};

/// [`HttpRequestBuilder`] that builds a non-authenticated Http request with no extra headers.
#[derive(Debug, Copy, Clone)]
pub struct PublicNoHeaders;

impl HttpRequestBuilder for PublicNoHeaders {
    fn build<Request>(&self, _: Request, builder: reqwest::RequestBuilder) -> Result<reqwest::Request, SocketError>
    where
        Request: RestRequest,
    {
        builder.build().map_err(SocketError::from)
    }
}

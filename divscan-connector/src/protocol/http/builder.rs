use divscan_model::error::SocketError;

use super::rest::request::RestRequest;

/// [`RestRequest`] build strategy for the API being interacted with.
///
/// Every API divscan talks to is public, so an implementation only adds the `reqwest` headers the
/// API mandates before building.
pub trait HttpRequestBuilder {
    /// Use a [`RestRequest`] and [`reqwest::RequestBuilder`] to construct a [`reqwest::Request`]
    /// that is ready for executing.
    fn build<Request>(
        &self,
        request: Request,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::Request, SocketError>
    where
        Request: RestRequest;
}

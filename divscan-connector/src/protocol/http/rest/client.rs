use std::{borrow::Cow, time::Instant};

use divscan_model::error::SocketError;
use reqwest::StatusCode;
use tracing::debug;
use url::Url;

use crate::protocol::http::{builder::HttpRequestBuilder, parser::HttpParser};

use super::request::{AsUrlParams, RestRequest};

/// Configurable REST client capable of executing [`RestRequest`]s against one base url.
#[derive(Debug)]
pub struct RestClient<Strategy, Parser> {
    /// HTTP [`reqwest::Client`] for executing signed [`reqwest::Request`]s.
    pub http_client: reqwest::Client,

    /// Base Url of the API being interacted with.
    pub base_url: Cow<'static, str>,

    /// [`RestRequest`] build strategy for the API being interacted with.
    pub strategy: Strategy,

    /// [`HttpParser`] that deserialises [`RestRequest::Response`]s, and upon failure parses
    /// API errors returned from the server.
    pub parser: Parser,
}

impl<Strategy, Parser> RestClient<Strategy, Parser>
where
    Strategy: HttpRequestBuilder,
    Parser: HttpParser,
{
    /// Construct a new [`Self`] using the provided configuration.
    pub fn new<BaseUrl: Into<Cow<'static, str>>>(base_url: BaseUrl, strategy: Strategy, parser: Parser) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.into(),
            strategy,
            parser,
        }
    }

    /// Execute the provided [`RestRequest`].
    pub async fn execute<Request>(&self, request: Request) -> Result<Request::Response, Parser::OutputError>
    where
        Request: RestRequest,
    {
        // Use provided Request to construct a signed reqwest::Request
        let request = self.build(request)?;

        // Measure request execution
        let (status, payload) = self.measured_execution(request).await?;

        // Attempt to parse API Success or Error response
        self.parser.parse::<Request::Response>(status, &payload)
    }

    /// Use the provided [`RestRequest`] to construct a [`reqwest::Request`].
    pub fn build<Request>(&self, request: Request) -> Result<reqwest::Request, SocketError>
    where
        Request: RestRequest,
    {
        let mut url = Url::parse(&format!("{}{}", self.base_url, request.path()))?;
        if let Some(query_params) = request.query_params() {
            let query = query_params.to_url_params();
            if !query.is_empty() {
                url.set_query(Some(&query));
            }
        }

        let mut builder = self
            .http_client
            .request(Request::method(), url)
            .timeout(Request::timeout());

        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        self.strategy.build(request, builder)
    }

    /// Execute the built [`reqwest::Request`] and return the status and raw payload.
    pub async fn measured_execution(&self, request: reqwest::Request) -> Result<(StatusCode, Vec<u8>), SocketError> {
        let method = request.method().clone();
        let host = request.url().host_str().unwrap_or_default().to_owned();

        let start = Instant::now();
        let response = self.http_client.execute(request).await?;
        let duration = start.elapsed();

        let status = response.status();
        let payload = response.bytes().await?.to_vec();

        debug!(%method, %host, %status, ?duration, bytes = payload.len(), "executed http request");

        Ok((status, payload))
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;
    use crate::protocol::http::public::PublicNoHeaders;

    #[derive(Debug, Deserialize)]
    struct Empty {}

    struct NoopParser;

    impl HttpParser for NoopParser {
        type ApiError = Empty;
        type OutputError = SocketError;

        fn parse_api_error(&self, status: StatusCode, _: Self::ApiError) -> Self::OutputError {
            SocketError::HttpResponse(status, String::new())
        }
    }

    struct Params {
        query: &'static str,
    }

    impl AsUrlParams for Params {
        fn to_url_params(&self) -> String {
            self.query.to_owned()
        }
    }

    struct Ping {
        params: Params,
    }

    impl RestRequest for Ping {
        type Response = Empty;
        type QueryParams = Params;
        type Body = ();

        fn path(&self) -> Cow<'static, str> {
            Cow::Borrowed("/api/v5/public/time")
        }

        fn method() -> reqwest::Method {
            reqwest::Method::GET
        }

        fn query_params(&self) -> Option<&Self::QueryParams> {
            Some(&self.params)
        }
    }

    #[test]
    fn test_build_appends_path_and_query() {
        struct TestCase {
            query: &'static str,
            expected: &'static str,
        }

        let cases = vec![
            TestCase {
                query: "instId=BTC-USDT&bar=1W",
                expected: "https://www.okx.com/api/v5/public/time?instId=BTC-USDT&bar=1W",
            },
            TestCase {
                query: "",
                expected: "https://www.okx.com/api/v5/public/time",
            },
        ];

        let client = RestClient::new("https://www.okx.com", PublicNoHeaders, NoopParser);
        for (i, test_case) in cases.into_iter().enumerate() {
            let request = client
                .build(Ping {
                    params: Params { query: test_case.query },
                })
                .unwrap();

            assert_eq!(request.method(), &reqwest::Method::GET, "Test case {} failed", i);
            assert_eq!(request.url().as_str(), test_case.expected, "Test case {} failed", i);
        }
    }

    #[test]
    fn test_build_rejects_invalid_base_url() {
        let client = RestClient::new("not a url", PublicNoHeaders, NoopParser);
        let actual = client.build(Ping {
            params: Params { query: "" },
        });

        assert!(matches!(actual, Err(SocketError::UrlParse(_))));
    }
}

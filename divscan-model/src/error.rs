use thiserror::Error;

#[derive(Error, Debug)]
pub enum SocketError {
    #[error("Deserializing JSON error: {error} for payload: {payload}")]
    DeserializingJson {
        error: String,
        payload: String,
    },

    #[error("error parsing Url: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("HTTP request timed out")]
    HttpTimeout(reqwest::Error),

    /// REST http response error
    #[error("HTTP response (status={0}) error: {1}")]
    HttpResponse(reqwest::StatusCode, String),

    #[error("consumed error message from exchange: {0}")]
    Exchange(String),
}

impl From<reqwest::Error> for SocketError {
    fn from(error: reqwest::Error) -> Self {
        match error {
            error if error.is_timeout() => SocketError::HttpTimeout(error),
            error => SocketError::Http(error),
        }
    }
}

#[derive(Error, Debug)]
pub enum DataError {
    #[error("Socket error: {0}")]
    Socket(#[from] SocketError),

    #[error("NonMonotonicSeries: bar {index} does not follow on from the previous bar")]
    NonMonotonicSeries { index: usize },

    #[error("MalformedBar: {0}")]
    MalformedBar(String),
}

impl DataError {
    /// Determine if an error is worth retrying on the next scan rather than a defect in the data.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            DataError::Socket(SocketError::HttpTimeout(_) | SocketError::Http(_))
        )
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported timeframe: {0}")]
pub struct TimeframeParseError(pub String);

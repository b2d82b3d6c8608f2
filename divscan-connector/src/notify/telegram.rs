use std::{borrow::Cow, fmt};

use async_trait::async_trait;
use divscan_core::notify::{Notifier, NotifyError};
use divscan_model::error::SocketError;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::protocol::http::{
    parser::HttpParser,
    public::PublicNoHeaders,
    rest::{client::RestClient, request::RestRequest},
};

pub const REST_BASE_URL_TELEGRAM: &str = "https://api.telegram.org";

/// Body of the Bot API `sendMessage` method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendMessageBody {
    pub chat_id: String,
    pub text: String,
    pub parse_mode: &'static str,
}

#[derive(Debug, Clone)]
pub struct SendMessage {
    token: String,
    body: SendMessageBody,
}

impl RestRequest for SendMessage {
    type Response = TelegramResponse;
    type QueryParams = ();
    type Body = SendMessageBody;

    fn path(&self) -> Cow<'static, str> {
        Cow::Owned(format!("/bot{}/sendMessage", self.token))
    }

    fn method() -> reqwest::Method {
        reqwest::Method::POST
    }

    fn body(&self) -> Option<&Self::Body> {
        Some(&self.body)
    }
}

/// Successful Bot API response. The sent message is not needed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TelegramResponse {
    pub ok: bool,
    pub result: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TelegramApiError {
    pub ok: bool,
    #[serde(default)]
    pub error_code: Option<u16>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Copy, Clone)]
pub struct TelegramParser;

impl HttpParser for TelegramParser {
    type ApiError = TelegramApiError;
    type OutputError = SocketError;

    fn parse_api_error(&self, status: StatusCode, error: Self::ApiError) -> Self::OutputError {
        let status = error
            .error_code
            .and_then(|code| StatusCode::from_u16(code).ok())
            .unwrap_or(status);
        SocketError::HttpResponse(status, error.description)
    }
}

/// Delivers scan messages to one Telegram chat through the Bot API.
pub struct TelegramNotifier {
    rest: RestClient<PublicNoHeaders, TelegramParser>,
    token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(token: String, chat_id: String) -> Self {
        Self::with_base_url(REST_BASE_URL_TELEGRAM, token, chat_id)
    }

    pub fn with_base_url(base_url: &str, token: String, chat_id: String) -> Self {
        Self {
            rest: RestClient::new(base_url.to_owned(), PublicNoHeaders, TelegramParser),
            token,
            chat_id,
        }
    }

    fn request(&self, message: &str) -> SendMessage {
        SendMessage {
            token: self.token.clone(),
            body: SendMessageBody {
                chat_id: self.chat_id.clone(),
                text: message.to_owned(),
                parse_mode: "Markdown",
            },
        }
    }
}

impl fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("base_url", &self.rest.base_url)
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, message: &str) -> Result<(), NotifyError> {
        match self.rest.execute(self.request(message)).await {
            Ok(response) if response.ok => Ok(()),
            Ok(_) => Err(NotifyError::Rejected {
                status: StatusCode::OK.as_u16(),
                body: "ok=false".to_owned(),
            }),
            Err(SocketError::HttpResponse(status, body)) => Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            }),
            Err(error) => Err(NotifyError::Delivery(strip_url(error).to_string())),
        }
    }
}

/// The request url embeds the bot token.
fn strip_url(error: SocketError) -> SocketError {
    match error {
        SocketError::Http(error) => SocketError::Http(error.without_url()),
        SocketError::HttpTimeout(error) => SocketError::HttpTimeout(error.without_url()),
        other => other,
    }
}

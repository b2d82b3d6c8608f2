use std::env;

use async_trait::async_trait;
use divscan_core::notify::{Notifier, NotifyError};
use tracing::{info, warn};

use self::{console::ConsoleNotifier, telegram::TelegramNotifier};

pub mod console;
pub mod telegram;

pub const ENV_TELEGRAM_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
pub const ENV_TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

/// Notifier chosen at startup: Telegram when credentials are present, stdout otherwise.
#[derive(Debug)]
pub enum ChatNotifier {
    Telegram(TelegramNotifier),
    Console(ConsoleNotifier),
}

impl ChatNotifier {
    pub fn from_env() -> Self {
        Self::from_credentials(env::var(ENV_TELEGRAM_BOT_TOKEN).ok(), env::var(ENV_TELEGRAM_CHAT_ID).ok())
    }

    pub fn from_credentials(token: Option<String>, chat_id: Option<String>) -> Self {
        let token = token.filter(|token| !token.trim().is_empty());
        let chat_id = chat_id.filter(|chat_id| !chat_id.trim().is_empty());

        match (token, chat_id) {
            (Some(token), Some(chat_id)) => {
                info!(%chat_id, "notifying through telegram");
                Self::Telegram(TelegramNotifier::new(token, chat_id))
            }
            _ => {
                warn!(
                    "{} or {} not set, printing notifications to stdout",
                    ENV_TELEGRAM_BOT_TOKEN, ENV_TELEGRAM_CHAT_ID
                );
                Self::Console(ConsoleNotifier)
            }
        }
    }
}

#[async_trait]
impl Notifier for ChatNotifier {
    async fn notify(&self, message: &str) -> Result<(), NotifyError> {
        match self {
            Self::Telegram(notifier) => notifier.notify(message).await,
            Self::Console(notifier) => notifier.notify(message).await,
        }
    }
}

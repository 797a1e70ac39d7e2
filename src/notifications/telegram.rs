use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::NotificationError;

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    disable_web_page_preview: bool,
}

#[derive(Deserialize)]
struct SendMessageResponse {
    ok: bool,
    description: Option<String>,
}

/// Posts messages to a chat through the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramTransport {
    client: reqwest::Client,
    api_base: String,
    bot_token: Option<String>,
    chat_id: Option<String>,
}

impl fmt::Debug for TelegramTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The token is part of the request URL; keep it out of logs
        f.debug_struct("TelegramTransport")
            .field("api_base", &self.api_base)
            .field("chat_id", &self.chat_id)
            .field("has_token", &self.bot_token.is_some())
            .finish()
    }
}

impl TelegramTransport {
    pub fn new(
        api_base: impl Into<String>,
        bot_token: Option<String>,
        chat_id: Option<String>,
        timeout: Duration,
    ) -> Result<Self, NotificationError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            bot_token: bot_token.filter(|token| !token.trim().is_empty()),
            chat_id: chat_id.filter(|chat| !chat.trim().is_empty()),
        })
    }

    pub fn chat_id(&self) -> Option<&str> {
        self.chat_id.as_deref()
    }

    /// Send `text` once. No retries.
    pub async fn send(&self, text: &str) -> Result<(), NotificationError> {
        let (Some(bot_token), Some(chat_id)) = (&self.bot_token, &self.chat_id) else {
            return Err(NotificationError::MissingCredentials("Telegram"));
        };

        let url = format!("{}/bot{bot_token}/sendMessage", self.api_base);

        let response: SendMessageResponse = self
            .client
            .post(url)
            .json(&SendMessage {
                chat_id,
                text,
                disable_web_page_preview: true,
            })
            .send()
            .await
            .map_err(reqwest::Error::without_url)?
            .json()
            .await
            .map_err(reqwest::Error::without_url)?;

        if response.ok {
            trace!(chat_id = %chat_id, "Telegram message delivered");
            Ok(())
        } else {
            Err(NotificationError::Rejected(
                response
                    .description
                    .unwrap_or_else(|| "no description".to_string()),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_credentials_are_reported_not_sent() {
        let transport = TelegramTransport::new(
            "http://127.0.0.1:9",
            None,
            Some("-100123".to_string()),
            Duration::from_secs(1),
        )
        .unwrap();

        let error = transport.send("hello").await.unwrap_err();
        assert!(matches!(error, NotificationError::MissingCredentials("Telegram")));
    }

    #[tokio::test]
    async fn test_blank_credentials_count_as_missing() {
        let transport = TelegramTransport::new(
            "http://127.0.0.1:9",
            Some("  ".to_string()),
            Some("-100123".to_string()),
            Duration::from_secs(1),
        )
        .unwrap();

        assert!(transport.send("hello").await.is_err());
    }

    #[test]
    fn test_debug_hides_token() {
        let transport = TelegramTransport::new(
            "https://api.telegram.org/",
            Some("123:secret".to_string()),
            Some("-100123".to_string()),
            Duration::from_secs(1),
        )
        .unwrap();

        let debug = format!("{transport:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("https://api.telegram.org\""));
    }
}

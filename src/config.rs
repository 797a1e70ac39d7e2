use serde::{Deserialize, Deserializer, Serialize};

use lettre::message::Mailbox;

pub use crate::rate_limiting::RateLimitConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub tracing: TracingConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub notifications: NotificationConfig,
    #[serde(default)]
    pub rate_limiting: RateLimitConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TracingConfig {
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    /// Take the client address from `X-Forwarded-For` / `X-Real-IP`.
    /// Only safe behind a proxy that overwrites those headers.
    #[serde(default)]
    pub trust_forwarded_for: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// How long a submission waits on its notification before abandoning it
    #[serde(default = "default_notification_timeout")]
    pub timeout_secs: u64,
    pub transport: NotificationTransportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NotificationTransportConfig {
    /// Captures notifications in memory
    Mock,
    /// Telegram Bot API. Missing credentials are reported on every send
    /// instead of failing startup.
    Telegram {
        bot_token: Option<String>,
        chat_id: Option<String>,
        #[serde(default = "default_telegram_api_base")]
        api_base: String,
    },
    /// Mail to the back-office inbox
    Smtp {
        host: String,
        port: u16,
        #[serde(deserialize_with = "deserialize_mailbox")]
        sender: Mailbox,
        #[serde(deserialize_with = "deserialize_mailbox")]
        recipient: Mailbox,
        username: Option<String>,
        password: Option<String>,
        #[serde(default = "default_use_tls")]
        use_tls: bool,
    },
}

fn deserialize_mailbox<'de, D>(deserializer: D) -> Result<Mailbox, D::Error>
where
    D: Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    s.parse().map_err(serde::de::Error::custom)
}

fn default_use_tls() -> bool {
    true
}

const fn default_notification_timeout() -> u64 {
    5
}

fn default_telegram_api_base() -> String {
    "https://api.telegram.org".to_string()
}

use std::{
    fmt::{self, Debug},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use tracing::debug;

use super::{
    format_record, DispatchOutcome, NotificationError, NotificationMessage, SmtpSettings,
    SmtpTransport, TelegramTransport,
};
use crate::{
    config::{NotificationConfig, NotificationTransportConfig},
    persistence::PersistedRecord,
};

const MOCK_DESTINATION: &str = "mock";

/// Mock transport that captures notifications for testing.
///
/// Can be told to fail or to stall, so callers can exercise the paths where
/// the back office is unreachable.
#[derive(Clone, Default)]
pub struct MockTransport {
    messages: Arc<Mutex<Vec<NotificationMessage>>>,
    fail: Arc<AtomicBool>,
    delay: Arc<Mutex<Option<Duration>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following send fail.
    pub fn fail_sends(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Wait `delay` before each following send completes.
    pub fn delay_sends(&self, delay: Option<Duration>) {
        *self.delay.lock().unwrap_or_else(|e| e.into_inner()) = delay;
    }

    async fn send(&self, text: &str) -> Result<(), NotificationError> {
        let delay = *self.delay.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail.load(Ordering::SeqCst) {
            return Err(NotificationError::Mock);
        }

        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(NotificationMessage {
                destination: MOCK_DESTINATION.to_string(),
                text: text.to_string(),
            });
        Ok(())
    }

    pub fn messages(&self) -> Vec<NotificationMessage> {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn clear(&self) {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

/// Delivers submission notifications over the configured channel.
#[derive(Clone)]
pub enum Notifier {
    Telegram(TelegramTransport),
    Smtp(SmtpTransport),
    /// Captures notifications in memory
    Mock(MockTransport),
}

impl Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Telegram(transport) => f.debug_tuple("Notifier::Telegram").field(transport).finish(),
            Self::Smtp(transport) => f.debug_tuple("Notifier::Smtp").field(transport).finish(),
            Self::Mock(_) => f.debug_tuple("Notifier::Mock").finish(),
        }
    }
}

impl Notifier {
    pub fn mock() -> Self {
        Self::Mock(MockTransport::new())
    }

    pub fn from_config(config: &NotificationConfig) -> Result<Self, NotificationError> {
        let timeout = Duration::from_secs(config.timeout_secs);

        match &config.transport {
            NotificationTransportConfig::Mock => Ok(Self::mock()),
            NotificationTransportConfig::Telegram {
                bot_token,
                chat_id,
                api_base,
            } => Ok(Self::Telegram(TelegramTransport::new(
                api_base.as_str(),
                bot_token.clone(),
                chat_id.clone(),
                timeout,
            )?)),
            NotificationTransportConfig::Smtp {
                host,
                port,
                sender,
                recipient,
                username,
                password,
                use_tls,
            } => Ok(Self::Smtp(SmtpTransport::new(SmtpSettings {
                host,
                port: *port,
                sender: sender.clone(),
                recipient: recipient.clone(),
                username: username.as_deref(),
                password: password.as_deref(),
                use_tls: *use_tls,
                timeout,
            })?)),
        }
    }

    /// Where notifications end up, for logs.
    pub fn destination(&self) -> String {
        match self {
            Self::Telegram(transport) => format!(
                "telegram:{}",
                transport.chat_id().unwrap_or("<unconfigured>")
            ),
            Self::Smtp(transport) => format!("smtp:{}", transport.recipient()),
            Self::Mock(_) => MOCK_DESTINATION.to_string(),
        }
    }

    pub async fn send(&self, text: &str) -> Result<(), NotificationError> {
        match self {
            Self::Telegram(transport) => transport.send(text).await,
            Self::Smtp(transport) => transport.send(text).await,
            Self::Mock(transport) => transport.send(text).await,
        }
    }

    /// Format and send the notification for a stored record.
    ///
    /// Never fails; the outcome says whether the message went out.
    pub async fn dispatch(
        &self,
        record: &PersistedRecord,
        tour_name: Option<&str>,
    ) -> DispatchOutcome {
        let text = format_record(record, tour_name);

        match self.send(&text).await {
            Ok(()) => {
                debug!(record_id = %record.id, destination = %self.destination(), "Notification sent");
                DispatchOutcome {
                    success: true,
                    message: format!("Notification sent to {}", self.destination()),
                }
            }
            Err(error) => DispatchOutcome {
                success: false,
                message: error.to_string(),
            },
        }
    }

    /// Captured notifications. `None` for real transports.
    pub fn messages(&self) -> Option<Vec<NotificationMessage>> {
        match self {
            Self::Mock(transport) => Some(transport.messages()),
            Self::Telegram(_) | Self::Smtp(_) => None,
        }
    }

    pub fn clear_messages(&self) {
        if let Self::Mock(transport) = self {
            transport.clear();
        }
    }

    pub fn mock_transport(&self) -> Option<&MockTransport> {
        match self {
            Self::Mock(transport) => Some(transport),
            Self::Telegram(_) | Self::Smtp(_) => None,
        }
    }
}

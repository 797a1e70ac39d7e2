//! Back-office notifications about new submissions.
//!
//! Sending is best effort: [`Notifier::dispatch`] never returns an error, it
//! reports the outcome so the caller can log it.

use serde::Serialize;
use thiserror::Error;

pub mod formatter;
mod notifier;
mod smtp;
mod telegram;

pub use formatter::format_record;
pub use notifier::{MockTransport, Notifier};
pub use smtp::{SmtpSettings, SmtpTransport};
pub use telegram::TelegramTransport;

/// A rendered notification and where it went.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationMessage {
    pub destination: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("{0} credentials are not configured")]
    MissingCredentials(&'static str),
    #[error("Failed to reach the messaging endpoint: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Messaging endpoint rejected the message: {0}")]
    Rejected(String),
    #[error("Failed to build email: {0}")]
    EmailBuilder(#[from] lettre::error::Error),
    #[error("Failed to send email: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
    #[error("Mock transport failure")]
    Mock,
}

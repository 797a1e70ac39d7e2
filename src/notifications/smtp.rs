use std::fmt::{self, Debug};

use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use super::NotificationError;

const DEFAULT_SUBJECT: &str = "New website submission";

/// Mails notifications to the back-office inbox.
#[derive(Clone)]
pub struct SmtpTransport {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
    recipient: Mailbox,
}

impl Debug for SmtpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpTransport")
            .field("sender", &self.sender.to_string())
            .field("recipient", &self.recipient.to_string())
            .finish_non_exhaustive()
    }
}

pub struct SmtpSettings<'a> {
    pub host: &'a str,
    pub port: u16,
    pub sender: Mailbox,
    pub recipient: Mailbox,
    pub username: Option<&'a str>,
    pub password: Option<&'a str>,
    pub use_tls: bool,
    pub timeout: std::time::Duration,
}

impl SmtpTransport {
    pub fn new(settings: SmtpSettings<'_>) -> Result<Self, NotificationError> {
        let mut builder = if settings.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::relay(settings.host)?.port(settings.port)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(settings.host)
                .port(settings.port)
        };

        if let (Some(username), Some(password)) = (settings.username, settings.password) {
            builder = builder.credentials(Credentials::new(
                username.to_string(),
                password.to_string(),
            ));
        }

        Ok(Self {
            transport: builder.timeout(Some(settings.timeout)).build(),
            sender: settings.sender,
            recipient: settings.recipient,
        })
    }

    pub fn recipient(&self) -> String {
        self.recipient.to_string()
    }

    /// The first line of `text` becomes the subject.
    pub async fn send(&self, text: &str) -> Result<(), NotificationError> {
        let subject = text
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or(DEFAULT_SUBJECT);

        let email = Message::builder()
            .from(self.sender.clone())
            .to(self.recipient.clone())
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(text.to_string())?;

        self.transport.send(email).await?;

        Ok(())
    }
}

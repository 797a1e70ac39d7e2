use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use validator::Validate;

use super::{lenient, normalized_email, trimmed, trimmed_optional, FieldErrors};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ContactSubject {
    General,
    TourBooking,
    AirportTransfer,
    Feedback,
}

impl ContactSubject {
    pub const fn label(self) -> &'static str {
        match self {
            Self::General => "General inquiry",
            Self::TourBooking => "Tour booking",
            Self::AirportTransfer => "Airport transfer",
            Self::Feedback => "Feedback",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ContactForm {
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    #[serde(deserialize_with = "lenient::text")]
    pub email: String,
    #[validate(length(min = 10, message = "Phone number must be at least 10 characters"))]
    #[serde(deserialize_with = "lenient::optional_text")]
    pub phone: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub subject: String,
    #[validate(length(min = 10, max = 1000, message = "Message must be between 10 and 1000 characters"))]
    #[serde(deserialize_with = "lenient::text")]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: ContactSubject,
    pub message: String,
}

impl ContactForm {
    fn sanitized(&self) -> Self {
        Self {
            name: trimmed(&self.name),
            email: normalized_email(&self.email),
            phone: trimmed_optional(self.phone.as_deref()),
            subject: self.subject.trim().to_string(),
            message: trimmed(&self.message),
        }
    }

    pub fn validate_form(&self) -> Result<ContactMessage, FieldErrors> {
        let form = self.sanitized();
        let mut errors = FieldErrors::from_rules(&form);

        let subject = form.subject.parse::<ContactSubject>().ok();
        if subject.is_none() {
            errors.add("subject", "Please choose a subject");
        }

        match subject {
            Some(subject) if errors.is_empty() => Ok(ContactMessage {
                name: form.name,
                email: form.email,
                phone: form.phone,
                subject,
                message: form.message,
            }),
            _ => Err(errors),
        }
    }
}

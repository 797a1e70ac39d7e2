//! Public submission forms.
//!
//! Every form arrives as a lenient raw struct (missing or mistyped fields
//! deserialize to empty or invalid values so they surface as field errors
//! rather than as a JSON rejection) and is turned into a sanitized, typed [`Submission`] by its own
//! validator.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

pub mod airport_pickup;
pub mod contact;
pub mod field_errors;
pub mod lenient;
pub mod newsletter;
pub mod tour_booking;

pub use airport_pickup::{AirportPickup, AirportPickupForm, FlightLeg, ServiceType};
pub use contact::{ContactForm, ContactMessage, ContactSubject};
pub use field_errors::FieldErrors;
pub use lenient::WholeNumber;
pub use newsletter::{NewsletterForm, NewsletterSignup};
pub use tour_booking::{TourBooking, TourBookingForm};

/// Messages shared by the contact fields of every form.
pub const NAME_MESSAGE: &str = "Name must be between 2 and 100 characters";
pub const EMAIL_MESSAGE: &str = "Please enter a valid email address";
pub const PHONE_MESSAGE: &str = "Phone number must be at least 10 characters";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FormKind {
    TourBooking,
    AirportPickup,
    Contact,
    Newsletter,
}

impl FormKind {
    pub const ALL: [Self; 4] = [
        Self::TourBooking,
        Self::AirportPickup,
        Self::Contact,
        Self::Newsletter,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TourBooking => "tour_booking",
            Self::AirportPickup => "airport_pickup",
            Self::Contact => "contact",
            Self::Newsletter => "newsletter",
        }
    }

    /// Used in rate limit messages: "Too many {noun} attempts".
    pub const fn attempt_noun(self) -> &'static str {
        match self {
            Self::TourBooking => "booking",
            Self::AirportPickup => "airport pickup",
            Self::Contact => "contact",
            Self::Newsletter => "signup",
        }
    }
}

/// A raw form as submitted, tagged by `form_type`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "form_type", rename_all = "snake_case")]
pub enum SubmissionForm {
    TourBooking(TourBookingForm),
    AirportPickup(AirportPickupForm),
    Contact(ContactForm),
    Newsletter(NewsletterForm),
}

impl SubmissionForm {
    pub const fn kind(&self) -> FormKind {
        match self {
            Self::TourBooking(_) => FormKind::TourBooking,
            Self::AirportPickup(_) => FormKind::AirportPickup,
            Self::Contact(_) => FormKind::Contact,
            Self::Newsletter(_) => FormKind::Newsletter,
        }
    }

    /// The address used as the second rate limit dimension, as submitted.
    pub fn contact_email(&self) -> &str {
        match self {
            Self::TourBooking(form) => &form.email,
            Self::AirportPickup(form) => &form.email,
            Self::Contact(form) => &form.email,
            Self::Newsletter(form) => &form.email,
        }
    }

    /// Validate against `today` (the server's local date).
    pub fn validate(self, today: NaiveDate) -> Result<Submission, FieldErrors> {
        match self {
            Self::TourBooking(form) => form.validate_form(today).map(Submission::TourBooking),
            Self::AirportPickup(form) => form.validate_form().map(Submission::AirportPickup),
            Self::Contact(form) => form.validate_form().map(Submission::Contact),
            Self::Newsletter(form) => form.validate_form().map(Submission::Newsletter),
        }
    }
}

/// A validated, sanitized submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "form_type", rename_all = "snake_case")]
pub enum Submission {
    TourBooking(TourBooking),
    AirportPickup(AirportPickup),
    Contact(ContactMessage),
    Newsletter(NewsletterSignup),
}

impl Submission {
    pub const fn kind(&self) -> FormKind {
        match self {
            Self::TourBooking(_) => FormKind::TourBooking,
            Self::AirportPickup(_) => FormKind::AirportPickup,
            Self::Contact(_) => FormKind::Contact,
            Self::Newsletter(_) => FormKind::Newsletter,
        }
    }

    pub fn contact_email(&self) -> &str {
        match self {
            Self::TourBooking(booking) => &booking.email,
            Self::AirportPickup(pickup) => &pickup.email,
            Self::Contact(message) => &message.email,
            Self::Newsletter(signup) => &signup.email,
        }
    }
}

pub(crate) fn trimmed(value: &str) -> String {
    value.trim().to_string()
}

/// Trim, mapping blank values to `None`.
pub(crate) fn trimmed_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

pub(crate) fn normalized_email(value: &str) -> String {
    value.trim().to_lowercase()
}

/// `YYYY-MM-DD`
pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// `HH:MM`, seconds optional.
pub(crate) fn parse_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_kind_round_trips_through_strings() {
        for kind in FormKind::ALL {
            assert_eq!(kind.to_string(), kind.as_str());
            assert_eq!(kind.as_str().parse::<FormKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_submission_form_dispatches_on_form_type() {
        let form: SubmissionForm = serde_json::from_value(serde_json::json!({
            "form_type": "newsletter",
            "email": "Reader@Example.com"
        }))
        .unwrap();

        assert_eq!(form.kind(), FormKind::Newsletter);
        assert_eq!(form.contact_email(), "Reader@Example.com");

        let submission = form
            .validate(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap())
            .unwrap();
        assert_eq!(submission.contact_email(), "reader@example.com");
    }

    #[test]
    fn test_missing_fields_become_field_errors() {
        let form: SubmissionForm =
            serde_json::from_value(serde_json::json!({ "form_type": "contact" })).unwrap();

        let errors = form
            .validate(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap())
            .unwrap_err();

        assert!(errors.contains("name"));
        assert!(errors.contains("email"));
        assert!(errors.contains("subject"));
        assert!(errors.contains("message"));
    }

    #[test]
    fn test_time_accepts_optional_seconds() {
        assert!(parse_time("14:30").is_some());
        assert!(parse_time("14:30:00").is_some());
        assert!(parse_time("2pm").is_none());
    }
}

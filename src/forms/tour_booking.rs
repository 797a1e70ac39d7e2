use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{
    lenient::{self, WholeNumber},
    normalized_email, parse_date, trimmed, trimmed_optional, FieldErrors,
};

pub const MAX_GUESTS: u8 = 20;
const GUESTS_MESSAGE: &str = "Number of guests must be between 1 and 20";

/// Tour booking as submitted by the booking widget.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct TourBookingForm {
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    #[serde(deserialize_with = "lenient::text")]
    pub email: String,
    #[validate(length(min = 10, message = "Phone number must be at least 10 characters"))]
    #[serde(deserialize_with = "lenient::text")]
    pub phone: String,
    #[validate(length(min = 1, message = "Please select a tour"))]
    #[serde(deserialize_with = "lenient::text")]
    pub tour_id: String,
    /// `YYYY-MM-DD`, checked by hand against the current date
    #[serde(deserialize_with = "lenient::text")]
    pub date: String,
    pub guests: WholeNumber,
    #[validate(length(max = 1000, message = "Special requests must be at most 1000 characters"))]
    #[serde(deserialize_with = "lenient::optional_text")]
    pub special_requests: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TourBooking {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub tour_id: String,
    pub date: NaiveDate,
    pub guests: u8,
    pub special_requests: Option<String>,
}

impl TourBookingForm {
    fn sanitized(&self) -> Self {
        Self {
            name: trimmed(&self.name),
            email: normalized_email(&self.email),
            phone: trimmed(&self.phone),
            tour_id: trimmed(&self.tour_id),
            date: trimmed(&self.date),
            guests: self.guests,
            special_requests: trimmed_optional(self.special_requests.as_deref()),
        }
    }

    /// The booking date must fall strictly after `today`.
    pub fn validate_form(&self, today: NaiveDate) -> Result<TourBooking, FieldErrors> {
        let form = self.sanitized();
        let mut errors = FieldErrors::from_rules(&form);

        let date = if form.date.is_empty() {
            errors.add("date", "Please choose a tour date");
            None
        } else {
            match parse_date(&form.date) {
                Some(date) if date > today => Some(date),
                Some(_) => {
                    errors.add("date", "Tour date must be in the future");
                    None
                }
                None => {
                    errors.add("date", "Please choose a valid date");
                    None
                }
            }
        };

        let guests = form
            .guests
            .within("guests", 1..=MAX_GUESTS, GUESTS_MESSAGE, &mut errors);

        match (date, guests) {
            (Some(date), Some(guests)) if errors.is_empty() => Ok(TourBooking {
                name: form.name,
                email: form.email,
                phone: form.phone,
                tour_id: form.tour_id,
                date,
                guests,
                special_requests: form.special_requests,
            }),
            _ => Err(errors),
        }
    }
}

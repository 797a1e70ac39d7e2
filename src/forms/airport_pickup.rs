use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use validator::Validate;

use super::{
    lenient::{self, WholeNumber},
    normalized_email, parse_date, parse_time, trimmed, trimmed_optional, FieldErrors,
};

/// Flat fee for a one-way transfer, in whole US dollars.
pub const ONE_WAY_PRICE: u32 = 25;
/// Flat fee for arrival plus departure transfers.
pub const ROUND_TRIP_PRICE: u32 = 45;

pub const MAX_PASSENGERS: u8 = 10;
const PASSENGERS_MESSAGE: &str = "Number of passengers must be between 1 and 10";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ServiceType {
    /// Airport to hotel on arrival
    Pickup,
    /// Hotel to airport on departure
    Dropoff,
    Both,
}

impl ServiceType {
    pub const fn needs_arrival(self) -> bool {
        matches!(self, Self::Pickup | Self::Both)
    }

    pub const fn needs_departure(self) -> bool {
        matches!(self, Self::Dropoff | Self::Both)
    }

    /// Price is derived from the service, never taken from the client, and
    /// does not depend on the number of passengers.
    pub const fn price(self) -> u32 {
        match self {
            Self::Pickup | Self::Dropoff => ONE_WAY_PRICE,
            Self::Both => ROUND_TRIP_PRICE,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Pickup => "Airport pickup",
            Self::Dropoff => "Airport drop-off",
            Self::Both => "Pickup and drop-off",
        }
    }
}

/// Airport transfer request as submitted.
///
/// Flight fields are only required for the legs the chosen service covers.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct AirportPickupForm {
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    #[serde(deserialize_with = "lenient::text")]
    pub email: String,
    #[validate(length(min = 10, message = "Phone number must be at least 10 characters"))]
    #[serde(deserialize_with = "lenient::text")]
    pub phone: String,
    #[serde(deserialize_with = "lenient::text")]
    pub service_type: String,
    pub passengers: WholeNumber,

    #[serde(deserialize_with = "lenient::optional_text")]
    pub arrival_flight_number: Option<String>,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub arrival_date: Option<String>,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub arrival_time: Option<String>,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub dropoff_location: Option<String>,

    #[serde(deserialize_with = "lenient::optional_text")]
    pub departure_flight_number: Option<String>,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub departure_date: Option<String>,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub departure_time: Option<String>,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub pickup_location: Option<String>,

    #[validate(length(max = 1000, message = "Special requests must be at most 1000 characters"))]
    #[serde(deserialize_with = "lenient::optional_text")]
    pub special_requests: Option<String>,
}

/// One flight and the address on the ground side of the transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightLeg {
    pub flight_number: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirportPickup {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service_type: ServiceType,
    pub passengers: u8,
    /// Flight in, dropped off at `location`
    pub arrival: Option<FlightLeg>,
    /// Picked up at `location`, flight out
    pub departure: Option<FlightLeg>,
    pub price: u32,
    pub special_requests: Option<String>,
}

struct LegFields<'a> {
    flight_number: (&'static str, Option<&'a str>),
    date: (&'static str, Option<&'a str>),
    time: (&'static str, Option<&'a str>),
    location: (&'static str, Option<&'a str>),
}

impl LegFields<'_> {
    fn parse(&self, errors: &mut FieldErrors) -> Option<FlightLeg> {
        let flight_number = required(errors, self.flight_number, "Flight number is required");
        let location = required(errors, self.location, "Location is required");

        let date = required(errors, self.date, "Flight date is required").and_then(|value| {
            parse_date(&value).or_else(|| {
                errors.add(self.date.0, "Please enter a valid date");
                None
            })
        });

        let time = required(errors, self.time, "Flight time is required").and_then(|value| {
            parse_time(&value).or_else(|| {
                errors.add(self.time.0, "Please enter a valid time");
                None
            })
        });

        Some(FlightLeg {
            flight_number: flight_number?,
            date: date?,
            time: time?,
            location: location?,
        })
    }
}

fn required(
    errors: &mut FieldErrors,
    (field, value): (&'static str, Option<&str>),
    message: &str,
) -> Option<String> {
    let value = trimmed_optional(value);
    if value.is_none() {
        errors.add(field, message);
    }
    value
}

impl AirportPickupForm {
    fn sanitized(&self) -> Self {
        Self {
            name: trimmed(&self.name),
            email: normalized_email(&self.email),
            phone: trimmed(&self.phone),
            service_type: self.service_type.trim().to_lowercase(),
            special_requests: trimmed_optional(self.special_requests.as_deref()),
            ..self.clone()
        }
    }

    fn arrival_fields(&self) -> LegFields<'_> {
        LegFields {
            flight_number: ("arrival_flight_number", self.arrival_flight_number.as_deref()),
            date: ("arrival_date", self.arrival_date.as_deref()),
            time: ("arrival_time", self.arrival_time.as_deref()),
            location: ("dropoff_location", self.dropoff_location.as_deref()),
        }
    }

    fn departure_fields(&self) -> LegFields<'_> {
        LegFields {
            flight_number: ("departure_flight_number", self.departure_flight_number.as_deref()),
            date: ("departure_date", self.departure_date.as_deref()),
            time: ("departure_time", self.departure_time.as_deref()),
            location: ("pickup_location", self.pickup_location.as_deref()),
        }
    }

    pub fn validate_form(&self) -> Result<AirportPickup, FieldErrors> {
        let form = self.sanitized();
        let mut errors = FieldErrors::from_rules(&form);

        let service_type = if form.service_type.is_empty() {
            errors.add("service_type", "Please choose a service type");
            None
        } else if let Ok(service_type) = form.service_type.parse::<ServiceType>() {
            Some(service_type)
        } else {
            errors.add(
                "service_type",
                "Service type must be one of: pickup, dropoff, both",
            );
            None
        };

        let (arrival, departure) = match service_type {
            Some(service_type) => (
                service_type
                    .needs_arrival()
                    .then(|| form.arrival_fields().parse(&mut errors))
                    .flatten(),
                service_type
                    .needs_departure()
                    .then(|| form.departure_fields().parse(&mut errors))
                    .flatten(),
            ),
            None => (None, None),
        };

        let passengers = form.passengers.within(
            "passengers",
            1..=MAX_PASSENGERS,
            PASSENGERS_MESSAGE,
            &mut errors,
        );

        match (service_type, passengers) {
            (Some(service_type), Some(passengers)) if errors.is_empty() => Ok(AirportPickup {
                name: form.name,
                email: form.email,
                phone: form.phone,
                service_type,
                passengers,
                arrival,
                departure,
                price: service_type.price(),
                special_requests: form.special_requests,
            }),
            _ => Err(errors),
        }
    }
}

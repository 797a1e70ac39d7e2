//! Plain-text rendering of persisted records.
//!
//! Formatting is total: optional or unknown values render as a placeholder,
//! so a notification can always be produced for a stored record.

use std::fmt::{Display, Write as _};

use crate::{
    forms::{AirportPickup, ContactMessage, FlightLeg, NewsletterSignup, Submission, TourBooking},
    persistence::PersistedRecord,
};

const NOT_PROVIDED: &str = "Not provided";
const UNKNOWN_TOUR: &str = "Unknown tour";

struct MessageBuilder {
    text: String,
}

impl MessageBuilder {
    fn new(title: &str) -> Self {
        Self {
            text: title.to_string(),
        }
    }

    fn section(mut self, heading: &str) -> Self {
        let _ = write!(self.text, "\n\n{heading}");
        self
    }

    fn field(mut self, label: &str, value: impl Display) -> Self {
        let _ = write!(self.text, "\n• {label}: {value}");
        self
    }

    fn optional(self, label: &str, value: Option<impl Display>) -> Self {
        match value {
            Some(value) => self.field(label, value),
            None => self.field(label, NOT_PROVIDED),
        }
    }

    fn footer(mut self, action: &str, record: &PersistedRecord) -> String {
        let _ = write!(
            self.text,
            "\n\n⚡ Action required: {action}\nReceived: {}",
            record.created_at.format("%Y-%m-%d %H:%M UTC")
        );
        self.text
    }
}

/// Render the notification for `record`.
///
/// `tour_name` is the display name of a booked tour, when it could be looked up.
pub fn format_record(record: &PersistedRecord, tour_name: Option<&str>) -> String {
    match &record.submission {
        Submission::TourBooking(booking) => tour_booking(record, booking, tour_name),
        Submission::AirportPickup(pickup) => airport_pickup(record, pickup),
        Submission::Contact(message) => contact(record, message),
        Submission::Newsletter(signup) => newsletter(record, signup),
    }
}

fn tour_booking(record: &PersistedRecord, booking: &TourBooking, tour_name: Option<&str>) -> String {
    let tour = tour_name.map_or_else(
        || format!("{UNKNOWN_TOUR} ({})", booking.tour_id),
        ToString::to_string,
    );

    MessageBuilder::new("🆕 New tour booking")
        .section("📋 Booking details")
        .field("Reference", record.id)
        .field("Tour", tour)
        .field("Date", booking.date.format("%A, %-d %B %Y"))
        .field("Guests", booking.guests)
        .optional("Special requests", booking.special_requests.as_deref())
        .section("👤 Contact details")
        .field("Name", &booking.name)
        .field("Email", &booking.email)
        .field("Phone", &booking.phone)
        .footer("confirm availability and reply to the guest.", record)
}

fn flight_leg(builder: MessageBuilder, heading: &str, location_label: &str, leg: Option<&FlightLeg>) -> MessageBuilder {
    let builder = builder.section(heading);
    match leg {
        Some(leg) => builder
            .field("Flight", &leg.flight_number)
            .field("Date", leg.date.format("%A, %-d %B %Y"))
            .field("Time", leg.time.format("%H:%M"))
            .field(location_label, &leg.location),
        None => builder.field("Flight", NOT_PROVIDED),
    }
}

fn airport_pickup(record: &PersistedRecord, pickup: &AirportPickup) -> String {
    let mut builder = MessageBuilder::new("🚐 New airport transfer request")
        .section("📋 Request details")
        .field("Reference", record.id)
        .field("Service", pickup.service_type.label())
        .field("Passengers", pickup.passengers)
        .field("Price", format!("${}", pickup.price))
        .optional("Special requests", pickup.special_requests.as_deref());

    if pickup.service_type.needs_arrival() {
        builder = flight_leg(builder, "🛬 Arrival", "Drop-off at", pickup.arrival.as_ref());
    }
    if pickup.service_type.needs_departure() {
        builder = flight_leg(builder, "🛫 Departure", "Pick-up from", pickup.departure.as_ref());
    }

    builder
        .section("👤 Contact details")
        .field("Name", &pickup.name)
        .field("Email", &pickup.email)
        .field("Phone", &pickup.phone)
        .footer("assign a driver and confirm with the guest.", record)
}

fn contact(record: &PersistedRecord, message: &ContactMessage) -> String {
    MessageBuilder::new("✉️ New contact message")
        .section("📋 Message details")
        .field("Reference", record.id)
        .field("Subject", message.subject.label())
        .field("Message", &message.message)
        .section("👤 Contact details")
        .field("Name", &message.name)
        .field("Email", &message.email)
        .optional("Phone", message.phone.as_deref())
        .footer("reply within one business day.", record)
}

fn newsletter(record: &PersistedRecord, signup: &NewsletterSignup) -> String {
    MessageBuilder::new("📰 New newsletter subscriber")
        .section("📋 Subscription details")
        .field("Reference", record.id)
        .section("👤 Contact details")
        .field("Email", &signup.email)
        .footer("add the address to the mailing list.", record)
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::forms::{ContactSubject, ServiceType};

    fn record(submission: Submission) -> PersistedRecord {
        PersistedRecord {
            id: Uuid::nil(),
            created_at: Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap(),
            submission,
        }
    }

    fn booking() -> TourBooking {
        TourBooking {
            name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
            phone: "+1 555 123 4567".to_string(),
            tour_id: "volcano-sunrise".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
            guests: 2,
            special_requests: None,
        }
    }

    #[test]
    fn test_tour_booking_sections_in_order() {
        let text = format_record(
            &record(Submission::TourBooking(booking())),
            Some("Volcano Sunrise Trek"),
        );

        let details = text.find("Booking details").unwrap();
        let contact = text.find("Contact details").unwrap();
        let action = text.find("Action required").unwrap();
        assert!(details < contact && contact < action);

        assert!(text.contains("• Reference: 00000000-0000-0000-0000-000000000000"));
        assert!(text.contains("• Tour: Volcano Sunrise Trek"));
        assert!(text.contains("• Date: Saturday, 17 October 2026"));
        assert!(text.contains("• Guests: 2"));
        assert!(text.contains("• Special requests: Not provided"));
        assert!(text.contains("Received: 2026-10-16 09:30 UTC"));
    }

    #[test]
    fn test_unknown_tour_falls_back_to_id() {
        let text = format_record(&record(Submission::TourBooking(booking())), None);
        assert!(text.contains("• Tour: Unknown tour (volcano-sunrise)"));
    }

    #[test]
    fn test_airport_pickup_lists_only_requested_legs() {
        let pickup = AirportPickup {
            name: "Jane Traveller".to_string(),
            email: "jane@example.com".to_string(),
            phone: "+44 20 7946 0958".to_string(),
            service_type: ServiceType::Pickup,
            passengers: 3,
            arrival: Some(FlightLeg {
                flight_number: "GA 404".to_string(),
                date: NaiveDate::from_ymd_opt(2026, 11, 2).unwrap(),
                time: NaiveTime::from_hms_opt(14, 35, 0).unwrap(),
                location: "Ocean View Hotel".to_string(),
            }),
            departure: None,
            price: 25,
            special_requests: Some("Child seat".to_string()),
        };

        let text = format_record(&record(Submission::AirportPickup(pickup)), None);

        assert!(text.contains("🛬 Arrival"));
        assert!(!text.contains("🛫 Departure"));
        assert!(text.contains("• Time: 14:35"));
        assert!(text.contains("• Drop-off at: Ocean View Hotel"));
        assert!(text.contains("• Price: $25"));
        assert!(text.contains("• Special requests: Child seat"));
    }

    #[test]
    fn test_missing_leg_renders_placeholder() {
        let pickup = AirportPickup {
            name: "Jane Traveller".to_string(),
            email: "jane@example.com".to_string(),
            phone: "+44 20 7946 0958".to_string(),
            service_type: ServiceType::Both,
            passengers: 1,
            arrival: None,
            departure: None,
            price: 45,
            special_requests: None,
        };

        let text = format_record(&record(Submission::AirportPickup(pickup)), None);
        assert_eq!(text.matches("• Flight: Not provided").count(), 2);
    }

    #[test]
    fn test_contact_and_newsletter() {
        let text = format_record(
            &record(Submission::Contact(ContactMessage {
                name: "Ana Souza".to_string(),
                email: "ana@example.com".to_string(),
                phone: None,
                subject: ContactSubject::Feedback,
                message: "Loved the snorkelling trip!".to_string(),
            })),
            None,
        );
        assert!(text.contains("• Subject: Feedback"));
        assert!(text.contains("• Phone: Not provided"));

        let text = format_record(
            &record(Submission::Newsletter(NewsletterSignup {
                email: "reader@example.com".to_string(),
            })),
            None,
        );
        assert!(text.starts_with("📰 New newsletter subscriber"));
        assert!(text.contains("• Email: reader@example.com"));
    }
}

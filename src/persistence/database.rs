use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use tracing::trace;
use uuid::Uuid;

use super::{PersistedRecord, Persistence, PersistenceError};
use crate::{
    database::models::{
        airport_pickup, contact_message, newsletter_subscriber, tour, tour_booking,
    },
    forms::Submission,
};

/// Stores submissions in the application database, one table per form.
#[derive(Clone, Debug)]
pub struct DatabasePersistence {
    db: DatabaseConnection,
}

impl DatabasePersistence {
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Persistence for DatabasePersistence {
    async fn create(&self, submission: &Submission) -> Result<PersistedRecord, PersistenceError> {
        let id = Uuid::new_v4();
        let created_at = Utc::now();

        match submission {
            Submission::TourBooking(booking) => {
                tour_booking::ActiveModel {
                    id: Set(id),
                    name: Set(booking.name.clone()),
                    email: Set(booking.email.clone()),
                    phone: Set(booking.phone.clone()),
                    tour_id: Set(booking.tour_id.clone()),
                    tour_date: Set(booking.date),
                    guests: Set(i16::from(booking.guests)),
                    special_requests: Set(booking.special_requests.clone()),
                    created_at: Set(created_at),
                }
                .insert(&self.db)
                .await?;
            }
            Submission::AirportPickup(pickup) => {
                let arrival = pickup.arrival.as_ref();
                let departure = pickup.departure.as_ref();

                airport_pickup::ActiveModel {
                    id: Set(id),
                    name: Set(pickup.name.clone()),
                    email: Set(pickup.email.clone()),
                    phone: Set(pickup.phone.clone()),
                    service_type: Set(pickup.service_type.to_string()),
                    passengers: Set(i16::from(pickup.passengers)),
                    arrival_flight_number: Set(arrival.map(|leg| leg.flight_number.clone())),
                    arrival_date: Set(arrival.map(|leg| leg.date)),
                    arrival_time: Set(arrival.map(|leg| leg.time)),
                    dropoff_location: Set(arrival.map(|leg| leg.location.clone())),
                    departure_flight_number: Set(
                        departure.map(|leg| leg.flight_number.clone())
                    ),
                    departure_date: Set(departure.map(|leg| leg.date)),
                    departure_time: Set(departure.map(|leg| leg.time)),
                    pickup_location: Set(departure.map(|leg| leg.location.clone())),
                    price: Set(i32::try_from(pickup.price).unwrap_or(i32::MAX)),
                    special_requests: Set(pickup.special_requests.clone()),
                    created_at: Set(created_at),
                }
                .insert(&self.db)
                .await?;
            }
            Submission::Contact(message) => {
                contact_message::ActiveModel {
                    id: Set(id),
                    name: Set(message.name.clone()),
                    email: Set(message.email.clone()),
                    phone: Set(message.phone.clone()),
                    subject: Set(message.subject.to_string()),
                    message: Set(message.message.clone()),
                    created_at: Set(created_at),
                }
                .insert(&self.db)
                .await?;
            }
            Submission::Newsletter(signup) => {
                newsletter_subscriber::ActiveModel {
                    id: Set(id),
                    email: Set(signup.email.clone()),
                    created_at: Set(created_at),
                }
                .insert(&self.db)
                .await?;
            }
        }

        trace!(%id, kind = %submission.kind(), "Submission stored");

        Ok(PersistedRecord {
            id,
            created_at,
            submission: submission.clone(),
        })
    }

    async fn tour_name(&self, tour_id: &str) -> Result<Option<String>, PersistenceError> {
        let tour = tour::Entity::find_by_id(tour_id.to_string())
            .one(&self.db)
            .await?;

        Ok(tour.map(|tour| tour.name))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};
    use sea_orm_migration::MigratorTrait;

    use super::*;
    use crate::{
        config::DatabaseConfig,
        database::{migrations::Migrator, setup_database_connection},
        forms::{
            AirportPickup, ContactMessage, ContactSubject, FlightLeg, NewsletterSignup,
            ServiceType, TourBooking,
        },
    };

    async fn migrated_store() -> DatabasePersistence {
        // One connection, so every query sees the same in-memory database
        let db = setup_database_connection(&DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            pool_size: 1,
        })
        .await
        .unwrap();
        Migrator::up(&db, None).await.unwrap();

        tour::ActiveModel {
            id: Set("volcano-sunrise".to_string()),
            name: Set("Volcano Sunrise Trek".to_string()),
            created_at: Set(Utc::now()),
        }
        .insert(&db)
        .await
        .unwrap();

        DatabasePersistence::new(db)
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 11, d).unwrap()
    }

    #[tokio::test]
    async fn test_tour_booking_row() {
        let store = migrated_store().await;
        let booking = TourBooking {
            name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
            phone: "+1 555 123 4567".to_string(),
            tour_id: "volcano-sunrise".to_string(),
            date: day(2),
            guests: 20,
            special_requests: Some("Vegetarian lunch".to_string()),
        };

        let record = store
            .create(&Submission::TourBooking(booking.clone()))
            .await
            .unwrap();

        let row = tour_booking::Entity::find_by_id(record.id)
            .one(&store.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.tour_date, day(2));
        assert_eq!(row.guests, 20);
        assert_eq!(row.special_requests, booking.special_requests);
        assert_eq!(record.submission, Submission::TourBooking(booking));
    }

    #[tokio::test]
    async fn test_airport_pickup_row_keeps_missing_leg_null() {
        let store = migrated_store().await;
        let pickup = AirportPickup {
            name: "Jane Traveller".to_string(),
            email: "jane@example.com".to_string(),
            phone: "+44 20 7946 0958".to_string(),
            service_type: ServiceType::Pickup,
            passengers: 10,
            arrival: Some(FlightLeg {
                flight_number: "GA 404".to_string(),
                date: day(2),
                time: NaiveTime::from_hms_opt(14, 35, 0).unwrap(),
                location: "Ocean View Hotel".to_string(),
            }),
            departure: None,
            price: 25,
            special_requests: None,
        };

        let record = store
            .create(&Submission::AirportPickup(pickup))
            .await
            .unwrap();

        let row = airport_pickup::Entity::find_by_id(record.id)
            .one(&store.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.service_type, "pickup");
        assert_eq!(row.passengers, 10);
        assert_eq!(row.arrival_flight_number.as_deref(), Some("GA 404"));
        assert_eq!(row.arrival_date, Some(day(2)));
        assert_eq!(row.arrival_time, NaiveTime::from_hms_opt(14, 35, 0));
        assert_eq!(row.dropoff_location.as_deref(), Some("Ocean View Hotel"));
        assert_eq!(row.departure_flight_number, None);
        assert_eq!(row.departure_date, None);
        assert_eq!(row.departure_time, None);
        assert_eq!(row.pickup_location, None);
        assert_eq!(row.price, 25);
    }

    #[tokio::test]
    async fn test_contact_and_newsletter_rows() {
        let store = migrated_store().await;

        let contact = store
            .create(&Submission::Contact(ContactMessage {
                name: "Ana Souza".to_string(),
                email: "ana@example.com".to_string(),
                phone: None,
                subject: ContactSubject::AirportTransfer,
                message: "Can you pick up six people from the ferry terminal?".to_string(),
            }))
            .await
            .unwrap();
        let signup = store
            .create(&Submission::Newsletter(NewsletterSignup {
                email: "reader@example.com".to_string(),
            }))
            .await
            .unwrap();

        let row = contact_message::Entity::find_by_id(contact.id)
            .one(&store.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.subject, "airport_transfer");
        assert_eq!(row.phone, None);

        let row = newsletter_subscriber::Entity::find_by_id(signup.id)
            .one(&store.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.email, "reader@example.com");
    }

    #[tokio::test]
    async fn test_tour_name_lookup() {
        let store = migrated_store().await;

        assert_eq!(
            store.tour_name("volcano-sunrise").await.unwrap().as_deref(),
            Some("Volcano Sunrise Trek")
        );
        assert_eq!(store.tour_name("retired-tour").await.unwrap(), None);
    }
}

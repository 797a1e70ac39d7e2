use sea_orm_migration::{
    prelude::*,
    schema::{
        date, date_null, integer, small_integer, string, string_null, text, text_null,
        time_null, timestamp_with_time_zone, uuid,
    },
};

/// One table per public form.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TourBookings::Table)
                    .if_not_exists()
                    .col(uuid(TourBookings::Id).primary_key())
                    .col(string(TourBookings::Name))
                    .col(string(TourBookings::Email))
                    .col(string(TourBookings::Phone))
                    .col(string(TourBookings::TourId))
                    .col(date(TourBookings::TourDate))
                    .col(small_integer(TourBookings::Guests))
                    .col(text_null(TourBookings::SpecialRequests))
                    .col(
                        timestamp_with_time_zone(TourBookings::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tour_bookings_tour_id")
                    .table(TourBookings::Table)
                    .col(TourBookings::TourId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AirportPickups::Table)
                    .if_not_exists()
                    .col(uuid(AirportPickups::Id).primary_key())
                    .col(string(AirportPickups::Name))
                    .col(string(AirportPickups::Email))
                    .col(string(AirportPickups::Phone))
                    .col(string(AirportPickups::ServiceType))
                    .col(small_integer(AirportPickups::Passengers))
                    .col(string_null(AirportPickups::ArrivalFlightNumber))
                    .col(date_null(AirportPickups::ArrivalDate))
                    .col(time_null(AirportPickups::ArrivalTime))
                    .col(string_null(AirportPickups::DropoffLocation))
                    .col(string_null(AirportPickups::DepartureFlightNumber))
                    .col(date_null(AirportPickups::DepartureDate))
                    .col(time_null(AirportPickups::DepartureTime))
                    .col(string_null(AirportPickups::PickupLocation))
                    .col(integer(AirportPickups::Price))
                    .col(text_null(AirportPickups::SpecialRequests))
                    .col(
                        timestamp_with_time_zone(AirportPickups::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ContactMessages::Table)
                    .if_not_exists()
                    .col(uuid(ContactMessages::Id).primary_key())
                    .col(string(ContactMessages::Name))
                    .col(string(ContactMessages::Email))
                    .col(string_null(ContactMessages::Phone))
                    .col(string(ContactMessages::Subject))
                    .col(text(ContactMessages::Message))
                    .col(
                        timestamp_with_time_zone(ContactMessages::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(NewsletterSubscribers::Table)
                    .if_not_exists()
                    .col(uuid(NewsletterSubscribers::Id).primary_key())
                    .col(string(NewsletterSubscribers::Email))
                    .col(
                        timestamp_with_time_zone(NewsletterSubscribers::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_newsletter_subscribers_email")
                    .table(NewsletterSubscribers::Table)
                    .col(NewsletterSubscribers::Email)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(NewsletterSubscribers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ContactMessages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AirportPickups::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TourBookings::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum TourBookings {
    Table,
    Id,
    Name,
    Email,
    Phone,
    TourId,
    TourDate,
    Guests,
    SpecialRequests,
    CreatedAt,
}

#[derive(DeriveIden)]
enum AirportPickups {
    Table,
    Id,
    Name,
    Email,
    Phone,
    ServiceType,
    Passengers,
    ArrivalFlightNumber,
    ArrivalDate,
    ArrivalTime,
    DropoffLocation,
    DepartureFlightNumber,
    DepartureDate,
    DepartureTime,
    PickupLocation,
    Price,
    SpecialRequests,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ContactMessages {
    Table,
    Id,
    Name,
    Email,
    Phone,
    Subject,
    Message,
    CreatedAt,
}

#[derive(DeriveIden)]
enum NewsletterSubscribers {
    Table,
    Id,
    Email,
    CreatedAt,
}

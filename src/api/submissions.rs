use axum::extract::State;

use crate::{
    api::{client_ip::ClientIp, json_body::JsonBody},
    app::App,
    forms::{AirportPickupForm, ContactForm, NewsletterForm, TourBookingForm},
    submissions::{SubmissionAccepted, SubmissionError},
};

pub async fn create_tour_booking(
    State(app): State<App>,
    ClientIp(ip): ClientIp,
    JsonBody(form): JsonBody<TourBookingForm>,
) -> Result<SubmissionAccepted, SubmissionError> {
    let record = app.pipeline.submit_tour_booking(form, &ip).await?;

    Ok(record.into())
}

pub async fn create_airport_pickup(
    State(app): State<App>,
    ClientIp(ip): ClientIp,
    JsonBody(form): JsonBody<AirportPickupForm>,
) -> Result<SubmissionAccepted, SubmissionError> {
    let record = app.pipeline.submit_airport_pickup(form, &ip).await?;

    Ok(record.into())
}

pub async fn create_contact_message(
    State(app): State<App>,
    ClientIp(ip): ClientIp,
    JsonBody(form): JsonBody<ContactForm>,
) -> Result<SubmissionAccepted, SubmissionError> {
    let record = app.pipeline.submit_contact(form, &ip).await?;

    Ok(record.into())
}

pub async fn subscribe_to_newsletter(
    State(app): State<App>,
    ClientIp(ip): ClientIp,
    JsonBody(form): JsonBody<NewsletterForm>,
) -> Result<SubmissionAccepted, SubmissionError> {
    let record = app.pipeline.submit_newsletter(form, &ip).await?;

    Ok(record.into())
}

//! HTTP surface of the submission pipeline.

use axum::{routing::post, Router};

use crate::app::App;

pub mod client_ip;
pub mod health_checks;
pub mod json_body;
pub mod json_error;
pub mod submissions;

/// Form endpoints, mounted under `/api`.
pub fn routes() -> Router<App> {
    Router::new()
        .route("/bookings/tours", post(submissions::create_tour_booking))
        .route(
            "/bookings/airport-pickups",
            post(submissions::create_airport_pickup),
        )
        .route("/contact", post(submissions::create_contact_message))
        .route("/newsletter", post(submissions::subscribe_to_newsletter))
}

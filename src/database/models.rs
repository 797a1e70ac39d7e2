pub mod airport_pickup;
pub mod contact_message;
pub mod newsletter_subscriber;
pub mod tour;
pub mod tour_booking;

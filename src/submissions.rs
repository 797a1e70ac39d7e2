//! The write path shared by every public form.
//!
//! A submission is rate checked, validated, persisted and then announced to
//! the back office, in that order. Only the first three stages can fail the
//! submission; notification is best effort.

use std::{sync::Arc, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    clock::Clock,
    forms::{
        AirportPickupForm, ContactForm, NewsletterForm, Submission, SubmissionForm,
        TourBookingForm,
    },
    notifications::{DispatchOutcome, Notifier},
    persistence::{PersistedRecord, Persistence},
    rate_limiting::RateLimitState,
};

mod error;

pub(crate) use error::FailureBody;
pub use error::SubmissionError;

/// Orchestrates the stages of a submission.
///
/// Cloning is cheap; clones share the rate limit counters, the store and the
/// notifier.
#[derive(Clone, Debug)]
pub struct SubmissionPipeline {
    rate_limiter: RateLimitState,
    persistence: Arc<dyn Persistence>,
    notifier: Notifier,
    clock: Arc<dyn Clock>,
    notification_timeout: Duration,
}

impl SubmissionPipeline {
    pub fn new(
        rate_limiter: RateLimitState,
        persistence: Arc<dyn Persistence>,
        notifier: Notifier,
        clock: Arc<dyn Clock>,
        notification_timeout: Duration,
    ) -> Self {
        Self {
            rate_limiter,
            persistence,
            notifier,
            clock,
            notification_timeout,
        }
    }

    pub const fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub const fn rate_limiter(&self) -> &RateLimitState {
        &self.rate_limiter
    }

    /// Run `form` through the pipeline on behalf of the caller at `ip`.
    ///
    /// Quota spent on the rate check is not refunded when a later stage fails.
    #[instrument(skip_all, fields(form = %form.kind(), ip = %ip))]
    pub async fn submit(
        &self,
        form: SubmissionForm,
        ip: &str,
    ) -> Result<PersistedRecord, SubmissionError> {
        self.rate_limiter
            .check_form(form.kind(), ip, form.contact_email())
            .map_err(|rejection| {
                info!(
                    dimension = rejection.dimension.as_str(),
                    reset_time = %rejection.reset_time,
                    "Submission rate limited"
                );
                SubmissionError::from(rejection)
            })?;

        let submission = form.validate(self.clock.today()).map_err(|errors| {
            debug!(fields = ?errors.fields().collect::<Vec<_>>(), "Submission failed validation");
            SubmissionError::ValidationFailed(errors)
        })?;

        let record = self
            .persistence
            .create(&submission)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to store submission");
                SubmissionError::PersistenceFailed(e)
            })?;

        info!(record_id = %record.id, "Submission stored");

        self.notify(&record).await;

        Ok(record)
    }

    pub async fn submit_tour_booking(
        &self,
        form: TourBookingForm,
        ip: &str,
    ) -> Result<PersistedRecord, SubmissionError> {
        self.submit(SubmissionForm::TourBooking(form), ip).await
    }

    pub async fn submit_airport_pickup(
        &self,
        form: AirportPickupForm,
        ip: &str,
    ) -> Result<PersistedRecord, SubmissionError> {
        self.submit(SubmissionForm::AirportPickup(form), ip).await
    }

    pub async fn submit_contact(
        &self,
        form: ContactForm,
        ip: &str,
    ) -> Result<PersistedRecord, SubmissionError> {
        self.submit(SubmissionForm::Contact(form), ip).await
    }

    pub async fn submit_newsletter(
        &self,
        form: NewsletterForm,
        ip: &str,
    ) -> Result<PersistedRecord, SubmissionError> {
        self.submit(SubmissionForm::Newsletter(form), ip).await
    }

    /// Look up what the message needs and send it from its own task, waiting
    /// a bounded time for the outcome. The outcome is only logged; `None`
    /// means the deadline passed or the task died. A task still running at
    /// the deadline is left to finish on its own.
    async fn notify(&self, record: &PersistedRecord) -> Option<DispatchOutcome> {
        let persistence = Arc::clone(&self.persistence);
        let notifier = self.notifier.clone();
        let dispatched = record.clone();
        let task = tokio::spawn(async move {
            let tour_name = tour_name(persistence.as_ref(), &dispatched.submission).await;
            notifier
                .dispatch(&dispatched, tour_name.as_deref())
                .await
        });

        match tokio::time::timeout(self.notification_timeout, task).await {
            Ok(Ok(outcome)) if outcome.success => {
                debug!(record_id = %record.id, "{}", outcome.message);
                Some(outcome)
            }
            Ok(Ok(outcome)) => {
                warn!(
                    record_id = %record.id,
                    destination = %self.notifier.destination(),
                    reason = %outcome.message,
                    "Notification failed"
                );
                Some(outcome)
            }
            Ok(Err(e)) => {
                error!(record_id = %record.id, error = %e, "Notification task aborted");
                None
            }
            Err(_) => {
                warn!(
                    record_id = %record.id,
                    timeout_ms = u64::try_from(self.notification_timeout.as_millis()).unwrap_or(u64::MAX),
                    "Notification timed out"
                );
                None
            }
        }
    }
}

/// Display name of the booked tour, for tour bookings only. A failed lookup
/// is logged and treated as an unknown tour.
async fn tour_name(persistence: &dyn Persistence, submission: &Submission) -> Option<String> {
    let Submission::TourBooking(booking) = submission else {
        return None;
    };

    match persistence.tour_name(&booking.tour_id).await {
        Ok(name) => name,
        Err(e) => {
            warn!(tour_id = %booking.tour_id, error = %e, "Failed to look up tour name");
            None
        }
    }
}

/// A stored submission, answered with `201 Created`.
#[derive(Debug, Serialize)]
pub struct SubmissionAccepted {
    success: bool,
    record: PersistedRecord,
}

impl From<PersistedRecord> for SubmissionAccepted {
    fn from(record: PersistedRecord) -> Self {
        Self {
            success: true,
            record,
        }
    }
}

impl IntoResponse for SubmissionAccepted {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, Json(self)).into_response()
    }
}

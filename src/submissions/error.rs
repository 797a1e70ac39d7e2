use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::{
    forms::FieldErrors, persistence::PersistenceError, rate_limiting::RateLimitRejection,
};

const VALIDATION_MESSAGE: &str = "Please correct the highlighted fields and try again.";
const PERSISTENCE_MESSAGE: &str =
    "We could not save your submission. Please try again later or contact us directly.";

/// Why a submission was not accepted.
///
/// Notification failures are not represented: they never reach the caller.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("{message}")]
    RateLimited {
        message: String,
        reset_time: DateTime<Utc>,
        retry_after: Duration,
    },
    #[error("{}", VALIDATION_MESSAGE)]
    ValidationFailed(FieldErrors),
    #[error("{}", PERSISTENCE_MESSAGE)]
    PersistenceFailed(#[source] PersistenceError),
}

impl From<RateLimitRejection> for SubmissionError {
    fn from(rejection: RateLimitRejection) -> Self {
        Self::RateLimited {
            message: rejection.message,
            reset_time: rejection.reset_time,
            retry_after: rejection.retry_after,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RateLimitedBody<'a> {
    success: bool,
    rate_limited: bool,
    message: &'a str,
    /// Milliseconds since the Unix epoch
    reset_time: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidationFailedBody<'a> {
    success: bool,
    message: &'a str,
    field_errors: &'a FieldErrors,
}

#[derive(Serialize)]
pub(crate) struct FailureBody<'a> {
    pub success: bool,
    pub message: &'a str,
}

impl IntoResponse for SubmissionError {
    fn into_response(self) -> Response {
        match &self {
            Self::RateLimited {
                message,
                reset_time,
                retry_after,
            } => {
                // Round up so clients never retry before the window resets
                let retry_after_secs = (retry_after.num_milliseconds() + 999) / 1000;
                let mut response = (
                    StatusCode::TOO_MANY_REQUESTS,
                    Json(RateLimitedBody {
                        success: false,
                        rate_limited: true,
                        message,
                        reset_time: reset_time.timestamp_millis(),
                    }),
                )
                    .into_response();

                response.headers_mut().insert(
                    header::RETRY_AFTER,
                    HeaderValue::from(retry_after_secs.max(1)),
                );
                response
            }
            Self::ValidationFailed(field_errors) => (
                StatusCode::BAD_REQUEST,
                Json(ValidationFailedBody {
                    success: false,
                    message: VALIDATION_MESSAGE,
                    field_errors,
                }),
            )
                .into_response(),
            Self::PersistenceFailed(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(FailureBody {
                    success: false,
                    message: PERSISTENCE_MESSAGE,
                }),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_rate_limited_response_carries_retry_after() {
        let error = SubmissionError::RateLimited {
            message: "Too many attempts".to_string(),
            reset_time: Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap(),
            retry_after: Duration::milliseconds(90_500),
        };

        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "91");
    }

    #[test]
    fn test_persistence_failure_hides_the_cause() {
        let error = SubmissionError::PersistenceFailed(PersistenceError::Unavailable(
            "connection refused on 10.0.0.5".to_string(),
        ));

        assert!(!error.to_string().contains("10.0.0.5"));
        assert_eq!(
            error.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

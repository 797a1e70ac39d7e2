use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::submissions::FailureBody;

#[derive(Debug, thiserror::Error)]
pub enum JsonError {
    #[error("Invalid JSON format")]
    InvalidJson(#[from] JsonRejection),
}

impl IntoResponse for JsonError {
    fn into_response(self) -> Response {
        match self {
            Self::InvalidJson(rejection) => {
                tracing::debug!(reason = %rejection.body_text(), "Rejected request body");
                (
                    StatusCode::BAD_REQUEST,
                    Json(FailureBody {
                        success: false,
                        message: "Invalid JSON format",
                    }),
                )
                    .into_response()
            }
        }
    }
}

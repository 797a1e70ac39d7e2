use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DatabaseConnection;
use thiserror::Error;

use crate::{config::Config, environment::Environment, submissions::SubmissionPipeline};

#[derive(Clone, Debug)]
pub struct App {
    pub config: Config,
    pub environment: Environment,
    /// `None` when submissions are stored somewhere other than the database
    pub db: Option<DatabaseConnection>,
    pub pipeline: SubmissionPipeline,
}

impl App {
    pub async fn check_readiness(&self) -> Result<(), ReadinessError> {
        if let Some(db) = &self.db {
            db.ping().await?;
        }

        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ReadinessError {
    #[error("Database connection error")]
    DatabaseError(#[from] sea_orm::DbErr),
}

impl IntoResponse for ReadinessError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self, "Readiness check failed");
        (StatusCode::SERVICE_UNAVAILABLE, self.to_string()).into_response()
    }
}

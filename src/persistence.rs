//! Storage of accepted submissions.
//!
//! The pipeline only needs to create one record per submission and, for the
//! notification text, to look up a tour's display name.

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::forms::{FormKind, Submission};

mod database;
mod memory;

pub use database::DatabasePersistence;
pub use memory::MemoryPersistence;

/// A stored submission. Owned by the store; never modified by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedRecord {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub submission: Submission,
}

impl PersistedRecord {
    pub const fn kind(&self) -> FormKind {
        self.submission.kind()
    }
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait Persistence: Send + Sync + Debug {
    /// Insert a single row for `submission`.
    async fn create(&self, submission: &Submission) -> Result<PersistedRecord, PersistenceError>;

    /// Display name of a tour, if the tour exists.
    async fn tour_name(&self, tour_id: &str) -> Result<Option<String>, PersistenceError>;
}

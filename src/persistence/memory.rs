use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, PoisonError,
    },
    time::Duration,
};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{PersistedRecord, Persistence, PersistenceError};
use crate::forms::Submission;

/// In-memory store for tests and local demos.
///
/// Clones share state, so a test can keep a handle and inspect what the
/// pipeline wrote. Reads and writes can be made to fail on demand, and reads
/// to stall.
#[derive(Clone, Debug, Default)]
pub struct MemoryPersistence {
    records: Arc<Mutex<Vec<PersistedRecord>>>,
    tours: Arc<Mutex<HashMap<String, String>>>,
    fail_writes: Arc<AtomicBool>,
    fail_reads: Arc<AtomicBool>,
    read_delay: Arc<Mutex<Option<Duration>>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_tour(self, id: &str, name: &str) -> Self {
        self.tours
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.to_string(), name.to_string());
        self
    }

    /// All records created so far, oldest first
    pub fn records(&self) -> Vec<PersistedRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Wait `delay` before each following tour lookup completes.
    pub fn delay_reads(&self, delay: Option<Duration>) {
        *self
            .read_delay
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = delay;
    }
}

#[async_trait]
impl Persistence for MemoryPersistence {
    async fn create(&self, submission: &Submission) -> Result<PersistedRecord, PersistenceError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PersistenceError::Unavailable(
                "writes are disabled".to_string(),
            ));
        }

        let record = PersistedRecord {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            submission: submission.clone(),
        };
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());

        Ok(record)
    }

    async fn tour_name(&self, tour_id: &str) -> Result<Option<String>, PersistenceError> {
        let delay = *self
            .read_delay
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(PersistenceError::Unavailable("reads are disabled".to_string()));
        }

        Ok(self
            .tours
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(tour_id)
            .cloned())
    }
}

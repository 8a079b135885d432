//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the session manager with mock implementations.

use crate::db::{Database, DbError, OutcomeRecord};
use crate::webhook::CallOutcome;
use async_trait::async_trait;

/// Storage for finished-call outcomes
#[async_trait]
pub trait OutcomeStore: Send + Sync {
    /// Persist the outcome of a call
    async fn record(&self, outcome: &CallOutcome) -> Result<OutcomeRecord, String>;

    /// Get the outcome of a call, if one was recorded
    async fn get(&self, call_id: i64) -> Result<Option<OutcomeRecord>, String>;
}

// ============================================================================
// Production Adapters
// ============================================================================

/// Adapter to use Database as an `OutcomeStore`
#[derive(Clone)]
pub struct DatabaseOutcomeStore {
    db: Database,
}

impl DatabaseOutcomeStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OutcomeStore for DatabaseOutcomeStore {
    async fn record(&self, outcome: &CallOutcome) -> Result<OutcomeRecord, String> {
        self.db.record_outcome(outcome).map_err(|e| e.to_string())
    }

    async fn get(&self, call_id: i64) -> Result<Option<OutcomeRecord>, String> {
        match self.db.get_outcome(call_id) {
            Ok(record) => Ok(Some(record)),
            Err(DbError::OutcomeNotFound(_)) => Ok(None),
            Err(e) => Err(e.to_string()),
        }
    }
}

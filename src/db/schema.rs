//! Database schema and types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// SQL schema for initialization
pub const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS call_outcomes (
    id TEXT PRIMARY KEY,
    call_id INTEGER NOT NULL UNIQUE,
    from_number TEXT NOT NULL,
    to_number TEXT NOT NULL,
    confirmed BOOLEAN NOT NULL,
    recorded_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_call_outcomes_recorded ON call_outcomes(recorded_at DESC);
";

/// Persisted result of a finished call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    pub id: String,
    pub call_id: i64,
    pub from_number: String,
    pub to_number: String,
    pub confirmed: bool,
    pub recorded_at: DateTime<Utc>,
}

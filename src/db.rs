//! Database module
//!
//! Durable store for call outcomes recorded at teardown.

mod schema;

pub use schema::*;

use crate::webhook::CallOutcome;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Outcome not found for call {0}")]
    OutcomeNotFound(i64),
    #[error("Database connection lock poisoned")]
    LockPoisoned,
}

pub type DbResult<T> = Result<T, DbError>;

/// Thread-safe database handle
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    #[allow(dead_code)] // Used in tests
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    fn conn(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| DbError::LockPoisoned)
    }

    fn run_migrations(&self) -> DbResult<()> {
        self.conn()?.execute_batch(SCHEMA)?;
        Ok(())
    }

    // ==================== Outcome Operations ====================

    /// Record the outcome of a call. Recording the same call again replaces
    /// the earlier outcome but keeps its id.
    pub fn record_outcome(&self, outcome: &CallOutcome) -> DbResult<OutcomeRecord> {
        let conn = self.conn()?;
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO call_outcomes (id, call_id, from_number, to_number, confirmed, recorded_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(call_id) DO UPDATE SET
                from_number = excluded.from_number,
                to_number = excluded.to_number,
                confirmed = excluded.confirmed,
                recorded_at = excluded.recorded_at",
            params![
                id,
                outcome.state.call_id,
                outcome.state.from_number,
                outcome.state.to_number,
                outcome.confirmed,
                now.to_rfc3339(),
            ],
        )?;

        query_outcome(&conn, outcome.state.call_id)
    }

    /// Get the outcome recorded for a call
    pub fn get_outcome(&self, call_id: i64) -> DbResult<OutcomeRecord> {
        let conn = self.conn()?;
        query_outcome(&conn, call_id)
    }
}

fn query_outcome(conn: &Connection, call_id: i64) -> DbResult<OutcomeRecord> {
    let mut stmt = conn.prepare(
        "SELECT id, call_id, from_number, to_number, confirmed, recorded_at
         FROM call_outcomes WHERE call_id = ?1",
    )?;

    stmt.query_row(params![call_id], |row| {
        Ok(OutcomeRecord {
            id: row.get(0)?,
            call_id: row.get(1)?,
            from_number: row.get(2)?,
            to_number: row.get(3)?,
            confirmed: row.get(4)?,
            recorded_at: parse_datetime(&row.get::<_, String>(5)?),
        })
    })
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => DbError::OutcomeNotFound(call_id),
        other => DbError::Sqlite(other),
    })
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc))
}

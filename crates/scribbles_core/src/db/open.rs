//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Initialize declared record stores before returning a usable
//!   connection.
//!
//! # Invariants
//! - Returned connections have all declared stores created.

use super::schema::{init_db, ObjectStoreSchema};
use super::DbResult;
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens a SQLite database file and initializes the declared stores.
///
/// # Side effects
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>, stores: &[ObjectStoreSchema]) -> DbResult<Connection> {
    bootstrap(Connection::open(path), stores, "file")
}

/// Opens an in-memory SQLite database and initializes the declared stores.
///
/// Used by tests and by hosts without a writable data directory.
pub fn open_db_in_memory(stores: &[ObjectStoreSchema]) -> DbResult<Connection> {
    bootstrap(Connection::open_in_memory(), stores, "memory")
}

fn bootstrap(
    opened: Result<Connection, rusqlite::Error>,
    stores: &[ObjectStoreSchema],
    mode: &str,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let result = opened.map_err(Into::into).and_then(|mut conn| {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        init_db(&mut conn, stores)?;
        Ok(conn)
    });

    match &result {
        Ok(_) => info!(
            "event=db_open module=db status=ok mode={mode} duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error={err}",
            started_at.elapsed().as_millis()
        ),
    }

    result
}

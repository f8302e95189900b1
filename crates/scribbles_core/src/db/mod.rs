//! SQLite storage bootstrap and declared-schema initialization.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the scribble engine.
//! - Create declared record stores one time, gated by a schema version.
//!
//! # Invariants
//! - The committed schema version is tracked via `PRAGMA user_version`.
//! - Core code must not read/write records before initialization succeeds.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
pub mod schema;

pub use open::{open_db, open_db_in_memory};
pub use schema::{
    init_db, ColumnSchema, ObjectStoreSchema, StoreIndexSchema, DB_VERSION, SCRIBBLES_SCHEMA,
};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The database was committed by a newer build; downgrading is undefined
    /// and must not be attempted.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// A store declaration is internally inconsistent (for example a key
    /// path naming an undeclared column).
    InvalidSchema(String),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::InvalidSchema(message) => write!(f, "invalid store schema: {message}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
            Self::InvalidSchema(_) => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

//! Scribble repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide keyed CRUD over the `scribbles` store.
//! - Map engine failures to semantic errors (`Constraint` on duplicate
//!   insert).

use crate::db::DbError;
use crate::model::scribble::{Scribble, ScribbleId};
use rusqlite::{params, Connection, ErrorCode, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const SCRIBBLE_SELECT_SQL: &str = "SELECT id, content, drawing, timestamp FROM scribbles";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for scribble persistence operations.
#[derive(Debug)]
pub enum RepoError {
    /// Duplicate primary key on `add`. Programmer error given the
    /// monotonic id scheme; not specially handled upstream.
    Constraint(ScribbleId),
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Constraint(id) => write!(f, "scribble id already exists: {id}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted scribble data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Constraint(_) => None,
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Keyed CRUD contract for the scribbles store.
///
/// Mirrors the durable adapter surface: callers must re-sort `get_all`
/// output, and `update`/`delete` are total over absent keys.
pub trait ScribbleRepository {
    /// Inserts a new record; fails with `Constraint` when the id exists.
    fn add(&self, scribble: &Scribble) -> RepoResult<()>;
    /// Returns the record or `None` when absent.
    fn get(&self, id: &str) -> RepoResult<Option<Scribble>>;
    /// Returns all records, order unspecified.
    fn get_all(&self) -> RepoResult<Vec<Scribble>>;
    /// Upserts by id; never fails due to absence.
    fn update(&self, scribble: &Scribble) -> RepoResult<()>;
    /// Removes the record; succeeds as a no-op when absent.
    fn delete(&self, id: &str) -> RepoResult<()>;
    /// Removes all records.
    fn clear(&self) -> RepoResult<()>;
}

/// SQLite-backed scribble repository.
pub struct SqliteScribbleRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteScribbleRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ScribbleRepository for SqliteScribbleRepository<'_> {
    fn add(&self, scribble: &Scribble) -> RepoResult<()> {
        self.conn
            .execute(
                "INSERT INTO scribbles (id, content, drawing, timestamp)
                 VALUES (?1, ?2, ?3, ?4);",
                params![
                    scribble.id.as_str(),
                    scribble.content.as_deref(),
                    scribble.drawing.as_deref(),
                    scribble.timestamp,
                ],
            )
            .map_err(|err| map_insert_error(&scribble.id, err))?;
        Ok(())
    }

    fn get(&self, id: &str) -> RepoResult<Option<Scribble>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SCRIBBLE_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_scribble_row(row)?));
        }

        Ok(None)
    }

    fn get_all(&self) -> RepoResult<Vec<Scribble>> {
        let mut stmt = self.conn.prepare(&format!("{SCRIBBLE_SELECT_SQL};"))?;
        let mut rows = stmt.query([])?;
        let mut scribbles = Vec::new();

        while let Some(row) = rows.next()? {
            scribbles.push(parse_scribble_row(row)?);
        }

        Ok(scribbles)
    }

    fn update(&self, scribble: &Scribble) -> RepoResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO scribbles (id, content, drawing, timestamp)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                scribble.id.as_str(),
                scribble.content.as_deref(),
                scribble.drawing.as_deref(),
                scribble.timestamp,
            ],
        )?;
        Ok(())
    }

    fn delete(&self, id: &str) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM scribbles WHERE id = ?1;", [id])?;
        Ok(())
    }

    fn clear(&self) -> RepoResult<()> {
        self.conn.execute("DELETE FROM scribbles;", [])?;
        Ok(())
    }
}

fn map_insert_error(id: &str, err: rusqlite::Error) -> RepoError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation =>
        {
            RepoError::Constraint(id.to_string())
        }
        _ => RepoError::from(err),
    }
}

fn parse_scribble_row(row: &Row<'_>) -> RepoResult<Scribble> {
    let id: String = row.get("id")?;
    if id.is_empty() {
        return Err(RepoError::InvalidData(
            "empty id value in scribbles.id".to_string(),
        ));
    }

    Ok(Scribble {
        id,
        content: row.get("content")?,
        drawing: row.get("drawing")?,
        timestamp: row.get("timestamp")?,
    })
}

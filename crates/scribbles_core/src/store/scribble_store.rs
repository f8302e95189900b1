//! Session-scoped handle over the durable scribbles store.
//!
//! # Responsibility
//! - Run every store operation in its own transaction on a dedicated
//!   writer thread, in dispatch order.
//! - Expose fire-and-forget mutations and blocking reads.
//!
//! # Invariants
//! - No transaction is held open across operations.
//! - A disabled adapter accepts every call and persists nothing.

use crate::db::{open_db, DbResult, SCRIBBLES_SCHEMA};
use crate::model::scribble::{Scribble, ScribbleId};
use crate::repo::scribble_repo::{RepoError, RepoResult, ScribbleRepository, SqliteScribbleRepository};
use log::{error, info, warn};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::{self, JoinHandle};

pub type StoreResult<T> = Result<T, StoreError>;

/// Error surfaced by blocking store reads.
///
/// Fire-and-forget mutations never return one; their failures stay on the
/// writer thread's log.
#[derive(Debug)]
pub enum StoreError {
    Repo(RepoError),
    /// The writer thread is gone; only possible after teardown began.
    Closed,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Closed => write!(f, "store worker is no longer running"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Closed => None,
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

enum StoreJob {
    Add(Scribble),
    Update(Scribble),
    Delete(ScribbleId),
    Clear,
    Get(ScribbleId, Sender<StoreResult<Option<Scribble>>>),
    GetAll(Sender<StoreResult<Vec<Scribble>>>),
    Flush(Sender<()>),
}

struct ActiveStore {
    jobs: Sender<StoreJob>,
    worker: JoinHandle<()>,
}

/// Durable store adapter keyed by scribble id.
///
/// Constructed once per session and passed by reference; dropping it
/// drains the job queue and joins the writer thread.
pub struct ScribbleStore {
    inner: Option<ActiveStore>,
}

impl ScribbleStore {
    /// Opens the store at `path`, creating the schema on first run.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let conn = open_db(path, &[SCRIBBLES_SCHEMA])?;
        Ok(Self::with_connection(conn))
    }

    /// Opens a private in-memory store. Contents last for the adapter's
    /// lifetime only.
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = crate::db::open_db_in_memory(&[SCRIBBLES_SCHEMA])?;
        Ok(Self::with_connection(conn))
    }

    /// Opens the store, degrading to a disabled adapter when the engine
    /// cannot be opened on this host.
    ///
    /// Degradation is transparent to callers: every operation still
    /// succeeds, nothing persists, and the session keeps working from
    /// memory.
    pub fn open_or_disabled(path: impl AsRef<Path>) -> Self {
        match Self::open(path) {
            Ok(store) => store,
            Err(err) => {
                warn!("event=store_open module=store status=degraded error={err}");
                Self::disabled()
            }
        }
    }

    /// An adapter that accepts every call and persists nothing.
    pub fn disabled() -> Self {
        Self { inner: None }
    }

    fn with_connection(conn: Connection) -> Self {
        let (jobs, queue) = channel();
        let worker = thread::spawn(move || run_worker(conn, queue));
        info!("event=store_open module=store status=ok");
        Self {
            inner: Some(ActiveStore { jobs, worker }),
        }
    }

    /// Returns whether writes reach a durable engine.
    pub fn is_persistent(&self) -> bool {
        self.inner.is_some()
    }

    /// Inserts a new record. Fire-and-forget; a duplicate id is logged by
    /// the writer thread, not surfaced.
    pub fn add(&self, scribble: Scribble) {
        self.enqueue(StoreJob::Add(scribble));
    }

    /// Upserts a record by id. Fire-and-forget.
    pub fn update(&self, scribble: Scribble) {
        self.enqueue(StoreJob::Update(scribble));
    }

    /// Removes a record; absent ids are a silent no-op. Fire-and-forget.
    pub fn delete(&self, id: ScribbleId) {
        self.enqueue(StoreJob::Delete(id));
    }

    /// Removes all records. Fire-and-forget.
    pub fn clear(&self) {
        self.enqueue(StoreJob::Clear);
    }

    /// Returns the record for `id`, or `None` when absent (or disabled).
    ///
    /// Blocks until every previously enqueued mutation has committed.
    pub fn get(&self, id: &str) -> StoreResult<Option<Scribble>> {
        let Some(active) = &self.inner else {
            return Ok(None);
        };
        let (reply, response) = channel();
        active
            .jobs
            .send(StoreJob::Get(id.to_string(), reply))
            .map_err(|_| StoreError::Closed)?;
        response.recv().map_err(|_| StoreError::Closed)?
    }

    /// Returns all records, order unspecified; empty when disabled.
    pub fn get_all(&self) -> StoreResult<Vec<Scribble>> {
        let Some(active) = &self.inner else {
            return Ok(Vec::new());
        };
        let (reply, response) = channel();
        active
            .jobs
            .send(StoreJob::GetAll(reply))
            .map_err(|_| StoreError::Closed)?;
        response.recv().map_err(|_| StoreError::Closed)?
    }

    /// Barrier: resolves once every previously enqueued job has been
    /// processed. Used by tests and orderly shutdown.
    pub fn flush(&self) -> StoreResult<()> {
        let Some(active) = &self.inner else {
            return Ok(());
        };
        let (reply, response) = channel();
        active
            .jobs
            .send(StoreJob::Flush(reply))
            .map_err(|_| StoreError::Closed)?;
        response.recv().map_err(|_| StoreError::Closed)
    }

    fn enqueue(&self, job: StoreJob) {
        let Some(active) = &self.inner else {
            return;
        };
        if active.jobs.send(job).is_err() {
            error!("event=store_enqueue module=store status=error error=worker_gone");
        }
    }
}

impl Drop for ScribbleStore {
    fn drop(&mut self) {
        if let Some(ActiveStore { jobs, worker }) = self.inner.take() {
            drop(jobs);
            if worker.join().is_err() {
                error!("event=store_close module=store status=error error=worker_panicked");
            } else {
                info!("event=store_close module=store status=ok");
            }
        }
    }
}

fn run_worker(mut conn: Connection, queue: Receiver<StoreJob>) {
    while let Ok(job) = queue.recv() {
        match job {
            StoreJob::Add(scribble) => {
                let id = scribble.id.clone();
                log_write("add", &id, in_own_tx(&mut conn, |repo| repo.add(&scribble)));
            }
            StoreJob::Update(scribble) => {
                let id = scribble.id.clone();
                log_write(
                    "update",
                    &id,
                    in_own_tx(&mut conn, |repo| repo.update(&scribble)),
                );
            }
            StoreJob::Delete(id) => {
                log_write("delete", &id, in_own_tx(&mut conn, |repo| repo.delete(&id)));
            }
            StoreJob::Clear => {
                log_write("clear", "*", in_own_tx(&mut conn, |repo| repo.clear()));
            }
            StoreJob::Get(id, reply) => {
                let result = in_own_tx(&mut conn, |repo| repo.get(&id));
                let _ = reply.send(result.map_err(StoreError::from));
            }
            StoreJob::GetAll(reply) => {
                let result = in_own_tx(&mut conn, |repo| repo.get_all());
                let _ = reply.send(result.map_err(StoreError::from));
            }
            StoreJob::Flush(reply) => {
                let _ = reply.send(());
            }
        }
    }
}

/// Runs one repository operation inside its own transaction, released on
/// completion or failure.
fn in_own_tx<T>(
    conn: &mut Connection,
    op: impl FnOnce(&SqliteScribbleRepository<'_>) -> RepoResult<T>,
) -> RepoResult<T> {
    let tx = conn.transaction()?;
    let value = op(&SqliteScribbleRepository::new(&tx))?;
    tx.commit()?;
    Ok(value)
}

fn log_write(op: &str, id: &str, result: RepoResult<()>) {
    if let Err(err) = result {
        error!("event=store_write module=store op={op} id={id} status=error error={err}");
    }
}

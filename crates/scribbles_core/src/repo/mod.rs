//! Repository layer: keyed CRUD contracts and the SQLite implementation.
//!
//! # Responsibility
//! - Define the record-store access contract used by the durable adapter.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Read paths reject malformed persisted rows instead of masking them.
//! - `update` is an upsert; `delete` succeeds on absent keys.

pub mod scribble_repo;

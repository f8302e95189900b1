//! Domain model for the scribble engine.
//!
//! # Responsibility
//! - Define the persisted `Scribble` record and the transient
//!   `ViewLifecycle` flags used to animate creation/deletion.
//!
//! # Invariants
//! - `Scribble.id` is unique and never reused.
//! - `ViewLifecycle` is never persisted; absence of an entry means the
//!   note is settled.

pub mod scribble;

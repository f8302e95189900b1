//! Durable store adapter for scribbles.
//!
//! # Responsibility
//! - Keep the asynchronous, fire-and-forget persistence boundary between
//!   the session and the SQLite engine.
//! - Degrade to a transparent no-op adapter when the engine is
//!   unavailable on the host.
//!
//! # Invariants
//! - Jobs commit in dispatch order (single writer, FIFO queue).
//! - Mutation failures never propagate to callers; they are logged on the
//!   writer thread.

pub mod scribble_store;

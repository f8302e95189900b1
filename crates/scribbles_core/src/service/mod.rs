//! Session orchestration over the reducer and the durable store.
//!
//! # Responsibility
//! - Bridge reducer dispatches to fire-and-forget persistence.
//! - Own the deferred entry/exit transition timers.

pub mod scribble_session;
pub mod transitions;

//! Scribble record and per-note view lifecycle flags.
//!
//! # Responsibility
//! - Define the durable note shape shared by the reducer, the session and
//!   the store adapter.
//! - Provide the blank-note check backing the "never persist an empty
//!   record" rule.
//!
//! # Invariants
//! - A persisted scribble has non-empty `content` or non-empty `drawing`.
//! - `timestamp` is the last-modified instant in epoch milliseconds.

use serde::{Deserialize, Serialize};

/// Stable identifier for a scribble.
///
/// Ids are minted from the creation instant (decimal epoch milliseconds),
/// so they sort in creation order. Kept as an alias to make semantic
/// intent explicit in signatures.
pub type ScribbleId = String;

/// One user-created note: free text, an encoded drawing snapshot, or both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scribble {
    /// Primary key, creation-time derived, strictly increasing per session.
    pub id: ScribbleId,
    /// Optional text body.
    pub content: Option<String>,
    /// Optional encoded raster snapshot of a freehand drawing.
    pub drawing: Option<String>,
    /// Last-modified instant in epoch milliseconds.
    pub timestamp: i64,
}

impl Scribble {
    pub fn new(
        id: impl Into<ScribbleId>,
        content: Option<String>,
        drawing: Option<String>,
        timestamp: i64,
    ) -> Self {
        Self {
            id: id.into(),
            content,
            drawing,
            timestamp,
        }
    }

    /// Returns whether this scribble carries no visible payload.
    ///
    /// A blank scribble must never reach the durable store; the calling
    /// layer deletes it instead.
    pub fn is_blank(&self) -> bool {
        let no_content = self.content.as_deref().is_none_or(str::is_empty);
        let no_drawing = self.drawing.as_deref().is_none_or(str::is_empty);
        no_content && no_drawing
    }

    /// Refreshes the last-modified instant.
    pub fn touch(&mut self, now_ms: i64) {
        self.timestamp = now_ms;
    }
}

/// Transient per-note animation state. Never persisted.
///
/// An entry exists only while its note is mid-transition; once the
/// transition completes the entry is destroyed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewLifecycle {
    /// References a `Scribble.id`.
    pub id: ScribbleId,
    /// True while an entry animation is pending.
    pub to_create: bool,
    /// True while an exit animation is pending.
    pub to_delete: bool,
}

impl ViewLifecycle {
    /// Lifecycle entry for a note that was just added.
    pub fn creating(id: impl Into<ScribbleId>) -> Self {
        Self {
            id: id.into(),
            to_create: true,
            to_delete: false,
        }
    }

    /// Lifecycle entry for a note whose exit animation is starting.
    pub fn deleting(id: impl Into<ScribbleId>) -> Self {
        Self {
            id: id.into(),
            to_create: false,
            to_delete: true,
        }
    }

    /// Returns whether both transitions have completed.
    pub fn is_settled(&self) -> bool {
        !self.to_create && !self.to_delete
    }
}

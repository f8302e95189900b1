//! Discrete action events driving the reconciliation reducer.

use crate::model::scribble::{Scribble, ScribbleId};

/// The eight action kinds accepted by the reducer.
///
/// Every variant is matched exhaustively; adding a kind is a compile
/// error until each consumer handles it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Replaces the collection with a loaded snapshot (empty when the
    /// store had nothing or is disabled) and resets all lifecycle flags.
    /// Dispatched once at startup.
    Init { scribbles: Option<Vec<Scribble>> },
    /// Inserts a freshly created scribble and marks it `to_create`.
    Add { scribble: Scribble },
    /// Replaces the text body and refreshes the timestamp.
    UpdateContent { id: ScribbleId, content: String },
    /// Replaces the drawing snapshot and refreshes the timestamp.
    UpdateDrawing { id: ScribbleId, drawing: String },
    /// Marks a note `to_delete`; the note stays visible for the exit
    /// animation window.
    ToDelete { id: ScribbleId },
    /// Settles a note's entry transition.
    Created { id: ScribbleId },
    /// Removes the note and its lifecycle entry.
    Delete { id: ScribbleId },
    /// Empties both collections unconditionally.
    Clear,
}

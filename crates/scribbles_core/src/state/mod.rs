//! Reconciliation state: the note collection and its lifecycle flags.
//!
//! # Responsibility
//! - Define the state shape the reducer transforms and the session
//!   exposes.
//!
//! # Invariants
//! - `scribbles` never holds two records with the same id.
//! - `lifecycles` only holds entries for ids mid-transition.

use crate::model::scribble::{Scribble, ViewLifecycle};

pub mod action;
pub mod reducer;

/// In-memory state the presentation layer renders from.
///
/// The scribble collection is a write-ahead cache of the durable store;
/// lifecycle entries have no durable counterpart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScribbleState {
    pub scribbles: Vec<Scribble>,
    pub lifecycles: Vec<ViewLifecycle>,
}

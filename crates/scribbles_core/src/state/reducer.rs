//! Deterministic state transitions over (notes, lifecycle flags).
//!
//! # Responsibility
//! - Apply one action to the state, synchronously and without I/O.
//!
//! # Invariants
//! - Total over the action set: no input can make it fail.
//! - Pure: the clock is an explicit input, so equal inputs give equal
//!   outputs.
//! - Unknown ids degrade to no-ops; stale animation timers may dispatch
//!   after the note was removed by a concurrent `Clear`.

use crate::model::scribble::{Scribble, ViewLifecycle};
use crate::state::action::Action;
use crate::state::ScribbleState;

/// Applies `action` to `state`. `now_ms` stamps updated records.
pub fn reduce(state: ScribbleState, action: &Action, now_ms: i64) -> ScribbleState {
    match action {
        Action::Init { scribbles } => ScribbleState {
            scribbles: scribbles.clone().unwrap_or_default(),
            lifecycles: Vec::new(),
        },
        Action::Add { scribble } => add(state, scribble),
        Action::UpdateContent { id, content } => update_record(state, id, now_ms, |record| {
            record.content = Some(content.clone());
        }),
        Action::UpdateDrawing { id, drawing } => update_record(state, id, now_ms, |record| {
            record.drawing = Some(drawing.clone());
        }),
        Action::ToDelete { id } => to_delete(state, id),
        Action::Created { id } => created(state, id),
        Action::Delete { id } => ScribbleState {
            scribbles: retain_other_ids(state.scribbles, id),
            lifecycles: state
                .lifecycles
                .into_iter()
                .filter(|lifecycle| lifecycle.id != *id)
                .collect(),
        },
        Action::Clear => ScribbleState::default(),
    }
}

fn add(state: ScribbleState, scribble: &Scribble) -> ScribbleState {
    // Defensive: a duplicate id would break the uniqueness invariant, so
    // the whole dispatch is ignored.
    if state.scribbles.iter().any(|existing| existing.id == scribble.id) {
        return state;
    }

    let ScribbleState {
        scribbles: rest,
        lifecycles: rest_lifecycles,
    } = state;

    let mut scribbles = Vec::with_capacity(rest.len() + 1);
    scribbles.push(scribble.clone());
    scribbles.extend(rest);

    let mut lifecycles = Vec::with_capacity(rest_lifecycles.len() + 1);
    lifecycles.push(ViewLifecycle::creating(scribble.id.clone()));
    lifecycles.extend(rest_lifecycles);

    ScribbleState {
        scribbles,
        lifecycles,
    }
}

fn update_record(
    mut state: ScribbleState,
    id: &str,
    now_ms: i64,
    apply: impl FnOnce(&mut Scribble),
) -> ScribbleState {
    match state.scribbles.iter_mut().find(|record| record.id == id) {
        Some(record) => {
            apply(record);
            record.touch(now_ms);
            state
        }
        None => state,
    }
}

fn to_delete(mut state: ScribbleState, id: &str) -> ScribbleState {
    // Lifecycle entries reference live notes only.
    if !state.scribbles.iter().any(|record| record.id == id) {
        return state;
    }

    match state
        .lifecycles
        .iter_mut()
        .find(|lifecycle| lifecycle.id == id)
    {
        Some(lifecycle) => lifecycle.to_delete = true,
        None => state.lifecycles.push(ViewLifecycle::deleting(id)),
    }
    state
}

fn created(mut state: ScribbleState, id: &str) -> ScribbleState {
    let Some(position) = state
        .lifecycles
        .iter()
        .position(|lifecycle| lifecycle.id == id)
    else {
        return state;
    };

    if state.lifecycles[position].to_delete {
        // Exit transition still pending; only the entry flag settles.
        state.lifecycles[position].to_create = false;
    } else {
        // Fully settled notes carry no lifecycle entry at all.
        state.lifecycles.remove(position);
    }
    state
}

fn retain_other_ids(scribbles: Vec<Scribble>, id: &str) -> Vec<Scribble> {
    scribbles
        .into_iter()
        .filter(|record| record.id != id)
        .collect()
}

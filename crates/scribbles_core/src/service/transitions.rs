//! Id-keyed timers for deferred lifecycle dispatches.
//!
//! # Responsibility
//! - Track the pending `Created` and `Delete` continuations per note id,
//!   so a later `Clear` or a duplicate delete request can be checked
//!   against still-armed timers instead of relying on no-op idempotence
//!   alone.
//!
//! # Invariants
//! - At most one pending `Created` and one pending `Delete` per id.
//! - Taking due entries removes them; timers fire at most once.

use crate::model::scribble::ScribbleId;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Exit-animation window between `ToDelete` and the actual `Delete`.
pub const EXIT_TRANSITION_DELAY: Duration = Duration::from_millis(250);

/// Deferred dispatch kinds a timer can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredDispatch {
    Created,
    Delete,
}

#[derive(Debug, Default)]
struct PendingTransition {
    created_due: Option<Instant>,
    delete_due: Option<Instant>,
}

impl PendingTransition {
    fn is_empty(&self) -> bool {
        self.created_due.is_none() && self.delete_due.is_none()
    }
}

/// Cooperative timer table for deferred transition dispatches.
#[derive(Debug, Default)]
pub struct TransitionTimers {
    pending: HashMap<ScribbleId, PendingTransition>,
}

impl TransitionTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms the zero-delay `Created` continuation for a just-added note.
    pub fn arm_created(&mut self, id: ScribbleId, due: Instant) {
        self.pending.entry(id).or_default().created_due = Some(due);
    }

    /// Arms the delayed `Delete` continuation for a note entering its
    /// exit animation.
    ///
    /// Returns `false` without re-arming when a delete is already
    /// pending for this id, making repeated delete requests idempotent.
    pub fn arm_delete(&mut self, id: ScribbleId, due: Instant) -> bool {
        let entry = self.pending.entry(id).or_default();
        if entry.delete_due.is_some() {
            return false;
        }
        entry.delete_due = Some(due);
        true
    }

    /// Returns whether a `Delete` is already armed for `id`.
    pub fn has_pending_delete(&self, id: &str) -> bool {
        self.pending
            .get(id)
            .is_some_and(|entry| entry.delete_due.is_some())
    }

    /// Cancels all timers for one id.
    pub fn cancel(&mut self, id: &str) {
        self.pending.remove(id);
    }

    /// Cancels every pending timer.
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Removes and returns every continuation due at `now`, ordered by
    /// deadline then id so replays are deterministic.
    pub fn take_due(&mut self, now: Instant) -> Vec<(ScribbleId, DeferredDispatch)> {
        let mut due: Vec<(Instant, ScribbleId, DeferredDispatch)> = Vec::new();

        for (id, entry) in &mut self.pending {
            if let Some(instant) = entry.created_due {
                if instant <= now {
                    entry.created_due = None;
                    due.push((instant, id.clone(), DeferredDispatch::Created));
                }
            }
            if let Some(instant) = entry.delete_due {
                if instant <= now {
                    entry.delete_due = None;
                    due.push((instant, id.clone(), DeferredDispatch::Delete));
                }
            }
        }
        self.pending.retain(|_, entry| !entry.is_empty());

        due.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
        due.into_iter()
            .map(|(_, id, dispatch)| (id, dispatch))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{DeferredDispatch, TransitionTimers};
    use std::time::{Duration, Instant};

    #[test]
    fn arm_delete_is_idempotent_per_id() {
        let mut timers = TransitionTimers::new();
        let now = Instant::now();

        assert!(timers.arm_delete("1".to_string(), now));
        assert!(!timers.arm_delete("1".to_string(), now + Duration::from_secs(1)));
        assert!(timers.has_pending_delete("1"));

        let due = timers.take_due(now);
        assert_eq!(due, vec![("1".to_string(), DeferredDispatch::Delete)]);
        assert!(timers.is_empty());
    }

    #[test]
    fn take_due_leaves_future_timers_armed() {
        let mut timers = TransitionTimers::new();
        let now = Instant::now();

        timers.arm_created("1".to_string(), now);
        timers.arm_delete("2".to_string(), now + Duration::from_millis(250));

        let due = timers.take_due(now);
        assert_eq!(due, vec![("1".to_string(), DeferredDispatch::Created)]);
        assert_eq!(timers.len(), 1);

        let later = timers.take_due(now + Duration::from_millis(250));
        assert_eq!(later, vec![("2".to_string(), DeferredDispatch::Delete)]);
    }

    #[test]
    fn cancel_all_discards_pending_timers() {
        let mut timers = TransitionTimers::new();
        let now = Instant::now();

        timers.arm_created("1".to_string(), now);
        timers.arm_delete("2".to_string(), now);
        timers.cancel_all();

        assert!(timers.take_due(now + Duration::from_secs(1)).is_empty());
    }
}

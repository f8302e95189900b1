//! Scribble session: dispatch orchestration and persistence mirroring.
//!
//! # Responsibility
//! - Apply reducer dispatches synchronously and mirror the
//!   persistence-relevant ones into the durable store without letting
//!   storage latency block state changes.
//! - Arm and run the deferred entry/exit transition dispatches.
//!
//! # Invariants
//! - In-memory state is the source of truth for the running session
//!   regardless of persistence outcome.
//! - A blank record (no content, no drawing) is never sent to the store.
//! - `ToDelete` and `Created` never touch the store.

use crate::model::scribble::{Scribble, ScribbleId, ViewLifecycle};
use crate::service::transitions::{
    DeferredDispatch, TransitionTimers, EXIT_TRANSITION_DELAY,
};
use crate::state::action::Action;
use crate::state::reducer::reduce;
use crate::state::ScribbleState;
use crate::store::scribble_store::{ScribbleStore, StoreResult};
use log::{debug, warn};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Persistence job derived from one dispatched action.
enum PersistJob {
    Add(Scribble),
    Update(Scribble),
    Delete(ScribbleId),
    Clear,
}

/// Session-scoped orchestrator over the reducer and the durable store.
///
/// One instance per application session; constructed at startup with its
/// store handle and dropped at shutdown.
pub struct ScribbleSession {
    state: ScribbleState,
    store: ScribbleStore,
    timers: TransitionTimers,
    initialized: bool,
    last_issued_id_ms: i64,
}

impl ScribbleSession {
    pub fn new(store: ScribbleStore) -> Self {
        Self {
            state: ScribbleState::default(),
            store,
            timers: TransitionTimers::new(),
            initialized: false,
            last_issued_id_ms: 0,
        }
    }

    /// Synthesizes a new scribble with a fresh unique id and the current
    /// timestamp. Does not mutate state; the caller dispatches `Add`
    /// separately.
    pub fn create_scribble(&mut self, content: Option<&str>, drawing: Option<&str>) -> Scribble {
        let now_ms = now_epoch_ms();
        // Creation-time-derived ids must stay strictly increasing even
        // when two are minted in the same millisecond.
        let id_ms = if now_ms <= self.last_issued_id_ms {
            self.last_issued_id_ms + 1
        } else {
            now_ms
        };
        self.last_issued_id_ms = id_ms;

        Scribble::new(
            id_ms.to_string(),
            Some(content.unwrap_or_default().to_string()),
            drawing.map(str::to_string),
            now_ms,
        )
    }

    /// Loads the persisted snapshot and dispatches `Init`.
    ///
    /// Runs once per session lifetime; later calls warn and no-op. In
    /// degraded (non-persistent) mode the state initializes empty.
    pub fn init_scribbles(&mut self) -> StoreResult<()> {
        if self.initialized {
            warn!("event=session_init module=session status=ignored reason=already_initialized");
            return Ok(());
        }

        let snapshot = if self.store.is_persistent() {
            Some(self.store.get_all()?)
        } else {
            None
        };
        self.initialized = true;
        self.dispatch(Action::Init {
            scribbles: snapshot,
        });
        Ok(())
    }

    /// Applies the reducer synchronously, arms deferred transitions, and
    /// mirrors persistence-relevant actions into the store
    /// fire-and-forget.
    pub fn dispatch(&mut self, action: Action) {
        let now_ms = now_epoch_ms();
        // The mirror record is derived from pre-mutation state: the
        // changed field is merged into the stored shape with a refreshed
        // timestamp.
        let mirror = self.mirror_for(&action, now_ms);

        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, &action, now_ms);

        self.sync_timers(&action);

        match mirror {
            Some(PersistJob::Add(scribble)) => self.store.add(scribble),
            Some(PersistJob::Update(scribble)) => self.store.update(scribble),
            Some(PersistJob::Delete(id)) => self.store.delete(id),
            Some(PersistJob::Clear) => self.store.clear(),
            None => {}
        }
    }

    /// Fires every deferred transition due by now.
    pub fn run_due_transitions(&mut self) -> usize {
        self.run_due_transitions_at(Instant::now())
    }

    /// Fires every deferred transition due at `now`. Returns how many
    /// dispatches ran.
    pub fn run_due_transitions_at(&mut self, now: Instant) -> usize {
        let due = self.timers.take_due(now);
        let fired = due.len();
        for (id, dispatch) in due {
            match dispatch {
                DeferredDispatch::Created => self.dispatch(Action::Created { id }),
                DeferredDispatch::Delete => self.dispatch(Action::Delete { id }),
            }
        }
        fired
    }

    /// Read model: notes sorted descending by last-modified timestamp.
    ///
    /// Recomputed on every call since timestamps mutate in place. The
    /// sort is stable, so same-instant notes keep insertion order.
    pub fn scribbles(&self) -> Vec<Scribble> {
        let mut sorted = self.state.scribbles.clone();
        sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        sorted
    }

    /// Transient lifecycle flags for notes mid-transition.
    pub fn lifecycles(&self) -> &[ViewLifecycle] {
        &self.state.lifecycles
    }

    /// Lifecycle entry for one id, when it is mid-transition.
    pub fn lifecycle(&self, id: &str) -> Option<&ViewLifecycle> {
        self.state
            .lifecycles
            .iter()
            .find(|lifecycle| lifecycle.id == id)
    }

    /// The durable store handle this session mirrors into.
    pub fn store(&self) -> &ScribbleStore {
        &self.store
    }

    /// Number of ids with at least one deferred transition armed.
    pub fn pending_transitions(&self) -> usize {
        self.timers.len()
    }

    fn mirror_for(&self, action: &Action, now_ms: i64) -> Option<PersistJob> {
        match action {
            Action::Add { scribble } => {
                if scribble.is_blank() {
                    debug!(
                        "event=persist_skip module=session op=add id={} reason=blank_record",
                        scribble.id
                    );
                    return None;
                }
                Some(PersistJob::Add(scribble.clone()))
            }
            Action::UpdateContent { id, content } => self.merged_update(id, now_ms, |record| {
                record.content = Some(content.clone());
            }),
            Action::UpdateDrawing { id, drawing } => self.merged_update(id, now_ms, |record| {
                record.drawing = Some(drawing.clone());
            }),
            Action::Delete { id } => Some(PersistJob::Delete(id.clone())),
            Action::Clear => Some(PersistJob::Clear),
            Action::Init { .. } | Action::ToDelete { .. } | Action::Created { .. } => None,
        }
    }

    fn merged_update(
        &self,
        id: &str,
        now_ms: i64,
        apply: impl FnOnce(&mut Scribble),
    ) -> Option<PersistJob> {
        let target = self.state.scribbles.iter().find(|record| record.id == id)?;
        let mut merged = target.clone();
        apply(&mut merged);
        merged.touch(now_ms);

        if merged.is_blank() {
            // The calling layer follows up with ToDelete/Delete; an empty
            // record must never reach the store.
            debug!("event=persist_skip module=session op=update id={id} reason=blank_record");
            return None;
        }
        Some(PersistJob::Update(merged))
    }

    /// Keeps the timer table consistent with the action just reduced.
    fn sync_timers(&mut self, action: &Action) {
        match action {
            Action::Add { scribble } => {
                // Armed only when the add actually took (duplicate ids
                // reduce to a no-op).
                if self
                    .state
                    .lifecycles
                    .iter()
                    .any(|lifecycle| lifecycle.id == scribble.id && lifecycle.to_create)
                {
                    self.timers.arm_created(scribble.id.clone(), Instant::now());
                }
            }
            Action::ToDelete { id } => {
                if self
                    .state
                    .lifecycles
                    .iter()
                    .any(|lifecycle| lifecycle.id == *id && lifecycle.to_delete)
                {
                    self.timers
                        .arm_delete(id.clone(), Instant::now() + EXIT_TRANSITION_DELAY);
                }
            }
            Action::Delete { id } => self.timers.cancel(id),
            Action::Clear | Action::Init { .. } => self.timers.cancel_all(),
            Action::Created { .. } | Action::UpdateContent { .. } | Action::UpdateDrawing { .. } => {
            }
        }
    }
}

fn now_epoch_ms() -> i64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_millis() as i64,
        // Clock before the epoch; stamp zero rather than fail a dispatch.
        Err(_) => 0,
    }
}

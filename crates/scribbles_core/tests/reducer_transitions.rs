use scribbles_core::{reduce, Action, Scribble, ScribbleState, ViewLifecycle};

const NOW: i64 = 1_000;

fn scribble(id: &str, content: &str, timestamp: i64) -> Scribble {
    Scribble::new(id, Some(content.to_string()), None, timestamp)
}

fn with_note(id: &str) -> ScribbleState {
    reduce(
        ScribbleState::default(),
        &Action::Add {
            scribble: scribble(id, "note", 100),
        },
        NOW,
    )
}

#[test]
fn add_inserts_at_head_and_marks_creating() {
    let state = with_note("1");

    assert_eq!(state.scribbles.len(), 1);
    assert_eq!(state.scribbles[0].id, "1");
    assert_eq!(
        state.lifecycles,
        vec![ViewLifecycle {
            id: "1".to_string(),
            to_create: true,
            to_delete: false,
        }]
    );

    let state = reduce(
        state,
        &Action::Add {
            scribble: scribble("2", "newer", 200),
        },
        NOW,
    );
    assert_eq!(state.scribbles[0].id, "2");
    assert_eq!(state.scribbles[1].id, "1");
}

#[test]
fn duplicate_add_keeps_collection_unique() {
    let state = with_note("1");
    let same_id_again = reduce(
        state.clone(),
        &Action::Add {
            scribble: scribble("1", "imposter", 999),
        },
        NOW,
    );

    assert_eq!(same_id_again, state);
}

#[test]
fn created_settles_and_destroys_the_lifecycle_entry() {
    let state = with_note("1");
    let state = reduce(
        state,
        &Action::Created {
            id: "1".to_string(),
        },
        NOW,
    );

    assert_eq!(state.scribbles.len(), 1);
    assert!(state.lifecycles.is_empty());
}

#[test]
fn created_with_pending_delete_only_clears_the_entry_flag() {
    let state = with_note("1");
    let state = reduce(
        state,
        &Action::ToDelete {
            id: "1".to_string(),
        },
        NOW,
    );
    let state = reduce(
        state,
        &Action::Created {
            id: "1".to_string(),
        },
        NOW,
    );

    assert_eq!(
        state.lifecycles,
        vec![ViewLifecycle {
            id: "1".to_string(),
            to_create: false,
            to_delete: true,
        }]
    );
}

#[test]
fn to_delete_freezes_the_note_until_delete() {
    let state = with_note("1");
    let state = reduce(
        state,
        &Action::ToDelete {
            id: "1".to_string(),
        },
        NOW,
    );

    // The note stays visible during the exit animation window.
    assert_eq!(state.scribbles.len(), 1);
    assert!(state.lifecycles[0].to_delete);

    let state = reduce(
        state,
        &Action::Delete {
            id: "1".to_string(),
        },
        NOW,
    );
    assert!(state.scribbles.is_empty());
    assert!(state.lifecycles.is_empty());
}

#[test]
fn delete_without_prior_to_delete_removes_cleanly() {
    let state = with_note("1");
    let state = reduce(
        state,
        &Action::Delete {
            id: "1".to_string(),
        },
        NOW,
    );

    assert!(state.scribbles.is_empty());
    assert!(state.lifecycles.is_empty());
}

#[test]
fn update_content_replaces_field_and_refreshes_timestamp() {
    let state = with_note("1");
    let state = reduce(
        state,
        &Action::UpdateContent {
            id: "1".to_string(),
            content: "edited".to_string(),
        },
        NOW,
    );

    assert_eq!(state.scribbles[0].content.as_deref(), Some("edited"));
    assert_eq!(state.scribbles[0].timestamp, NOW);
}

#[test]
fn update_drawing_replaces_field_and_refreshes_timestamp() {
    let state = with_note("1");
    let state = reduce(
        state,
        &Action::UpdateDrawing {
            id: "1".to_string(),
            drawing: "data:image/png;base64,AAAA".to_string(),
        },
        NOW,
    );

    assert_eq!(
        state.scribbles[0].drawing.as_deref(),
        Some("data:image/png;base64,AAAA")
    );
    assert_eq!(state.scribbles[0].timestamp, NOW);
}

#[test]
fn updates_on_unknown_ids_return_state_unchanged() {
    let state = with_note("1");

    for action in [
        Action::UpdateContent {
            id: "missing".to_string(),
            content: "x".to_string(),
        },
        Action::UpdateDrawing {
            id: "missing".to_string(),
            drawing: "y".to_string(),
        },
        Action::ToDelete {
            id: "missing".to_string(),
        },
        Action::Delete {
            id: "missing".to_string(),
        },
        Action::Created {
            id: "missing".to_string(),
        },
    ] {
        assert_eq!(reduce(state.clone(), &action, NOW), state);
    }
}

#[test]
fn to_delete_for_an_unknown_note_creates_no_orphan_entry() {
    let state = reduce(
        ScribbleState::default(),
        &Action::ToDelete {
            id: "ghost".to_string(),
        },
        NOW,
    );

    assert!(state.lifecycles.is_empty());
}

#[test]
fn clear_empties_both_collections() {
    let mut state = with_note("1");
    state = reduce(
        state,
        &Action::Add {
            scribble: scribble("2", "second", 200),
        },
        NOW,
    );
    state = reduce(
        state,
        &Action::ToDelete {
            id: "2".to_string(),
        },
        NOW,
    );

    let cleared = reduce(state, &Action::Clear, NOW);
    assert_eq!(cleared, ScribbleState::default());
}

#[test]
fn init_replaces_the_collection_and_resets_lifecycles() {
    let stale = with_note("stale");
    let snapshot = vec![scribble("1", "a", 100)];

    let state = reduce(
        stale,
        &Action::Init {
            scribbles: Some(snapshot.clone()),
        },
        NOW,
    );
    assert_eq!(state.scribbles, snapshot);
    assert!(state.lifecycles.is_empty());

    let empty = reduce(state, &Action::Init { scribbles: None }, NOW);
    assert_eq!(empty, ScribbleState::default());
}

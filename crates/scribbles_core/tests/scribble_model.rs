use scribbles_core::{Scribble, ViewLifecycle};

#[test]
fn scribble_serialization_uses_expected_wire_fields() {
    let note = Scribble::new(
        "1700000000000",
        Some("shopping list".to_string()),
        Some("data:image/png;base64,AAAA".to_string()),
        1_700_000_000_000,
    );

    let json = serde_json::to_value(&note).unwrap();
    assert_eq!(json["id"], "1700000000000");
    assert_eq!(json["content"], "shopping list");
    assert_eq!(json["drawing"], "data:image/png;base64,AAAA");
    assert_eq!(json["timestamp"], 1_700_000_000_000_i64);

    let decoded: Scribble = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, note);
}

#[test]
fn absent_fields_deserialize_to_none() {
    let decoded: Scribble = serde_json::from_str(
        r#"{"id":"1","content":null,"drawing":null,"timestamp":100}"#,
    )
    .unwrap();

    assert_eq!(decoded.content, None);
    assert_eq!(decoded.drawing, None);
}

#[test]
fn is_blank_requires_both_fields_empty() {
    let blank = Scribble::new("1", Some(String::new()), None, 100);
    assert!(blank.is_blank());
    assert!(Scribble::new("2", None, None, 100).is_blank());
    assert!(Scribble::new("3", None, Some(String::new()), 100).is_blank());

    assert!(!Scribble::new("4", Some("text".to_string()), None, 100).is_blank());
    assert!(!Scribble::new("5", None, Some("data:".to_string()), 100).is_blank());
}

#[test]
fn touch_refreshes_the_timestamp() {
    let mut note = Scribble::new("1", Some("a".to_string()), None, 100);
    note.touch(500);
    assert_eq!(note.timestamp, 500);
}

#[test]
fn lifecycle_constructors_mark_one_pending_transition() {
    let creating = ViewLifecycle::creating("1");
    assert!(creating.to_create && !creating.to_delete);
    assert!(!creating.is_settled());

    let deleting = ViewLifecycle::deleting("1");
    assert!(!deleting.to_create && deleting.to_delete);
    assert!(!deleting.is_settled());
}

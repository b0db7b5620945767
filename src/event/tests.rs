use super::*;
use serde_json::json;

#[test]
fn test_transition_event_serialization() {
    let event = OfficeEvent::transition(EventKind::Door, "Door status updated", false, true);

    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["kind"], json!("door"));
    assert_eq!(value["severity"], json!("INFO"));
    assert_eq!(value["previous"], json!(false));
    assert_eq!(value["current"], json!(true));
    assert!(value["eventId"].is_string());
    assert!(value["timestamp"].as_i64().unwrap() > 0);
}

#[test]
fn test_alert_event_omits_previous() {
    let event = OfficeEvent::alert(
        EventKind::GarbageAlert,
        Severity::Critical,
        "Garbage level critical",
        97.5,
    );

    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["kind"], json!("garbage_alert"));
    assert_eq!(value["severity"], json!("CRITICAL"));
    assert_eq!(value["current"], json!(97.5));
    assert!(value.get("previous").is_none());
}

#[test]
fn test_plain_event_has_no_values() {
    let event = OfficeEvent::new(EventKind::Reset, Severity::Info, "reset");

    assert!(event.previous.is_none());
    assert!(event.current.is_none());

    let value = serde_json::to_value(&event).unwrap();
    assert!(value.get("current").is_none());
}

#[test]
fn test_event_ids_are_unique() {
    let a = OfficeEvent::new(EventKind::Gas, Severity::Info, "a");
    let b = OfficeEvent::new(EventKind::Gas, Severity::Info, "b");
    assert_ne!(a.event_id, b.event_id);
}

#[test]
fn test_event_round_trip() {
    let event = OfficeEvent::transition(EventKind::Users, "User count updated", 0, 4);
    let text = serde_json::to_string(&event).unwrap();
    let parsed: OfficeEvent = serde_json::from_str(&text).unwrap();

    assert_eq!(parsed.event_id, event.event_id);
    assert_eq!(parsed.kind, EventKind::Users);
    assert_eq!(parsed.current, Some(json!(4)));
}

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[cfg(test)]
mod tests;

/// How urgently an event needs attention
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

/// What changed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Door,
    Light,
    Fan,
    Temperature,
    TemperatureAlert,
    Garbage,
    GarbageAlert,
    Gas,
    Users,
    Reset,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Door => "door",
            EventKind::Light => "light",
            EventKind::Fan => "fan",
            EventKind::Temperature => "temperature",
            EventKind::TemperatureAlert => "temperature_alert",
            EventKind::Garbage => "garbage",
            EventKind::GarbageAlert => "garbage_alert",
            EventKind::Gas => "gas",
            EventKind::Users => "users",
            EventKind::Reset => "reset",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// OfficeEvent records a single state transition or threshold alert.
///
/// Broadcast by `OfficeService` while it still holds the state lock, so
/// subscribers receive events in the order the mutations were applied.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OfficeEvent {
    /// UUIDv7 identifier (time-ordered)
    #[serde(rename = "eventId")]
    pub event_id: String,

    pub kind: EventKind,

    pub severity: Severity,

    /// Human-readable summary
    pub message: String,

    /// Value before the transition, if the event describes one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<Value>,

    /// Value after the transition
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<Value>,

    /// Unix epoch milliseconds
    pub timestamp: i64,
}

impl OfficeEvent {
    pub fn new(kind: EventKind, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            event_id: uuid::Uuid::now_v7().to_string(),
            kind,
            severity,
            message: message.into(),
            previous: None,
            current: None,
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    /// Informational before/after transition event
    pub fn transition(
        kind: EventKind,
        message: impl Into<String>,
        previous: impl Into<Value>,
        current: impl Into<Value>,
    ) -> Self {
        let mut event = Self::new(kind, Severity::Info, message);
        event.previous = Some(previous.into());
        event.current = Some(current.into());
        event
    }

    /// Threshold alert carrying the offending value
    pub fn alert(
        kind: EventKind,
        severity: Severity,
        message: impl Into<String>,
        current: impl Into<Value>,
    ) -> Self {
        let mut event = Self::new(kind, severity, message);
        event.current = Some(current.into());
        event
    }
}

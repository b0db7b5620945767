use crate::event::{EventKind, OfficeEvent, Severity};
use crate::service::RandomSource;
use crate::state::{clamp_percent, Level, OfficeState};
use parking_lot::RwLock;
use std::fmt;
use tokio::sync::broadcast;
use tracing::{error, field, info, warn};

/// Default buffer of the event broadcast channel
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Single summarizing label for the whole office.
///
/// Variants are listed from highest to lowest priority; only the highest
/// active condition is ever reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SystemStatus {
    Emergency,
    GarbageFull,
    Temperature(Level),
    GarbageHigh,
    Normal,
}

impl SystemStatus {
    /// Summarize a state snapshot
    pub fn of(state: &OfficeState) -> Self {
        if state.gas_detected() {
            return SystemStatus::Emergency;
        }
        if state.is_critical_garbage_level() {
            return SystemStatus::GarbageFull;
        }
        let temperature = state.temperature_status();
        if temperature != Level::Normal {
            return SystemStatus::Temperature(temperature);
        }
        if state.needs_garbage_alert() {
            return SystemStatus::GarbageHigh;
        }
        SystemStatus::Normal
    }
}

impl fmt::Display for SystemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SystemStatus::Emergency => f.write_str("EMERGENCY - Gas Detected"),
            SystemStatus::GarbageFull => f.write_str("CRITICAL - Garbage Full"),
            SystemStatus::Temperature(level) => write!(f, "WARNING - Temperature {}", level),
            SystemStatus::GarbageHigh => f.write_str("WARNING - Garbage Level High"),
            SystemStatus::Normal => f.write_str("NORMAL"),
        }
    }
}

/// Office service owns the office state and is the only place it changes
///
/// Every mutation runs inside one write-lock critical section together with
/// the broadcast of its events, so subscribers see events in the same order
/// the mutations were applied. Logging happens after the lock is released.
pub struct OfficeService {
    state: RwLock<OfficeState>,

    /// Broadcast channel for transitions and alerts
    event_tx: broadcast::Sender<OfficeEvent>,
}

impl OfficeService {
    /// Create service with default state
    pub fn new() -> Self {
        Self::with_event_capacity(DEFAULT_EVENT_CAPACITY)
    }

    pub fn with_event_capacity(capacity: usize) -> Self {
        let (event_tx, _) = broadcast::channel(capacity.max(1));
        let state = OfficeState::new();

        info!(
            room_temperature = state.room_temperature(),
            garbage_level = state.garbage_level(),
            "Office service initialized with default state"
        );

        Self {
            state: RwLock::new(state),
            event_tx,
        }
    }

    /// Snapshot of the current state
    pub fn office_state(&self) -> OfficeState {
        self.state.read().clone()
    }

    /// Subscribe to transitions and alerts
    pub fn subscribe(&self) -> broadcast::Receiver<OfficeEvent> {
        self.event_tx.subscribe()
    }

    /// Number of live event subscribers
    pub fn subscriber_count(&self) -> usize {
        self.event_tx.receiver_count()
    }

    pub fn update_door_status(&self, open: bool) {
        self.commit(|state| {
            let previous = state.door_open();
            state.set_door_open(open);
            let event = OfficeEvent::transition(
                EventKind::Door,
                format!("Door status updated: {} -> {}", previous, open),
                previous,
                open,
            );
            ((), vec![event])
        })
    }

    pub fn update_light_status(&self, on: bool) {
        self.commit(|state| {
            let previous = state.light_on();
            state.set_light_on(on);
            let event = OfficeEvent::transition(
                EventKind::Light,
                format!("Light status updated: {} -> {}", previous, on),
                previous,
                on,
            );
            ((), vec![event])
        })
    }

    pub fn update_fan_status(&self, on: bool) {
        self.commit(|state| {
            let previous = state.fan_on();
            state.set_fan_on(on);
            let event = OfficeEvent::transition(
                EventKind::Fan,
                format!("Fan status updated: {} -> {}", previous, on),
                previous,
                on,
            );
            ((), vec![event])
        })
    }

    /// Apply a temperature reading; anything outside the NORMAL band raises
    /// a WARNING alert carrying the band label.
    pub fn update_temperature(&self, celsius: f64) {
        self.commit(|state| ((), apply_temperature(state, celsius)))
    }

    /// Apply a garbage reading (clamped to [0, 100]) and raise a CRITICAL or
    /// WARNING alert when a threshold is reached. Returns the stored level.
    pub fn update_garbage_level(&self, level: f64) -> f64 {
        self.commit(|state| apply_garbage(state, level))
    }

    pub fn update_gas_detection(&self, detected: bool) {
        self.commit(|state| {
            let previous = state.gas_detected();
            state.set_gas_detected(detected);

            let event = if detected {
                let mut event = OfficeEvent::alert(
                    EventKind::Gas,
                    Severity::Critical,
                    "GAS DETECTED! Emergency alert triggered!",
                    true,
                );
                event.previous = Some(previous.into());
                event
            } else {
                OfficeEvent::transition(EventKind::Gas, "Gas detection cleared", previous, false)
            };
            ((), vec![event])
        })
    }

    pub fn update_user_count(&self, count: u32) {
        self.commit(|state| {
            let previous = state.total_users();
            state.set_total_users(count);
            let event = OfficeEvent::transition(
                EventKind::Users,
                format!("User count updated: {} -> {}", previous, count),
                previous,
                count,
            );
            ((), vec![event])
        })
    }

    /// No gas, temperature in the NORMAL band and garbage below critical
    pub fn is_system_healthy(&self) -> bool {
        is_healthy(&self.state.read())
    }

    pub fn system_status(&self) -> SystemStatus {
        SystemStatus::of(&self.state.read())
    }

    /// Replace the state wholesale with a fresh default
    pub fn reset_to_defaults(&self) {
        self.commit(|state| {
            *state = OfficeState::new();
            let event = OfficeEvent::new(
                EventKind::Reset,
                Severity::Info,
                "Office state reset to defaults",
            );
            ((), vec![event])
        })
    }

    /// Drift the temperature by up to ±1°C and apply it. Returns the value
    /// applied.
    ///
    /// The random draw happens before the lock is taken; the read of the
    /// current value and the write of the new one share one critical section.
    pub fn simulate_temperature_change(&self, rng: &mut dyn RandomSource) -> f64 {
        let delta = (rng.next_unit() - 0.5) * 2.0;
        self.commit(|state| {
            let next = round_one_decimal(state.room_temperature() + delta);
            (next, apply_temperature(state, next))
        })
    }

    /// Move the garbage level by a delta in [-1.5, 3.5), biased upwards,
    /// and apply it. Returns the value applied.
    pub fn simulate_garbage_level_change(&self, rng: &mut dyn RandomSource) -> f64 {
        let delta = (rng.next_unit() - 0.3) * 5.0;
        self.commit(|state| {
            let next = round_one_decimal(clamp_percent(state.garbage_level() + delta));
            apply_garbage(state, next)
        })
    }

    /// Run a mutation under the write lock and broadcast its events before
    /// releasing it, then log them.
    fn commit<T>(&self, mutate: impl FnOnce(&mut OfficeState) -> (T, Vec<OfficeEvent>)) -> T {
        let (value, events) = {
            let mut state = self.state.write();
            let (value, events) = mutate(&mut state);
            for event in &events {
                // No subscribers is fine
                let _ = self.event_tx.send(event.clone());
            }
            (value, events)
        };

        for event in &events {
            log_event(event);
        }

        value
    }
}

impl Default for OfficeService {
    fn default() -> Self {
        Self::new()
    }
}

/// Health check over a state snapshot
pub fn is_healthy(state: &OfficeState) -> bool {
    !state.gas_detected()
        && state.temperature_status() == Level::Normal
        && !state.is_critical_garbage_level()
}

fn apply_temperature(state: &mut OfficeState, celsius: f64) -> Vec<OfficeEvent> {
    let previous = state.room_temperature();
    state.set_room_temperature(celsius);
    let status = state.temperature_status();

    let mut events = vec![OfficeEvent::transition(
        EventKind::Temperature,
        format!("Temperature updated: {}°C -> {}°C", previous, celsius),
        previous,
        celsius,
    )];

    if status != Level::Normal {
        events.push(OfficeEvent::alert(
            EventKind::TemperatureAlert,
            Severity::Warning,
            format!("Temperature alert: {} - Current: {}°C", status, celsius),
            celsius,
        ));
    }

    events
}

fn apply_garbage(state: &mut OfficeState, level: f64) -> (f64, Vec<OfficeEvent>) {
    let previous = state.garbage_level();
    state.set_garbage_level(level);
    let stored = state.garbage_level();

    let mut events = vec![OfficeEvent::transition(
        EventKind::Garbage,
        format!("Garbage level updated: {}% -> {}%", previous, stored),
        previous,
        stored,
    )];

    match state.garbage_status() {
        Level::Critical => events.push(OfficeEvent::alert(
            EventKind::GarbageAlert,
            Severity::Critical,
            format!(
                "CRITICAL: Garbage level at {}% - Immediate action required!",
                stored
            ),
            stored,
        )),
        Level::Warning => events.push(OfficeEvent::alert(
            EventKind::GarbageAlert,
            Severity::Warning,
            format!("WARNING: Garbage level at {}% - Should be emptied soon", stored),
            stored,
        )),
        Level::Normal => {}
    }

    (stored, events)
}

/// Log at the event severity with the transition values as fields
fn log_event(event: &OfficeEvent) {
    let previous = event.previous.as_ref().map(field::display);
    let current = event.current.as_ref().map(field::display);

    match event.severity {
        Severity::Info => info!(kind = %event.kind, previous, current, "{}", event.message),
        Severity::Warning => warn!(kind = %event.kind, previous, current, "{}", event.message),
        Severity::Critical => error!(kind = %event.kind, previous, current, "{}", event.message),
    }
}

/// Round half up to one decimal place
fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}

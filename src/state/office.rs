use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_ROOM_TEMPERATURE: f64 = 22.0;
pub const DEFAULT_GARBAGE_LEVEL: f64 = 45.0;

const GARBAGE_WARNING_LEVEL: f64 = 80.0;
const GARBAGE_CRITICAL_LEVEL: f64 = 95.0;

/// Severity of a derived status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Normal,
    Warning,
    Critical,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Normal => "NORMAL",
            Level::Warning => "WARNING",
            Level::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current snapshot of everything the office monitors or controls.
///
/// Fields are private so every mutation goes through a setter, which keeps
/// the garbage clamp and the timestamp in step with the value.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OfficeState {
    #[serde(rename = "isDoorOpen")]
    door_open: bool,

    #[serde(rename = "isLightOn")]
    light_on: bool,

    #[serde(rename = "isFanOn")]
    fan_on: bool,

    #[serde(rename = "gasDetected")]
    gas_detected: bool,

    #[serde(rename = "totalUsers")]
    total_users: u32,

    /// Degrees Celsius
    #[serde(rename = "roomTemperature")]
    room_temperature: f64,

    /// Fill percentage, always within [0, 100]
    #[serde(rename = "garbageLevel")]
    garbage_level: f64,

    /// Unix epoch milliseconds of the most recent mutation
    #[serde(rename = "lastUpdated")]
    last_updated: i64,
}

impl OfficeState {
    pub fn new() -> Self {
        Self {
            door_open: false,
            light_on: false,
            fan_on: false,
            gas_detected: false,
            total_users: 0,
            room_temperature: DEFAULT_ROOM_TEMPERATURE,
            garbage_level: DEFAULT_GARBAGE_LEVEL,
            last_updated: Utc::now().timestamp_millis(),
        }
    }

    pub fn door_open(&self) -> bool {
        self.door_open
    }

    pub fn set_door_open(&mut self, open: bool) {
        self.door_open = open;
        self.touch();
    }

    pub fn light_on(&self) -> bool {
        self.light_on
    }

    pub fn set_light_on(&mut self, on: bool) {
        self.light_on = on;
        self.touch();
    }

    pub fn fan_on(&self) -> bool {
        self.fan_on
    }

    pub fn set_fan_on(&mut self, on: bool) {
        self.fan_on = on;
        self.touch();
    }

    pub fn gas_detected(&self) -> bool {
        self.gas_detected
    }

    pub fn set_gas_detected(&mut self, detected: bool) {
        self.gas_detected = detected;
        self.touch();
    }

    pub fn total_users(&self) -> u32 {
        self.total_users
    }

    pub fn set_total_users(&mut self, count: u32) {
        self.total_users = count;
        self.touch();
    }

    pub fn room_temperature(&self) -> f64 {
        self.room_temperature
    }

    pub fn set_room_temperature(&mut self, celsius: f64) {
        self.room_temperature = celsius;
        self.touch();
    }

    pub fn garbage_level(&self) -> f64 {
        self.garbage_level
    }

    /// Store the level clamped to [0, 100]. Out-of-range input saturates,
    /// NaN is stored as 0.
    pub fn set_garbage_level(&mut self, level: f64) {
        self.garbage_level = clamp_percent(level);
        self.touch();
    }

    pub fn last_updated(&self) -> i64 {
        self.last_updated
    }

    /// Temperature band: [20, 25] is NORMAL, [15, 30] outside that is
    /// WARNING, anything colder or hotter is CRITICAL.
    pub fn temperature_status(&self) -> Level {
        let t = self.room_temperature;
        if (20.0..=25.0).contains(&t) {
            Level::Normal
        } else if (15.0..=30.0).contains(&t) {
            Level::Warning
        } else {
            Level::Critical
        }
    }

    pub fn garbage_status(&self) -> Level {
        if self.is_critical_garbage_level() {
            Level::Critical
        } else if self.needs_garbage_alert() {
            Level::Warning
        } else {
            Level::Normal
        }
    }

    pub fn needs_garbage_alert(&self) -> bool {
        self.garbage_level >= GARBAGE_WARNING_LEVEL
    }

    pub fn is_critical_garbage_level(&self) -> bool {
        self.garbage_level >= GARBAGE_CRITICAL_LEVEL
    }

    // Never moves backwards, even if the wall clock does.
    fn touch(&mut self) {
        self.last_updated = self.last_updated.max(Utc::now().timestamp_millis());
    }
}

impl Default for OfficeState {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

use crate::service::{is_healthy, OfficeService, SystemStatus};
use crate::state::{Level, OfficeState, DEFAULT_GARBAGE_LEVEL, DEFAULT_ROOM_TEMPERATURE};
use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const SERVICE_NAME: &str = "Smart Office API";

/// Shared state for the office API
#[derive(Clone)]
pub struct OfficeAppState {
    pub office: Arc<OfficeService>,
}

// Request bodies. Every key is optional; absent or null keys fall back to
// the endpoint default instead of failing the request.

#[derive(Deserialize)]
pub struct DoorRequest {
    #[serde(default)]
    pub open: Option<bool>,
}

#[derive(Deserialize)]
pub struct SwitchRequest {
    #[serde(default)]
    pub on: Option<bool>,
}

#[derive(Deserialize)]
pub struct TemperatureRequest {
    #[serde(default)]
    pub temperature: Option<f64>,
}

#[derive(Deserialize)]
pub struct GarbageRequest {
    #[serde(default)]
    pub level: Option<f64>,
}

#[derive(Deserialize)]
pub struct GasRequest {
    #[serde(default)]
    pub detected: Option<bool>,
}

#[derive(Deserialize)]
pub struct UsersRequest {
    #[serde(default)]
    pub count: Option<u32>,
}

/// Value echoed back by a mutation endpoint, keyed by field name
#[derive(Serialize)]
enum UpdatedValue {
    #[serde(rename = "doorOpen")]
    DoorOpen(bool),
    #[serde(rename = "lightOn")]
    LightOn(bool),
    #[serde(rename = "fanOn")]
    FanOn(bool),
    #[serde(rename = "temperature")]
    Temperature(f64),
    #[serde(rename = "garbageLevel")]
    GarbageLevel(f64),
    #[serde(rename = "gasDetected")]
    GasDetected(bool),
    #[serde(rename = "totalUsers")]
    TotalUsers(u32),
}

/// Mutation response: `{success, message, <field>}`
#[derive(Serialize)]
pub struct UpdateResponse {
    success: bool,
    message: String,
    #[serde(flatten)]
    value: UpdatedValue,
}

impl UpdateResponse {
    fn ok(message: impl Into<String>, value: UpdatedValue) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
            value,
        })
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: i64,
    pub service: &'static str,
}

#[derive(Serialize)]
pub struct SystemResponse {
    pub healthy: bool,
    pub status: String,
    #[serde(rename = "temperatureStatus")]
    pub temperature_status: Level,
    #[serde(rename = "garbageStatus")]
    pub garbage_status: Level,
}

#[derive(Serialize)]
pub struct ResetResponse {
    pub success: bool,
    pub message: &'static str,
}

/// Create office API router
pub fn create_office_router(state: OfficeAppState) -> Router {
    Router::new()
        .route("/api/status", get(get_status))
        .route("/api/door/toggle", post(toggle_door))
        .route("/api/light/toggle", post(toggle_light))
        .route("/api/fan/toggle", post(toggle_fan))
        .route("/api/temperature/update", post(update_temperature))
        .route("/api/garbage/update", post(update_garbage))
        .route("/api/gas/alert", post(gas_alert))
        .route("/api/users/update", post(update_users))
        .route("/api/system", get(get_system))
        .route("/api/reset", post(reset))
        .route("/api/health", get(health))
        .with_state(Arc::new(state))
}

/// GET /api/status - Current office state
async fn get_status(State(state): State<Arc<OfficeAppState>>) -> Json<OfficeState> {
    Json(state.office.office_state())
}

/// POST /api/door/toggle - `{open}` (default false)
async fn toggle_door(
    State(state): State<Arc<OfficeAppState>>,
    Json(req): Json<DoorRequest>,
) -> Json<UpdateResponse> {
    let open = req.open.unwrap_or(false);
    state.office.update_door_status(open);

    let verb = if open { "opened" } else { "closed" };
    UpdateResponse::ok(
        format!("Door {} successfully", verb),
        UpdatedValue::DoorOpen(open),
    )
}

/// POST /api/light/toggle - `{on}` (default false)
async fn toggle_light(
    State(state): State<Arc<OfficeAppState>>,
    Json(req): Json<SwitchRequest>,
) -> Json<UpdateResponse> {
    let on = req.on.unwrap_or(false);
    state.office.update_light_status(on);

    UpdateResponse::ok(
        format!("Light {} successfully", on_off(on)),
        UpdatedValue::LightOn(on),
    )
}

/// POST /api/fan/toggle - `{on}` (default false)
async fn toggle_fan(
    State(state): State<Arc<OfficeAppState>>,
    Json(req): Json<SwitchRequest>,
) -> Json<UpdateResponse> {
    let on = req.on.unwrap_or(false);
    state.office.update_fan_status(on);

    UpdateResponse::ok(
        format!("Fan {} successfully", on_off(on)),
        UpdatedValue::FanOn(on),
    )
}

/// POST /api/temperature/update - `{temperature}` (default 22.0)
async fn update_temperature(
    State(state): State<Arc<OfficeAppState>>,
    Json(req): Json<TemperatureRequest>,
) -> Json<UpdateResponse> {
    let temperature = req.temperature.unwrap_or(DEFAULT_ROOM_TEMPERATURE);
    state.office.update_temperature(temperature);

    UpdateResponse::ok(
        "Temperature updated successfully",
        UpdatedValue::Temperature(temperature),
    )
}

/// POST /api/garbage/update - `{level}` (default 45.0)
///
/// Echoes the requested level; the stored value is clamped to [0, 100] and
/// readable from GET /api/status.
async fn update_garbage(
    State(state): State<Arc<OfficeAppState>>,
    Json(req): Json<GarbageRequest>,
) -> Json<UpdateResponse> {
    let level = req.level.unwrap_or(DEFAULT_GARBAGE_LEVEL);
    state.office.update_garbage_level(level);

    UpdateResponse::ok(
        "Garbage level updated successfully",
        UpdatedValue::GarbageLevel(level),
    )
}

/// POST /api/gas/alert - `{detected}` (default false)
async fn gas_alert(
    State(state): State<Arc<OfficeAppState>>,
    Json(req): Json<GasRequest>,
) -> Json<UpdateResponse> {
    let detected = req.detected.unwrap_or(false);
    state.office.update_gas_detection(detected);

    let verb = if detected { "triggered" } else { "cleared" };
    UpdateResponse::ok(
        format!("Gas detection {}", verb),
        UpdatedValue::GasDetected(detected),
    )
}

/// POST /api/users/update - `{count}` (default 0)
async fn update_users(
    State(state): State<Arc<OfficeAppState>>,
    Json(req): Json<UsersRequest>,
) -> Json<UpdateResponse> {
    let count = req.count.unwrap_or(0);
    state.office.update_user_count(count);

    UpdateResponse::ok(
        "User count updated successfully",
        UpdatedValue::TotalUsers(count),
    )
}

/// GET /api/system - Aggregate health and derived statuses
async fn get_system(State(state): State<Arc<OfficeAppState>>) -> Json<SystemResponse> {
    let snapshot = state.office.office_state();

    Json(SystemResponse {
        healthy: is_healthy(&snapshot),
        status: SystemStatus::of(&snapshot).to_string(),
        temperature_status: snapshot.temperature_status(),
        garbage_status: snapshot.garbage_status(),
    })
}

/// POST /api/reset - Restore default state
async fn reset(State(state): State<Arc<OfficeAppState>>) -> Json<ResetResponse> {
    state.office.reset_to_defaults();

    Json(ResetResponse {
        success: true,
        message: "Office state reset to defaults",
    })
}

/// GET /api/health - Liveness check
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now().timestamp_millis(),
        service: SERVICE_NAME,
    })
}

fn on_off(on: bool) -> &'static str {
    if on {
        "turned on"
    } else {
        "turned off"
    }
}

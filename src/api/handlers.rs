//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{error, warn};

use crate::state::{AppState, Mode, SettingsCandidate, TimerState};
use super::responses::{ErrorResponse, HealthResponse, SettingsResponse, StatusResponse, TimerResponse};

fn timer_reply(action: &str, result: Result<TimerState, String>) -> Result<Json<TimerResponse>, StatusCode> {
    match result {
        Ok(timer) => Ok(Json(TimerResponse::from(timer))),
        Err(e) => {
            error!("Failed to {} timer: {}", action, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /toggle - Start or pause the countdown
pub async fn toggle_handler(State(state): State<Arc<AppState>>) -> Result<Json<TimerResponse>, StatusCode> {
    timer_reply("toggle", state.toggle())
}

/// Handle POST /start - Start the countdown if it is not running
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<TimerResponse>, StatusCode> {
    timer_reply("start", state.start())
}

/// Handle POST /pause - Pause the countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<TimerResponse>, StatusCode> {
    timer_reply("pause", state.pause())
}

/// Handle POST /reset - Stop and restore the current mode's full duration
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<TimerResponse>, StatusCode> {
    timer_reply("reset", state.reset())
}

/// Handle POST /mode/:mode - Select a mode explicitly
pub async fn mode_handler(
    State(state): State<Arc<AppState>>,
    Path(mode): Path<String>,
) -> Result<Json<TimerResponse>, (StatusCode, Json<ErrorResponse>)> {
    let mode = mode.parse::<Mode>().map_err(|e| {
        warn!("Rejected mode switch: {}", e);
        (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(e.to_string())))
    })?;

    timer_reply("switch", state.switch_mode(mode))
        .map_err(|status| (status, Json(ErrorResponse::new("timer unavailable".to_string()))))
}

/// Handle GET /settings - Current settings for the editing surface
pub async fn get_settings_handler(State(state): State<Arc<AppState>>) -> Result<Json<SettingsResponse>, StatusCode> {
    match state.get_settings() {
        Ok(settings) => Ok(Json(SettingsResponse::committed(settings))),
        Err(e) => {
            error!("Failed to read settings: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle PUT /settings - Validate, persist and apply new settings
///
/// Any body is accepted; whatever cannot be read as a settings object
/// falls back to the factory defaults field by field.
pub async fn apply_settings_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<SettingsResponse>, StatusCode> {
    let candidate = serde_json::from_slice::<SettingsCandidate>(&body).unwrap_or_else(|e| {
        warn!("Unreadable settings body, using defaults: {}", e);
        SettingsCandidate::default()
    });

    match state.apply_settings(&candidate) {
        Ok(settings) => Ok(Json(SettingsResponse::committed(settings))),
        Err(e) => {
            error!("Failed to apply settings: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /settings/defaults - Stage factory defaults without saving them
pub async fn restore_defaults_handler(State(state): State<Arc<AppState>>) -> Result<Json<SettingsResponse>, StatusCode> {
    match state.restore_factory_defaults() {
        Ok(settings) => Ok(Json(SettingsResponse::staged(settings))),
        Err(e) => {
            error!("Failed to restore defaults: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /status - Return current timer status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let (timer, settings) = match state.inspect(|c| (c.state(), c.settings())) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            error!("Failed to get timer state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer: TimerResponse::from(timer),
        settings,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

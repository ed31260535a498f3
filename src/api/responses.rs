//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{Mode, Settings, TimerState};

/// Timer view returned by every intent endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerResponse {
    pub mode: Mode,
    pub mode_label: String,
    pub remaining_seconds: u64,
    pub display: String,
    pub running: bool,
    pub title: String,
    pub timestamp: DateTime<Utc>,
}

impl From<TimerState> for TimerResponse {
    fn from(state: TimerState) -> Self {
        Self {
            mode: state.mode,
            mode_label: state.mode.label().to_string(),
            remaining_seconds: state.remaining_seconds,
            display: state.formatted(),
            running: state.running,
            title: state.window_title(),
            timestamp: Utc::now(),
        }
    }
}

/// Settings returned to an editing surface
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsResponse {
    pub settings: Settings,
    /// Whether these values are live or only staged for editing
    pub committed: bool,
}

impl SettingsResponse {
    pub fn committed(settings: Settings) -> Self {
        Self { settings, committed: true }
    }

    pub fn staged(settings: Settings) -> Self {
        Self { settings, committed: false }
    }
}

/// Full status response with timer, settings and server information
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub timer: TimerResponse,
    pub settings: Settings,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Error body for rejected requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: String) -> Self {
        Self {
            status: "error".to_string(),
            message,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

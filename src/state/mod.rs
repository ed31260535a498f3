//! State management module
//! 
//! This module contains the timer controller and the values it owns and publishes.

pub mod settings;
pub mod timer_state;
pub mod controller;
pub mod app_state;

// Re-export main types
pub use settings::{Settings, SettingsCandidate, SETTINGS_KEY};
pub use timer_state::{format_mm_ss, Mode, TimerEvent, TimerState, UnknownMode, APP_TITLE};
pub use controller::{TickReceiver, TimerController, TICK_PERIOD};
pub use app_state::AppState;

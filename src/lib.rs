//! Pomodoro Server - A state-managed Pomodoro timer
//! 
//! This library provides a countdown controller that cycles between work and
//! break intervals, persists its duration settings and announces completed
//! intervals, plus the HTTP API and background tasks that host it.

pub mod config;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::{AppState, TimerController};
pub use api::create_router;
pub use utils::signals::shutdown_signal;

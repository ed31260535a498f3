//! Utility functions module
//! 
//! This module contains process-level helpers: log setup and shutdown signals.

pub mod logging;
pub mod signals;

// Re-export main functions
pub use logging::log_subscriber;
pub use signals::shutdown_signal;

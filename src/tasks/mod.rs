//! Background tasks module
//! 
//! This module contains background tasks that run alongside the HTTP server.

pub mod tick_driver;
pub mod completion_announcer;
pub mod terminal_title;

// Re-export main functions
pub use tick_driver::tick_driver_task;
pub use completion_announcer::completion_announcer_task;
pub use terminal_title::terminal_title_task;

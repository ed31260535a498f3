//! Collaborator services module
//! 
//! This module contains the collaborators the timer controller is built with:
//! settings persistence, the tick clock and audible notifications.

pub mod clock;
pub mod notify;
pub mod store;

// Re-export main types
pub use clock::{ClockSource, ManualClock, TickCallback, TickHandle, TokioClock};
pub use notify::{Notifier, NotifyError, Silent, TerminalBell, COMPLETION_TONE, COMPLETION_TONE_HZ};
pub use store::{FileStore, MemoryStore, SettingsStore, StoreError};

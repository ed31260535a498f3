//! Audible completion cues

use std::{
    io::{self, Write},
    time::Duration,
};
use tracing::debug;

/// Frequency of the completion tone
pub const COMPLETION_TONE_HZ: u32 = 800;
/// Length of the completion tone
pub const COMPLETION_TONE: Duration = Duration::from_millis(500);

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("audio output is not available")]
    Unavailable,
    #[error("failed to write notification: {0}")]
    Io(#[from] io::Error),
}

/// Best-effort sound output. Callers ignore failures.
pub trait Notifier: Send + Sync {
    fn play_tone(&self, frequency_hz: u32, duration: Duration) -> Result<(), NotifyError>;
}

/// Rings the terminal bell on stderr.
///
/// A bell has no pitch or length, so both arguments only show up in logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalBell;

impl Notifier for TerminalBell {
    fn play_tone(&self, frequency_hz: u32, duration: Duration) -> Result<(), NotifyError> {
        debug!("Ringing bell for {}Hz tone ({:?})", frequency_hz, duration);
        let mut stderr = io::stderr().lock();
        stderr.write_all(b"\x07")?;
        stderr.flush()?;
        Ok(())
    }
}

/// A notifier with no audio device behind it
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Notifier for Silent {
    fn play_tone(&self, _frequency_hz: u32, _duration: Duration) -> Result<(), NotifyError> {
        Err(NotifyError::Unavailable)
    }
}

//! Timer state structure and published views

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Settings;

/// Static title shown whenever the countdown is not running
pub const APP_TITLE: &str = "Pomodoro Timer";

/// Which configured duration governs the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mode {
    #[default]
    Work,
    ShortBreak,
    LongBreak,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Work => "work",
            Mode::ShortBreak => "shortBreak",
            Mode::LongBreak => "longBreak",
        }
    }

    /// Label for the mode indicator
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Work => "Work Session",
            Mode::ShortBreak => "Short Break",
            Mode::LongBreak => "Long Break",
        }
    }

    pub fn is_break(&self) -> bool {
        !matches!(self, Mode::Work)
    }

    /// Mode to advance to once this one completes.
    ///
    /// Long breaks are never chosen automatically.
    pub fn next(&self) -> Mode {
        match self {
            Mode::Work => Mode::ShortBreak,
            Mode::ShortBreak | Mode::LongBreak => Mode::Work,
        }
    }

    /// Announcement for a completed interval of this mode
    pub fn completion_message(&self) -> &'static str {
        match self {
            Mode::Work => "Work session completed! Time for a break.",
            Mode::ShortBreak | Mode::LongBreak => "Break completed! Time for a work session.",
        }
    }

    /// Configured length of this mode in minutes
    pub fn minutes(&self, settings: &Settings) -> u32 {
        match self {
            Mode::Work => settings.work,
            Mode::ShortBreak => settings.short_break,
            Mode::LongBreak => settings.long_break,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown timer mode: {0}")]
pub struct UnknownMode(pub String);

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "work" => Ok(Mode::Work),
            "shortBreak" | "short-break" | "short_break" => Ok(Mode::ShortBreak),
            "longBreak" | "long-break" | "long_break" => Ok(Mode::LongBreak),
            other => Err(UnknownMode(other.to_string())),
        }
    }
}

/// Observable countdown state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub mode: Mode,
    pub remaining_seconds: u64,
    pub running: bool,
}

impl TimerState {
    /// Create an idle timer for `mode` with its full duration remaining
    pub fn idle(mode: Mode, settings: &Settings) -> Self {
        Self {
            mode,
            remaining_seconds: mode.minutes(settings) as u64 * 60,
            running: false,
        }
    }

    /// Remaining time as `MM:SS`
    pub fn formatted(&self) -> String {
        format_mm_ss(self.remaining_seconds)
    }

    /// Title for a window or tab: a live countdown while running, the
    /// static app title otherwise
    pub fn window_title(&self) -> String {
        if self.running {
            let kind = if self.mode.is_break() { "Break" } else { "Work" };
            format!("{} - {} | {}", self.formatted(), kind, APP_TITLE)
        } else {
            APP_TITLE.to_string()
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::idle(Mode::Work, &Settings::factory())
    }
}

/// Format seconds as "MM:SS"
pub fn format_mm_ss(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Events emitted by the controller for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TimerEvent {
    /// An interval ran down to zero
    Completed {
        finished: Mode,
        next: Mode,
        message: String,
        at: DateTime<Utc>,
    },
    ModeChanged { mode: Mode },
    SettingsSaved { settings: Settings },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_mm_ss() {
        assert_eq!(format_mm_ss(0), "00:00");
        assert_eq!(format_mm_ss(61), "01:01");
        assert_eq!(format_mm_ss(1500), "25:00");
        assert_eq!(format_mm_ss(3600), "60:00");
    }

    #[test]
    fn test_advance_policy() {
        assert_eq!(Mode::Work.next(), Mode::ShortBreak);
        assert_eq!(Mode::ShortBreak.next(), Mode::Work);
        assert_eq!(Mode::LongBreak.next(), Mode::Work);
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("longBreak".parse::<Mode>(), Ok(Mode::LongBreak));
        assert_eq!("short-break".parse::<Mode>(), Ok(Mode::ShortBreak));
        assert!("nap".parse::<Mode>().is_err());
    }

    #[test]
    fn test_idle_state_uses_mode_duration() {
        let settings = Settings::factory();
        assert_eq!(TimerState::idle(Mode::Work, &settings).remaining_seconds, 1500);
        assert_eq!(TimerState::idle(Mode::ShortBreak, &settings).remaining_seconds, 300);
        assert_eq!(TimerState::idle(Mode::LongBreak, &settings).remaining_seconds, 900);
    }

    #[test]
    fn test_window_title() {
        let mut state = TimerState::default();
        assert_eq!(state.window_title(), "Pomodoro Timer");

        state.running = true;
        state.remaining_seconds = 1499;
        assert_eq!(state.window_title(), "24:59 - Work | Pomodoro Timer");

        state.mode = Mode::LongBreak;
        assert_eq!(state.window_title(), "24:59 - Break | Pomodoro Timer");
    }

    #[test]
    fn test_event_serialization_is_tagged() {
        let event = TimerEvent::ModeChanged { mode: Mode::ShortBreak };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "modeChanged");
        assert_eq!(json["mode"], "shortBreak");
    }
}

//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};
use tracing::info;

use super::{Mode, Settings, SettingsCandidate, TimerController, TimerEvent, TimerState};

/// Shared application state: the timer controller plus server metadata
pub struct AppState {
    /// The one timer controller, shared by the API and the tick driver
    pub controller: Arc<Mutex<TimerController>>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl AppState {
    /// Wrap a controller for sharing across tasks and handlers
    pub fn new(controller: TimerController, port: u16, host: String) -> Self {
        Self {
            controller: Arc::new(Mutex::new(controller)),
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
        }
    }

    /// Run a user intent against the controller and record it as the last action
    pub fn dispatch<T, F>(&self, action: &str, intent: F) -> Result<T, String>
    where
        F: FnOnce(&mut TimerController) -> T,
    {
        let mut controller = self.controller.lock()
            .map_err(|e| format!("Failed to lock timer controller: {}", e))?;

        let result = intent(&mut *controller);
        drop(controller); // Release the lock early

        info!("Handled {} intent", action);
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        Ok(result)
    }

    /// Read from the controller without recording an action
    pub fn inspect<T, F>(&self, read: F) -> Result<T, String>
    where
        F: FnOnce(&TimerController) -> T,
    {
        self.controller.lock()
            .map(|controller| read(&*controller))
            .map_err(|e| format!("Failed to lock timer controller: {}", e))
    }

    pub fn toggle(&self) -> Result<TimerState, String> {
        self.dispatch("toggle", |c| {
            c.toggle();
            c.state()
        })
    }

    pub fn start(&self) -> Result<TimerState, String> {
        self.dispatch("start", |c| {
            c.start();
            c.state()
        })
    }

    pub fn pause(&self) -> Result<TimerState, String> {
        self.dispatch("pause", |c| {
            c.pause();
            c.state()
        })
    }

    pub fn reset(&self) -> Result<TimerState, String> {
        self.dispatch("reset", |c| {
            c.reset();
            c.state()
        })
    }

    pub fn switch_mode(&self, mode: Mode) -> Result<TimerState, String> {
        self.dispatch("switch-mode", |c| {
            c.switch_mode(mode);
            c.state()
        })
    }

    pub fn apply_settings(&self, candidate: &SettingsCandidate) -> Result<Settings, String> {
        self.dispatch("save-settings", |c| c.apply_settings(candidate))
    }

    pub fn restore_factory_defaults(&self) -> Result<Settings, String> {
        self.dispatch("restore-defaults", |c| c.restore_factory_defaults())
    }

    /// Get current timer state
    pub fn get_timer_state(&self) -> Result<TimerState, String> {
        self.inspect(|c| c.state())
    }

    pub fn get_settings(&self) -> Result<Settings, String> {
        self.inspect(|c| c.settings())
    }

    pub fn subscribe_state(&self) -> Result<watch::Receiver<TimerState>, String> {
        self.inspect(|c| c.subscribe_state())
    }

    pub fn subscribe_events(&self) -> Result<broadcast::Receiver<TimerEvent>, String> {
        self.inspect(|c| c.subscribe_events())
    }

    /// Deliver one tick from the clock source
    pub fn tick(&self, generation: u64) -> Result<(), String> {
        let mut controller = self.controller.lock()
            .map_err(|e| format!("Failed to lock timer controller: {}", e))?;
        controller.on_tick(generation);
        Ok(())
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{ManualClock, MemoryStore, Silent};

    fn app() -> (AppState, Arc<ManualClock>, crate::state::TickReceiver) {
        let clock = Arc::new(ManualClock::new());
        let (controller, ticks) = TimerController::new(
            Arc::new(MemoryStore::new()),
            clock.clone(),
            Arc::new(Silent),
        );
        (AppState::new(controller, 0, "127.0.0.1".to_string()), clock, ticks)
    }

    #[test]
    fn test_dispatch_records_last_action() {
        let (state, _clock, _ticks) = app();
        assert_eq!(state.get_last_action(), (None, None));

        let timer = state.toggle().unwrap();
        assert!(timer.running);

        let (action, at) = state.get_last_action();
        assert_eq!(action.as_deref(), Some("toggle"));
        assert!(at.is_some());
    }

    #[test]
    fn test_ticks_reach_controller() {
        let (state, clock, mut ticks) = app();
        state.start().unwrap();
        clock.fire();
        let generation = ticks.try_recv().unwrap();
        state.tick(generation).unwrap();
        assert_eq!(state.get_timer_state().unwrap().remaining_seconds, 1499);
    }

    #[test]
    fn test_uptime_format() {
        let (state, _clock, _ticks) = app();
        assert!(state.get_uptime().ends_with('s'));
    }
}

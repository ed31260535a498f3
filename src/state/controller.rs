//! The Pomodoro countdown controller
//!
//! ```text
//!            start                    tick (remaining > 0)
//!  Idle(m) ─────────► Running(m) ◄───────────────┐
//!    ▲  ▲   pause/toggle  │   │                   │
//!    │  └─────────────────┘   └───────────────────┘
//!    │                        │ tick reaches 0
//!    └────────────────────────┘ complete: Idle(m.next())
//! ```
//!
//! `switch_mode` and `reset` lead to `Idle` from any state. The controller
//! owns at most one live tick registration; ticks delivered for an older
//! registration are dropped.

use std::{sync::Arc, time::Duration};
use chrono::Utc;
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{debug, error, info, warn};

use super::{Mode, Settings, SettingsCandidate, TimerEvent, TimerState, SETTINGS_KEY};
use crate::services::{
    ClockSource, Notifier, SettingsStore, TickHandle, COMPLETION_TONE, COMPLETION_TONE_HZ,
};

/// Countdown period
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Receives the generation of each tick fired by the clock source
pub type TickReceiver = mpsc::UnboundedReceiver<u64>;

pub struct TimerController {
    settings: Settings,
    state: TimerState,
    active_tick: Option<TickHandle>,
    generation: u64,
    store: Arc<dyn SettingsStore>,
    clock: Arc<dyn ClockSource>,
    notifier: Arc<dyn Notifier>,
    tick_tx: mpsc::UnboundedSender<u64>,
    state_tx: watch::Sender<TimerState>,
    event_tx: broadcast::Sender<TimerEvent>,
}

impl TimerController {
    /// Build a controller, reading settings from `store`.
    ///
    /// The returned receiver must be drained into [`Self::on_tick`] for the
    /// countdown to advance.
    pub fn new(
        store: Arc<dyn SettingsStore>,
        clock: Arc<dyn ClockSource>,
        notifier: Arc<dyn Notifier>,
    ) -> (Self, TickReceiver) {
        let settings = load_settings(store.as_ref());
        let state = TimerState::idle(Mode::Work, &settings);
        let (tick_tx, tick_rx) = mpsc::unbounded_channel();
        let (state_tx, _) = watch::channel(state);
        let (event_tx, _) = broadcast::channel(64);

        info!(
            "Timer ready: work={}m short={}m long={}m",
            settings.work, settings.short_break, settings.long_break
        );

        let controller = Self {
            settings,
            state,
            active_tick: None,
            generation: 0,
            store,
            clock,
            notifier,
            tick_tx,
            state_tx,
            event_tx,
        };
        (controller, tick_rx)
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Copy of the live settings, for an editing surface
    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn subscribe_state(&self) -> watch::Receiver<TimerState> {
        self.state_tx.subscribe()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<TimerEvent> {
        self.event_tx.subscribe()
    }

    /// Start counting down. Does nothing if already running.
    pub fn start(&mut self) {
        if self.state.running {
            debug!("Start ignored, timer already running");
            return;
        }
        // Never leave a previous registration alive
        self.cancel_tick();

        self.generation += 1;
        let generation = self.generation;
        let tick_tx = self.tick_tx.clone();
        let handle = self.clock.schedule_repeating(
            TICK_PERIOD,
            Arc::new(move || {
                // Receiver gone means the host is shutting down
                let _ = tick_tx.send(generation);
            }),
        );
        self.active_tick = Some(handle);
        self.state.running = true;

        info!("Started {} with {} remaining", self.state.mode, self.state.formatted());
        self.publish();
    }

    /// Stop counting down. Idempotent.
    pub fn pause(&mut self) {
        let was_running = self.state.running;
        self.cancel_tick();
        self.state.running = false;
        if was_running {
            info!("Paused {} at {}", self.state.mode, self.state.formatted());
            self.publish();
        }
    }

    pub fn toggle(&mut self) {
        if self.state.running {
            self.pause();
        } else {
            self.start();
        }
    }

    /// Stop and restore the full duration of the current mode
    pub fn reset(&mut self) {
        self.pause();
        self.state.remaining_seconds = self.duration_for_mode(self.state.mode);
        info!("Reset {} to {}", self.state.mode, self.state.formatted());
        self.publish();
    }

    /// Select a mode explicitly. Stops any countdown; never auto-starts.
    pub fn switch_mode(&mut self, mode: Mode) {
        self.pause();
        self.state.mode = mode;
        self.state.remaining_seconds = self.duration_for_mode(mode);
        info!("Switched to {} ({})", mode.label(), self.state.formatted());
        self.publish();
        self.emit(TimerEvent::ModeChanged { mode });
    }

    /// Configured length of `mode` in seconds
    pub fn duration_for_mode(&self, mode: Mode) -> u64 {
        mode.minutes(&self.settings) as u64 * 60
    }

    /// Validate, persist and adopt new settings.
    ///
    /// A running countdown keeps its remaining time; an idle one is
    /// recomputed for the current mode.
    pub fn apply_settings(&mut self, candidate: &SettingsCandidate) -> Settings {
        let settings = candidate.resolve();
        self.settings = settings;

        if let Err(e) = self.store.set(SETTINGS_KEY, &settings.encode()) {
            error!("Failed to persist settings: {}", e);
        }
        info!(
            "Settings saved: work={}m short={}m long={}m",
            settings.work, settings.short_break, settings.long_break
        );

        if !self.state.running {
            self.state.remaining_seconds = self.duration_for_mode(self.state.mode);
            self.publish();
        }
        self.emit(TimerEvent::SettingsSaved { settings });
        settings
    }

    /// Factory defaults to stage in an editing surface. Nothing is
    /// committed until [`Self::apply_settings`] is called with them.
    pub fn restore_factory_defaults(&self) -> Settings {
        Settings::factory()
    }

    /// Handle a tick from registration `generation`
    pub fn on_tick(&mut self, generation: u64) {
        if self.active_tick.is_none() || generation != self.generation {
            debug!("Dropping stale tick from registration {}", generation);
            return;
        }
        self.tick();
    }

    fn tick(&mut self) {
        if !self.state.running {
            return;
        }
        self.state.remaining_seconds = self.state.remaining_seconds.saturating_sub(1);
        debug!("Tick: {} {}", self.state.mode, self.state.formatted());
        self.publish();

        if self.state.remaining_seconds == 0 {
            self.complete();
        }
    }

    fn complete(&mut self) {
        self.pause();

        let finished = self.state.mode;
        let next = finished.next();
        info!("{} completed, advancing to {}", finished.label(), next.label());

        if let Err(e) = self.notifier.play_tone(COMPLETION_TONE_HZ, COMPLETION_TONE) {
            warn!("Audio notification not available: {}", e);
        }
        self.emit(TimerEvent::Completed {
            finished,
            next,
            message: finished.completion_message().to_string(),
            at: Utc::now(),
        });

        self.switch_mode(next);
    }

    fn cancel_tick(&mut self) {
        if let Some(handle) = self.active_tick.take() {
            self.clock.cancel(handle);
        }
    }

    fn publish(&self) {
        self.state_tx.send_replace(self.state);
    }

    fn emit(&self, event: TimerEvent) {
        // No subscribers is normal when nothing is listening
        if self.event_tx.send(event).is_err() {
            debug!("No event subscribers");
        }
    }
}

impl Drop for TimerController {
    fn drop(&mut self) {
        self.cancel_tick();
    }
}

fn load_settings(store: &dyn SettingsStore) -> Settings {
    match store.get(SETTINGS_KEY) {
        Ok(Some(raw)) => Settings::decode(&raw).unwrap_or_else(|| {
            warn!("Stored settings are malformed, using defaults");
            Settings::factory()
        }),
        Ok(None) => Settings::factory(),
        Err(e) => {
            warn!("Failed to read stored settings, using defaults: {}", e);
            Settings::factory()
        }
    }
}

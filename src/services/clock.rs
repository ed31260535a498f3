//! Repeating tick sources
//!
//! A clock source fires a callback on a fixed period until the registration
//! is cancelled. [`TokioClock`] runs on the tokio timer; [`ManualClock`]
//! only fires when told to, which makes countdowns deterministic.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};
use tokio::{
    runtime::Handle,
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, warn};

/// Callback invoked on every tick
pub type TickCallback = Arc<dyn Fn() + Send + Sync>;

/// Opaque handle to one repeating registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickHandle(u64);

pub trait ClockSource: Send + Sync {
    fn schedule_repeating(&self, period: Duration, callback: TickCallback) -> TickHandle;
    /// Cancel a registration. Unknown or already-cancelled handles are ignored.
    fn cancel(&self, handle: TickHandle);
}

/// Clock backed by `tokio::time::interval`
#[derive(Debug)]
pub struct TokioClock {
    runtime: Handle,
    next_id: AtomicU64,
    tasks: Mutex<HashMap<u64, JoinHandle<()>>>,
}

impl TokioClock {
    /// Create a clock that spawns onto the current runtime.
    ///
    /// Panics outside a tokio runtime, like `tokio::spawn`.
    pub fn new() -> Self {
        Self::with_handle(Handle::current())
    }

    pub fn with_handle(runtime: Handle) -> Self {
        Self {
            runtime,
            next_id: AtomicU64::new(1),
            tasks: Mutex::new(HashMap::new()),
        }
    }
}

impl ClockSource for TokioClock {
    fn schedule_repeating(&self, period: Duration, callback: TickCallback) -> TickHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let task = self.runtime.spawn(async move {
            // First tick one full period from now, late ticks are not made up
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                callback();
            }
        });

        match self.tasks.lock() {
            Ok(mut tasks) => {
                tasks.insert(id, task);
            }
            Err(e) => {
                warn!("Failed to track tick task, aborting it: {}", e);
                task.abort();
            }
        }
        debug!("Scheduled repeating tick {} every {:?}", id, period);
        TickHandle(id)
    }

    fn cancel(&self, handle: TickHandle) {
        let task = match self.tasks.lock() {
            Ok(mut tasks) => tasks.remove(&handle.0),
            Err(e) => {
                warn!("Failed to lock tick tasks: {}", e);
                None
            }
        };
        if let Some(task) = task {
            task.abort();
            debug!("Cancelled repeating tick {}", handle.0);
        }
    }
}

impl Drop for TokioClock {
    fn drop(&mut self) {
        if let Ok(mut tasks) = self.tasks.lock() {
            for (_, task) in tasks.drain() {
                task.abort();
            }
        }
    }
}

/// Clock that fires only when [`ManualClock::fire`] is called
#[derive(Default)]
pub struct ManualClock {
    next_id: AtomicU64,
    registrations: Mutex<Vec<(TickHandle, Duration, TickCallback)>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invoke every live callback once. Returns how many fired.
    pub fn fire(&self) -> usize {
        // Collect first so callbacks may schedule or cancel re-entrantly
        let callbacks: Vec<TickCallback> = match self.registrations.lock() {
            Ok(regs) => regs.iter().map(|(_, _, cb)| Arc::clone(cb)).collect(),
            Err(_) => return 0,
        };
        for callback in &callbacks {
            callback();
        }
        callbacks.len()
    }

    /// Number of live registrations
    pub fn active(&self) -> usize {
        self.registrations.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// Period of the most recent live registration
    pub fn period(&self) -> Option<Duration> {
        self.registrations
            .lock()
            .ok()
            .and_then(|r| r.last().map(|(_, period, _)| *period))
    }
}

impl ClockSource for ManualClock {
    fn schedule_repeating(&self, period: Duration, callback: TickCallback) -> TickHandle {
        let handle = TickHandle(self.next_id.fetch_add(1, Ordering::Relaxed));
        if let Ok(mut regs) = self.registrations.lock() {
            regs.push((handle, period, callback));
        }
        handle
    }

    fn cancel(&self, handle: TickHandle) {
        if let Ok(mut regs) = self.registrations.lock() {
            regs.retain(|(h, _, _)| *h != handle);
        }
    }
}

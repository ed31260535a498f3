//! Tick driver background task

use std::sync::Arc;
use tracing::{error, info};

use crate::state::{AppState, TickReceiver};

/// Background task that feeds clock ticks into the shared timer controller
pub async fn tick_driver_task(state: Arc<AppState>, mut ticks: TickReceiver) {
    info!("Starting tick driver task");

    while let Some(generation) = ticks.recv().await {
        if let Err(e) = state.tick(generation) {
            error!("Failed to deliver tick: {}", e);
        }
    }

    info!("Tick source closed, tick driver stopping");
}

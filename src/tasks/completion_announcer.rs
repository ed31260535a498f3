//! Completion announcement background task

use std::io::Write;
use chrono::Local;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{info, warn};

use crate::state::TimerEvent;

/// Background task that announces completed intervals to `out`.
///
/// Returns the writer once the event channel closes.
pub async fn completion_announcer_task<W: Write>(
    mut events: broadcast::Receiver<TimerEvent>,
    mut out: W,
) -> W {
    info!("Starting completion announcer task");

    loop {
        match events.recv().await {
            Ok(TimerEvent::Completed { finished, next, message, at }) => {
                info!("Announcing completion of {} (next: {})", finished, next);
                let stamp = at.with_timezone(&Local).format("%H:%M:%S");
                if let Err(e) = writeln!(out, "[{}] {}", stamp, message).and_then(|_| out.flush()) {
                    warn!("Failed to write completion announcement: {}", e);
                }
            }
            Ok(_) => {}
            Err(RecvError::Lagged(skipped)) => {
                warn!("Completion announcer lagged, skipped {} events", skipped);
            }
            Err(RecvError::Closed) => break,
        }
    }

    info!("Event channel closed, completion announcer stopping");
    out
}

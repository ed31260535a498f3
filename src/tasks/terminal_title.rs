//! Terminal title side channel

use std::io::Write;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::state::TimerState;

/// Background task that mirrors the window title into the terminal title
/// bar with an OSC 0 escape. Returns the writer once the controller is gone.
pub async fn terminal_title_task<W: Write>(mut states: watch::Receiver<TimerState>, mut out: W) -> W {
    info!("Starting terminal title task");
    let mut last_title = String::new();

    loop {
        let title = states.borrow_and_update().window_title();
        if title != last_title {
            debug!("Terminal title: {}", title);
            if let Err(e) = write!(out, "\x1b]0;{}\x07", title).and_then(|_| out.flush()) {
                warn!("Failed to set terminal title: {}", e);
            }
            last_title = title;
        }

        if states.changed().await.is_err() {
            break;
        }
    }

    out
}

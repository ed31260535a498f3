//! Pomodoro Server - A state-managed Pomodoro timer
//! 
//! This is the main entry point for the pomodoro-server application.

use std::sync::Arc;
use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use pomodoro_server::{
    config::Config,
    state::{AppState, TimerController},
    api::create_router,
    services::{FileStore, Notifier, Silent, TerminalBell, TokioClock},
    tasks::{completion_announcer_task, terminal_title_task, tick_driver_task},
    utils::{log_subscriber, shutdown_signal},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Logs go to stderr; stdout carries announcements and title escapes
    tracing::subscriber::set_global_default(log_subscriber(config.log_level(), std::io::stderr))
        .context("cannot install log subscriber")?;

    info!("Starting pomodoro-server v{}", env!("CARGO_PKG_VERSION"));

    let data_dir = config.data_dir();
    let store = FileStore::new(&data_dir)
        .with_context(|| format!("cannot use data directory {}", data_dir.display()))?;
    info!("Configuration: host={}, port={}, data_dir={}",
          config.host, config.port, store.dir().display());

    let notifier: Arc<dyn Notifier> = if config.silent {
        Arc::new(Silent)
    } else {
        Arc::new(TerminalBell)
    };

    // Build the controller and share it
    let (controller, ticks) = TimerController::new(
        Arc::new(store),
        Arc::new(TokioClock::new()),
        notifier,
    );
    let events = controller.subscribe_events();
    let states = controller.subscribe_state();
    let state = Arc::new(AppState::new(controller, config.port, config.host.clone()));

    // Start the background tasks
    tokio::spawn(tick_driver_task(Arc::clone(&state), ticks));
    tokio::spawn(completion_announcer_task(events, std::io::stdout()));
    if config.terminal_title {
        tokio::spawn(terminal_title_task(states, std::io::stdout()));
    }

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("cannot bind {}", addr))?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /toggle            - Start or pause the countdown");
    info!("  POST /start | /pause    - Start or pause explicitly");
    info!("  POST /reset             - Restore the current mode's duration");
    info!("  POST /mode/:mode        - Select work, shortBreak or longBreak");
    info!("  GET  /settings          - Current durations");
    info!("  PUT  /settings          - Save durations");
    info!("  POST /settings/defaults - Stage factory defaults");
    info!("  GET  /status            - Current timer status");
    info!("  GET  /health            - Health check");

    // Setup graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            info!("Shutdown signal received");
        })
        .await
        .context("server error")?;

    // Stop any live countdown before the runtime goes away
    if let Err(e) = state.pause() {
        tracing::warn!("Failed to stop timer on shutdown: {}", e);
    }

    info!("Server shutdown complete");
    Ok(())
}

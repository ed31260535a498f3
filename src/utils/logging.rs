//! Log output setup

use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;

/// Build the log subscriber for the given level, writing to `writer`.
///
/// The binary passes stderr so stdout stays free for announcements and
/// terminal-title escapes.
pub fn log_subscriber<W>(level: &str, writer: W) -> impl Subscriber + Send + Sync
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(format!("pomodoro_server={},tower_http=info", level))
        .with_writer(writer)
        .finish()
}

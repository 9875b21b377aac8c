use std::path::Path;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install a file-backed tracing subscriber.
///
/// Nothing is installed without a path: writing to stdout or stderr would
/// corrupt the TUI. The filter comes from `RUST_LOG` and defaults to `info`.
pub fn init_logging(log_path: Option<&Path>) {
    let Some(path) = log_path else {
        return;
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file = match std::fs::OpenOptions::new().create(true).append(true).open(path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("warning: failed to open log file {}: {e}", path.display());
            return;
        }
    };

    let file_layer = fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    // a second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::registry().with(filter).with(file_layer).try_init();
}

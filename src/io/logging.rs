use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

use super::workspace_io::LOG_FILE;

/// Environment variable overriding the log filter (e.g. `TUIDO_LOG=debug`).
pub const LOG_ENV: &str = "TUIDO_LOG";

fn default_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Send log output to `<dir>/info.log`. The returned guard flushes the
/// writer on drop and must live as long as logging is wanted. Returns `None`
/// when the directory does not exist or a subscriber is already installed.
pub fn init(dir: &Path, verbosity: u8) -> Option<WorkerGuard> {
    if !dir.is_dir() {
        return None;
    }
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbosity)));
    let appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false);
    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .ok()?;
    Some(guard)
}

//! Log sink initialization.
//!
//! One log file per process in `<home>/.jasmin-lsp/server-<YYYYMMDD-HHMMSS>.log`,
//! per-line timestamped, mirrored to stderr. The level comes from the
//! `--log-level` flag when given, else `RUST_LOG`, else `info`.

use std::fs;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Directory under the user's home where log files accumulate.
const LOG_DIR: &str = ".jasmin-lsp";

fn log_file_path() -> Option<PathBuf> {
    let dir = dirs::home_dir()?.join(LOG_DIR);
    fs::create_dir_all(&dir).ok()?;
    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    Some(dir.join(format!("server-{stamp}.log")))
}

/// Initialize the tracing subscriber.
///
/// Returns the appender guard that must stay alive for the duration of the
/// process so buffered log lines are flushed on exit. Failing to create
/// the log file degrades to stderr-only logging rather than failing init.
pub fn init_logging(log_level: Option<&str>) -> Option<WorkerGuard> {
    let env_filter = match log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_ansi(false);

    let (file_layer, guard) = match log_file_path().and_then(|p| fs::File::create(p).ok()) {
        Some(file) => {
            let (writer, guard) = tracing_appender::non_blocking(file);
            (Some(fmt::layer().with_writer(writer).with_ansi(false)), Some(guard))
        }
        None => (None, None),
    };

    let result = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init();

    if let Err(e) = result {
        // A second init (tests) is harmless; anything else is worth a note.
        eprintln!("jasmin-lsp: logging init skipped: {e}");
    }
    guard
}

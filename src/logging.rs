//! Structured run log.
//!
//! Each run starts a fresh `sync.log` in the working directory. Level is
//! controlled by `RUST_LOG`. Falls back to stderr if the file can't be created.

use fs_err as fs;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const LOG_FILE: &str = "sync.log";

/// Installs the global subscriber. Keep the guard alive until exit so the
/// log is flushed.
pub fn init(dir: &Path) -> Option<WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("modrinth_collection_sync=info"));

    let _ = fs::remove_file(dir.join(LOG_FILE));

    match create_file_appender(dir) {
        Ok(file_appender) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(false),
                )
                .init();
            Some(guard)
        }
        Err(_) => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
            None
        }
    }
}

fn create_file_appender(
    dir: &Path,
) -> Result<RollingFileAppender, tracing_appender::rolling::InitError> {
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix("sync")
        .filename_suffix("log")
        .build(dir)
}

//! Log setup shared by both vizlearn commands
//!
//! Every run writes to a daily file under the platform data directory.
//! `serve` mirrors records to stderr. `play` logs to the file only, since
//! its stdout carries JSON events.

use std::path::PathBuf;

use chrono::Utc;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::Result;

/// Where log output goes in addition to the rolling file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogOutput {
    /// File only (headless mode keeps stdout clean for NDJSON)
    #[default]
    File,
    /// File plus stderr (server mode)
    FileAndStderr,
}

const LOG_FILE_PREFIX: &str = "vizlearn.log";

/// Install the global subscriber for `output`.
///
/// `VIZLEARN_LOG` takes an `EnvFilter` directive, e.g.
/// `VIZLEARN_LOG=vizlearn_server=debug vizlearn serve`.
pub fn init(output: LogOutput) -> Result<()> {
    let log_dir = get_log_directory()?;
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE_PREFIX);

    // Default to info, allow override via VIZLEARN_LOG
    let env_filter = EnvFilter::try_from_env("VIZLEARN_LOG")
        .unwrap_or_else(|_| EnvFilter::new("vizlearn=info,warn"));

    let stderr_layer = (output == LogOutput::FileAndStderr).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .with(stderr_layer)
        .init();

    tracing::info!("═══════════════════════════════════════════════════════");
    tracing::info!("vizlearn starting");
    tracing::info!("Log directory: {}", log_dir.display());
    tracing::info!("═══════════════════════════════════════════════════════");

    Ok(())
}

/// Get the log directory path
fn get_log_directory() -> Result<PathBuf> {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    Ok(base.join("vizlearn").join("logs"))
}

/// Today's log file; the daily appender suffixes the UTC date
pub fn get_current_log_file() -> Result<PathBuf> {
    let dir = get_log_directory()?;
    Ok(dir.join(dated_file_name(&Utc::now().format("%Y-%m-%d").to_string())))
}

fn dated_file_name(date: &str) -> String {
    format!("{}.{}", LOG_FILE_PREFIX, date)
}

//! Logging system: warnings on stderr, debug log files with daily rotation.

use anyhow::Result;
use std::fs;
use std::io::IsTerminal;
use std::path::Path;
use time::macros::format_description;
use tracing::Level;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::time::OffsetTime;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

const LOG_FILE_PREFIX: &str = "machine-driver-hetzner";

/// Initialize the logging system.
///
/// Deprecation warnings always reach stderr. With `debug`, everything down to
/// DEBUG is also written to a daily log file under `config.log_path`.
pub fn init(config: &Config, debug: bool) -> Result<()> {
    let level = if debug { Level::DEBUG } else { Level::WARN };

    let file_layer = if debug {
        if !config.log_path.exists() {
            fs::create_dir_all(&config.log_path)?;
        }
        cleanup_old_logs(&config.log_path)?;

        let file_appender =
            RollingFileAppender::new(Rotation::DAILY, &config.log_path, LOG_FILE_PREFIX);

        // Use local timezone for timestamps
        let time_format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
        let local_offset = time::UtcOffset::current_local_offset().unwrap_or(time::UtcOffset::UTC);
        let timer = OffsetTime::new(local_offset, time_format);

        Some(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true)
                .with_timer(timer),
        )
    } else {
        None
    };

    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(level.into()))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .with_target(false)
                .without_time(),
        )
        .with(file_layer);

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set global subscriber: {}", e))?;

    Ok(())
}

/// Clean up log files older than 2 days.
pub fn cleanup_old_logs(log_path: &Path) -> Result<()> {
    use std::time::{Duration, SystemTime};

    let two_days = Duration::from_secs(2 * 24 * 60 * 60);
    let cutoff = SystemTime::now() - two_days;

    if !log_path.exists() {
        return Ok(());
    }

    for entry in fs::read_dir(log_path)? {
        let entry = entry?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let filename = match path.file_name().and_then(|n| n.to_str()) {
            Some(n) => n,
            None => continue,
        };

        if !filename.starts_with(LOG_FILE_PREFIX) {
            continue;
        }

        if let Ok(metadata) = entry.metadata() {
            if let Ok(modified) = metadata.modified() {
                if modified < cutoff {
                    let _ = fs::remove_file(&path);
                }
            }
        }
    }

    Ok(())
}

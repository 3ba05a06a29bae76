use std::fs;
use std::io;
use std::path::PathBuf;

use time::UtcOffset;
use time::macros::format_description;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{self, fmt, prelude::*};

const LOG_RETENTION_DAYS: u64 = 7;

/// Get the log directory path in the user-specific OS cache directory
/// - Linux: ~/.cache/snippet-engine/
/// - macOS: ~/Library/Caches/snippet-engine/
/// - Windows: %LOCALAPPDATA%\snippet-engine\
fn get_log_dir() -> io::Result<PathBuf> {
    let cache_dir = dirs::cache_dir().ok_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "Unable to determine user cache directory")
    })?;

    let mut log_dir = cache_dir;
    log_dir.push("snippet-engine");

    if !log_dir.exists() {
        fs::create_dir_all(&log_dir)?;
    }

    Ok(log_dir)
}

/// Clean up session log files older than LOG_RETENTION_DAYS
fn cleanup_old_logs(log_dir: &PathBuf) -> io::Result<()> {
    let now = std::time::SystemTime::now();
    let retention = std::time::Duration::from_secs(LOG_RETENTION_DAYS * 24 * 60 * 60);

    if let Ok(entries) = fs::read_dir(log_dir) {
        for entry in entries.flatten() {
            if let Ok(metadata) = entry.metadata() {
                if metadata.is_file() {
                    if let Some(name) = entry.file_name().to_str() {
                        if name.starts_with("session-") && name.ends_with(".log") {
                            if let Ok(modified) = metadata.modified() {
                                if let Ok(age) = now.duration_since(modified) {
                                    if age > retention {
                                        if let Err(e) = fs::remove_file(entry.path()) {
                                            eprintln!(
                                                "Failed to remove old log file {:?}: {}",
                                                entry.path(),
                                                e
                                            );
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    Ok(())
}

/// Initialize logging with both stderr and optional file output
/// Returns a WorkerGuard that must be kept alive for the duration of the program
///
/// # Arguments
/// * `no_color` - Disable ANSI colors in stderr output
/// * `log_level` - Override log level (otherwise uses RUST_LOG or defaults to "info")
/// * `enable_file_logging` - Enable session file logging to the cache directory (disable for tests)
///
/// # Logging Behavior
/// - **Stderr/Console**: Logs at the configured level (default "info")
/// - **Session File**: Logs at DEBUG level with full detail
pub fn init_logger(
    no_color: bool,
    log_level: Option<&str>,
    enable_file_logging: bool,
) -> io::Result<WorkerGuard> {
    let timer = fmt::time::OffsetTime::new(
        UtcOffset::UTC,
        format_description!(
            "[[[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z]"
        ),
    );

    // If --log-level was not provided, fall back to RUST_LOG or default to "info"
    let stderr_filter = match log_level {
        Some(level) => tracing_subscriber::EnvFilter::new(level),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    };

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_timer(timer.clone())
        .with_ansi(!no_color)
        .with_filter(stderr_filter);

    // Session files log at DEBUG level regardless of the stderr filter
    let file_filter = tracing_subscriber::EnvFilter::new("debug");

    if enable_file_logging {
        let log_dir = get_log_dir()?;
        cleanup_old_logs(&log_dir)?;

        let timestamp = time::OffsetDateTime::now_utc()
            .format(
                &time::format_description::parse("[year][month][day]-[hour][minute][second]")
                    .unwrap(),
            )
            .unwrap();
        let pid = std::process::id();
        let log_filename = format!("session-{}-{}.log", timestamp, pid);
        let log_path = log_dir.join(&log_filename);

        let file = fs::OpenOptions::new().create(true).append(true).open(&log_path)?;

        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        let file_layer = fmt::layer()
            .with_writer(non_blocking)
            .with_timer(timer)
            .with_ansi(false) // No ANSI colors in file
            .with_filter(file_filter);

        let result = tracing_subscriber::registry()
            .with(stderr_layer)
            .with(file_layer)
            .try_init();

        match result {
            Ok(()) => {
                eprintln!("Logging to file: {:?}", log_path);
                Ok(guard)
            }
            Err(e) => {
                // Ignore errors due to the subscriber or logger already being set
                if e.to_string().contains("already been set")
                    || e.to_string().contains("SetLoggerError")
                {
                    eprintln!("Logging to file: {:?}", log_path);
                    Ok(guard)
                } else {
                    Err(io::Error::other(e))
                }
            }
        }
    } else {
        // No file logging - use a dummy guard
        let (_, guard) = tracing_appender::non_blocking(std::io::sink());

        let result = tracing_subscriber::registry().with(stderr_layer).try_init();

        match result {
            Ok(()) => Ok(guard),
            Err(e) => {
                if e.to_string().contains("already been set")
                    || e.to_string().contains("SetLoggerError")
                {
                    Ok(guard)
                } else {
                    Err(io::Error::other(e))
                }
            }
        }
    }
}

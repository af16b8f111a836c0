//! Logging Module
//!
//! File-only logging for TUI mode. While ratatui is in raw/alternate-screen
//! mode, stdout belongs to the UI, so everything (including engine failures
//! the form never surfaces) goes to rolling JSON files in the app data
//! directory.

use std::fs;
use std::path::PathBuf;

use flate2::write::GzEncoder;
use flate2::Compression;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const LOG_FILE: &str = "stts.log";

fn log_dir() -> PathBuf {
    // App data directory, not the source tree, so a dev file watcher never
    // sees log churn
    dirs::data_dir()
        .map(|d| d.join("stts").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// Initialize the logging system for TUI mode.
///
/// Sets up a daily-rolling JSON file logger, redirects standard `log` crate
/// events to `tracing`, and gzips older log files in the background. There
/// is no stdout layer; the TUI owns the terminal.
///
/// Returns a `WorkerGuard` which must be kept alive for the duration of the
/// application to ensure buffered logs are flushed on shutdown.
pub fn init_tui() -> WorkerGuard {
    let log_dir = log_dir();

    if !log_dir.exists() {
        if let Err(e) = fs::create_dir_all(&log_dir) {
            eprintln!("Failed to create logs directory: {}", e);
        }
    }

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Filter from STTS_LOG (e.g. "debug", "stts=trace"), default "info"
    let env_filter =
        EnvFilter::try_from_env("STTS_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    // File Layer: JSON format for easy parsing/ingestion
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .json()
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_target(true)
        .with_filter(env_filter);

    // No stdout layer; the TUI owns the terminal
    tracing_subscriber::registry().with(file_layer).init();

    // Redirect standard `log` macros to `tracing`
    if let Err(e) = tracing_log::LogTracer::init() {
        eprintln!("Failed to initialize LogTracer: {}", e);
    }

    tracing::info!(log_dir = %log_dir.display(), "Logging initialized");

    // Compress old logs in background (AFTER logging is initialized so log
    // macros work)
    let log_dir_clone = log_dir.clone();
    std::thread::spawn(move || {
        compress_old_logs(log_dir_clone);
    });

    guard
}

/// Compress old log files in the background
fn compress_old_logs(log_dir: PathBuf) {
    let now = chrono::Local::now();
    let today_suffix = now.format("%Y-%m-%d").to_string();

    if let Ok(entries) = fs::read_dir(&log_dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                // Rolling format is "stts.log.YYYY-MM-DD"; compress everything
                // except today's file and already-compressed ones
                let should_compress = name.starts_with(&format!("{LOG_FILE}."))
                    && !name.ends_with(&today_suffix)
                    && !name.ends_with(".gz");

                if should_compress {
                    if let Err(e) = compress_file(&path) {
                        log::warn!("Failed to compress old log {:?}: {}", path, e);
                    } else {
                        log::info!("Compressed old log: {:?}", path);
                    }
                }
            }
        }
    }
}

fn compress_file(path: &std::path::Path) -> std::io::Result<()> {
    let file = fs::File::open(path)?;
    let mut reader = std::io::BufReader::new(file);

    let mut gz_path_name = path
        .file_name()
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, "No filename"))?
        .to_os_string();
    gz_path_name.push(".gz");
    let parent_dir = path
        .parent()
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, "No parent directory"))?;
    let gz_path = parent_dir.join(gz_path_name);

    // Skip if already exists
    if gz_path.exists() {
        return Ok(());
    }

    let output = fs::File::create(&gz_path)?;
    let mut encoder = GzEncoder::new(output, Compression::default());

    std::io::copy(&mut reader, &mut encoder)?;
    encoder.finish()?;

    fs::remove_file(path)?;

    Ok(())
}

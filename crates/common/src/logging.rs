//! Tracing setup for the CLI and long-running sessions.
//!
//! Logs go to stdout unless [`LoggingConfig::file`] names a file, in which
//! case they are appended there without ANSI colors.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::CogniscriptResult;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `config.level` when set. Fails only if
/// the log file cannot be opened; a second call keeps the first subscriber.
pub fn init_logging(config: &LoggingConfig) -> CogniscriptResult<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let writer = log_writer(config)?;
    let ansi = config.file.is_none();

    if config.json {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(writer)
            .json()
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    } else {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(writer)
            .with_ansi(ansi)
            .with_target(true)
            .with_thread_ids(false)
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    }

    if let Some(path) = &config.file {
        tracing::debug!(path = %path.display(), "Logging to file");
    }
    Ok(())
}

/// Where formatted events are written.
fn log_writer(config: &LoggingConfig) -> CogniscriptResult<BoxMakeWriter> {
    let Some(path) = &config.file else {
        return Ok(BoxMakeWriter::new(std::io::stdout));
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(BoxMakeWriter::new(Mutex::new(file)))
}

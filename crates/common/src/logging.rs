//! Logging and tracing initialization.
//!
//! Logs never go to stdout: the CLI prints reports there.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::MotionResult;

/// Initialize the tracing subscriber with the given configuration.
///
/// `RUST_LOG` overrides the configured level. With `file` set, logs are
/// appended to that file instead of stderr.
pub fn init_logging(config: &LoggingConfig) -> MotionResult<()> {
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
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    }

    Ok(())
}

fn log_writer(config: &LoggingConfig) -> MotionResult<BoxMakeWriter> {
    let Some(path) = &config.file else {
        return Ok(BoxMakeWriter::new(std::io::stderr));
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(BoxMakeWriter::new(Mutex::new(file)))
}

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::prelude::*;

use crate::config::LogFormat;

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid log filter: {0}")]
    Filter(String),
    #[error("failed to install subscriber: {0}")]
    Init(String),
}

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `filter`. A log file always receives JSON
/// lines; otherwise events go to stderr in `format`.
pub fn init_logging(
    format: LogFormat,
    filter: &str,
    log_file: Option<&Path>,
) -> Result<(), LoggingError> {
    let filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directive) if !directive.trim().is_empty() => EnvFilter::try_new(directive),
        _ => EnvFilter::try_new(filter),
    }
    .map_err(|err| LoggingError::Filter(err.to_string()))?;

    let registry = tracing_subscriber::registry().with(filter);

    let result = match (log_file, format) {
        (Some(path), _) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let file = Arc::new(Mutex::new(file));
            let make_writer = BoxMakeWriter::new(move || SharedWriter {
                file: Arc::clone(&file),
            });
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_timer(UtcTime::rfc_3339())
                        .with_writer(make_writer),
                )
                .try_init()
        }
        (None, LogFormat::Json) => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_timer(UtcTime::rfc_3339())
                    .with_writer(io::stderr),
            )
            .try_init(),
        (None, LogFormat::Text) => registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .try_init(),
    };

    result.map_err(|err| LoggingError::Init(err.to_string()))
}

/// Appends log lines to one file shared by every writer the layer creates.
struct SharedWriter {
    file: Arc<Mutex<File>>,
}

impl SharedWriter {
    fn file(&self) -> io::Result<MutexGuard<'_, File>> {
        self.file
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))
    }
}

impl Write for SharedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file()?.flush()
    }
}

use crate::config::LogFormat;
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// Console and optional log file use the same format; the file is written
/// without ANSI colors and truncated at startup.
pub fn init(log_format: LogFormat, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::from_default_env().add_directive("smokemon=info".parse()?);
    let file = log_file.map(File::create).transpose()?.map(Mutex::new);

    let registry = tracing_subscriber::registry().with(filter);
    match log_format {
        LogFormat::Text => registry
            .with(fmt::layer())
            .with(file.map(|file| fmt::layer().with_ansi(false).with_writer(file)))
            .try_init()?,
        LogFormat::Json => registry
            .with(fmt::layer().json())
            .with(file.map(|file| fmt::layer().json().with_ansi(false).with_writer(file)))
            .try_init()?,
    }
    Ok(())
}

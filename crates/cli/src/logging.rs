//! Subscriber setup: stderr always, plus a run log file truncated at startup.

use anyhow::{Context, Result};
use ledger_core::config::LoggingConfig;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Level filter from `RUST_LOG`, falling back to the configured level.
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Install the global subscriber. `log_file` is `None` for one-shot commands.
pub fn init_logging(config: &LoggingConfig, log_file: Option<&Path>) -> Result<()> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_timer(ChronoLocal::new(TIME_FORMAT.to_string()));

    let file = log_file
        .map(|path| {
            File::create(path)
                .map(Arc::new)
                .with_context(|| format!("cannot create log file {}", path.display()))
        })
        .transpose()?;

    let (json_layer, text_layer) = match file {
        Some(file) if config.json => (
            Some(
                fmt::layer()
                    .json()
                    .with_writer(file)
                    .with_timer(ChronoLocal::new(TIME_FORMAT.to_string())),
            ),
            None,
        ),
        Some(file) => (
            None,
            Some(
                fmt::layer()
                    .with_writer(file)
                    .with_ansi(false)
                    .with_target(false)
                    .with_timer(ChronoLocal::new(TIME_FORMAT.to_string())),
            ),
        ),
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(stderr_layer)
        .with(json_layer)
        .with(text_layer)
        .try_init()
        .context("logging already initialized")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_truncated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trade_parser.log");
        std::fs::write(&path, "previous run\n").unwrap();

        init_logging(&LoggingConfig::default(), Some(&path)).unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);
    }
}

//! Logging initialization

use crate::config::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` overrides the configured level when set. With `logging.json`
/// enabled, events are emitted as one JSON object per line for log shippers.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    if config.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(false)
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to set subscriber: {e}"))?;
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to set subscriber: {e}"))?;
    }

    Ok(())
}

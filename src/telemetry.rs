use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, LogFormat};

/// Installs the global tracing subscriber. Fails if one is already set.
pub fn init(config: &AppConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_new(&config.log_filter)
        .map_err(|e| anyhow::anyhow!("invalid log filter {:?}: {}", config.log_filter, e))?;

    let result = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .try_init(),
        LogFormat::Plain => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .try_init(),
    };

    result.map_err(|e| anyhow::anyhow!("install tracing subscriber: {}", e))
}

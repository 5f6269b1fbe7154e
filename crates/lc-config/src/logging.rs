use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

use crate::settings::AppConfig;

/// Installs the global subscriber: JSON lines in production, compact text
/// everywhere else. Falls back to `info` when `log_level` does not parse.
pub fn init_tracing(config: &AppConfig) -> Result<()> {
    let (filter, rejected) = match EnvFilter::try_new(&config.log_level) {
        Ok(filter) => (filter, None),
        Err(err) => (EnvFilter::new("info"), Some(err)),
    };

    if config.is_production() {
        fmt()
            .with_env_filter(filter)
            .json()
            .with_target(false)
            .try_init()
            .map_err(|err| anyhow::anyhow!(err))?;
    } else {
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .try_init()
            .map_err(|err| anyhow::anyhow!(err))?;
    }

    if let Some(err) = rejected {
        tracing::warn!(log_level = %config.log_level, error = %err, "unparsable log level, using info");
    }

    Ok(())
}

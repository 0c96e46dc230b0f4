//! Tracing setup

use tracing_subscriber::EnvFilter;

use crate::{config::Config, error::Result};

/// Install a global tracing subscriber configured from `config.logging`
///
/// Invalid filter directives fall back to `info`. Installing twice is an
/// error; embedders that already own a subscriber should skip this.
pub fn init_tracing(config: &Config) -> Result<()> {
    let filter =
        EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = if config.logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .try_init()
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).try_init()
    };
    installed.map_err(|e| {
        crate::Error::Internal(format!("Failed to install tracing subscriber: {e}"))
    })?;

    tracing::info!(
        level = %config.logging.level,
        json = config.logging.json,
        "Tracing initialized"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_only_once() {
        let config = Config::default();
        let _ = init_tracing(&config);
        assert!(matches!(
            init_tracing(&config),
            Err(crate::Error::Internal(_))
        ));
    }
}

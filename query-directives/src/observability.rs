//! Tracing setup
//!
//! The parsers emit `debug` events when they reject a directive and `trace`
//! events for accepted ones. Services that already install a subscriber need
//! nothing from this module.

use tracing_subscriber::EnvFilter;

use crate::{config::DirectivesConfig, error::Result};

/// Initialize JSON tracing with the configured log level
///
/// An unparsable level falls back to `info`. Calling this twice is harmless:
/// the second call leaves the existing subscriber in place, and the function
/// currently always returns `Ok`.
pub fn init_tracing(config: &DirectivesConfig) -> Result<()> {
    let installed = tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(log_level = %config.log_level, "Tracing initialized");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_is_idempotent() {
        let config = DirectivesConfig::default();
        assert!(init_tracing(&config).is_ok());
        assert!(init_tracing(&config).is_ok());
    }

    #[test]
    fn test_init_tracing_with_bad_level() {
        let config = DirectivesConfig {
            log_level: "not a level[".to_string(),
            ..DirectivesConfig::default()
        };
        assert!(init_tracing(&config).is_ok());
    }
}

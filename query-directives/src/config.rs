//! Configuration management using Figment
//!
//! Endpoint policies can be declared in code or loaded from configuration.
//! Configuration is loaded from multiple sources with the following precedence
//! (highest to lowest):
//! 1. Environment variables (prefix: `QUERY_DIRECTIVES_`, nested keys split on `__`)
//! 2. Current working directory: `./query-directives.toml`
//! 3. System directory: `/etc/query-directives/config.toml`
//! 4. Default values
//!
//! # Example file
//!
//! ```toml
//! log_level = "debug"
//!
//! [parameters]
//! filters = "filter"
//!
//! [endpoints.users.filters]
//! allowed_fields = ["age", "name"]
//! allowed_rules = ["gte", "lt", "like"]
//!
//! [endpoints.users.sort]
//! allowed_fields = ["id", "name"]
//! default = { property = "id", direction = "asc" }
//!
//! [endpoints.users.limit]
//! min = 1
//! max = 100
//! default = 20
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::directives::{EndpointPolicy, ParameterNames};
use crate::error::{Error, Result};

/// File name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "query-directives.toml";

/// Prefix of environment variable overrides
pub const ENV_PREFIX: &str = "QUERY_DIRECTIVES_";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectivesConfig {
    /// Log level filter (trace, debug, info, warn, error or an `EnvFilter` directive)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Query parameter names
    #[serde(default)]
    pub parameters: ParameterNames,

    /// Policies keyed by endpoint name
    #[serde(default)]
    pub endpoints: BTreeMap<String, EndpointPolicy>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for DirectivesConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            parameters: ParameterNames::default(),
            endpoints: BTreeMap::new(),
        }
    }
}

impl DirectivesConfig {
    /// Load configuration from all sources
    ///
    /// Every config file found is merged, higher priority files overriding
    /// lower ones. Environment variables override all file-based configs.
    pub fn load() -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(DirectivesConfig::default()));

        for path in Self::find_config_paths().iter().rev() {
            if path.exists() {
                tracing::info!("Loading configuration from: {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
        }

        let config = figment.merge(Env::prefixed(ENV_PREFIX).split("__")).extract()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// Environment variables still override the file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::NotFound(format!(
                "configuration file {}",
                path.display()
            )));
        }

        let config = Figment::new()
            .merge(Serialized::defaults(DirectivesConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        Ok(config)
    }

    /// Parse configuration from a TOML string, without environment overrides
    pub fn from_toml(toml: &str) -> Result<Self> {
        let config = Figment::new()
            .merge(Serialized::defaults(DirectivesConfig::default()))
            .merge(Toml::string(toml))
            .extract()?;

        Ok(config)
    }

    /// Config file paths in priority order (highest first)
    fn find_config_paths() -> Vec<PathBuf> {
        vec![
            PathBuf::from(CONFIG_FILE_NAME),
            PathBuf::from("/etc/query-directives").join("config.toml"),
        ]
    }

    /// The policy declared for `name`
    pub fn endpoint(&self, name: &str) -> Result<&EndpointPolicy> {
        self.endpoints
            .get(name)
            .ok_or_else(|| Error::NotFound(format!("endpoint `{name}`")))
    }

    /// Add or replace the policy of an endpoint
    #[must_use]
    pub fn with_endpoint(mut self, name: impl Into<String>, policy: EndpointPolicy) -> Self {
        self.endpoints.insert(name.into(), policy);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterRule;
    use crate::policy::{LimitBounds, SortDefault};
    use crate::sort::Direction;
    use std::io::Write;

    const USERS_TOML: &str = r#"
        log_level = "debug"

        [parameters]
        filters = "filter"

        [endpoints.users.filters]
        allowed_fields = ["age", "name"]
        allowed_rules = ["gte", "lt", "not_like"]

        [endpoints.users.sort]
        allowed_fields = ["id"]
        default = { property = "id", direction = "asc" }

        [endpoints.users.limit]
        min = 0
        max = 100
        default = 20
    "#;

    #[test]
    fn test_default_config() {
        let config = DirectivesConfig::default();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.parameters, ParameterNames::default());
        assert!(config.endpoints.is_empty());
    }

    #[test]
    fn test_from_toml() {
        let config = DirectivesConfig::from_toml(USERS_TOML).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.parameters.filters, "filter");
        assert_eq!(config.parameters.sort, "sort");

        let users = config.endpoint("users").unwrap();
        assert!(users.filters.allowed_fields.permits("age"));
        assert_eq!(
            users.filters.allowed_rules.as_slice(),
            [
                FilterRule::GreaterThanOrEquals,
                FilterRule::LessThan,
                FilterRule::NotLike
            ]
        );
        assert_eq!(
            users.sort.default,
            Some(SortDefault::new("id", Direction::Ascending))
        );
        assert_eq!(
            users.limit,
            LimitBounds::new().with_min(0).with_max(100).with_default(20)
        );
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(
            DirectivesConfig::from_toml("").unwrap(),
            DirectivesConfig::default()
        );
    }

    #[test]
    fn test_unknown_rule_in_config_is_rejected() {
        let toml = r#"
            [endpoints.users.filters]
            allowed_rules = ["between"]
        "#;
        assert!(matches!(
            DirectivesConfig::from_toml(toml),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_unknown_endpoint() {
        let config = DirectivesConfig::default();
        assert!(matches!(config.endpoint("orders"), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_with_endpoint() {
        let config = DirectivesConfig::default().with_endpoint("orders", EndpointPolicy::new());
        assert!(config.endpoint("orders").is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(USERS_TOML.as_bytes()).unwrap();

        let config = DirectivesConfig::load_from(file.path()).unwrap();
        assert!(config.endpoints.contains_key("users"));
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = DirectivesConfig::load_from(dir.path().join("missing.toml"));
        assert!(matches!(result, Err(Error::NotFound(_))));
    }
}

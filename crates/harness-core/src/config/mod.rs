//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate, with `WORKER__`-prefixed environment variables layered on
//! top. Each sub-module represents a logical configuration section.

pub mod hooks;
pub mod logging;

use serde::{Deserialize, Serialize};

use self::hooks::HooksConfig;
use self::logging::LoggingConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Hooks to enable at startup.
    #[serde(default)]
    pub hooks: HooksConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// The file is optional; a missing file yields the defaults. Environment
    /// variables such as `WORKER__LOGGING__LEVEL=debug` override file values.
    pub fn load(path: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("WORKER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Build configuration from an in-memory TOML document.
    pub fn from_toml_str(toml: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::hooks::HookSpecConfig;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = AppConfig::from_toml_str("").expect("parse");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "pretty");
        assert!(config.hooks.enabled.is_empty());
    }

    #[test]
    fn test_hooks_section() {
        let config = AppConfig::from_toml_str(
            r#"
            [logging]
            level = "debug"

            [[hooks.enabled]]
            name = "request_log"
            options = ["level=debug"]

            [[hooks.enabled]]
            name = "timing"
            "#,
        )
        .expect("parse");

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "pretty");
        assert_eq!(
            config.hooks.enabled,
            vec![
                HookSpecConfig {
                    name: "request_log".to_string(),
                    options: vec!["level=debug".to_string()],
                },
                HookSpecConfig {
                    name: "timing".to_string(),
                    options: Vec::new(),
                },
            ]
        );
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        let config = AppConfig::load("does/not/exist/worker").expect("load");
        assert!(config.hooks.enabled.is_empty());
    }
}

use crate::error::AppError;
use config::{
    Config as Cfg, ConfigBuilder, Environment, File, Map, builder::DefaultState,
};
use serde::Deserialize;

/// Settings shared by every service: listening port and logging.
///
/// Values come from an optional `configuration` file and from unprefixed
/// environment variables (`PORT`, `LOG_LEVEL`, `OTLP_ENDPOINT`). Empty
/// variables count as unset.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

fn default_port() -> u16 {
    5050
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Builds the configuration from `vars`, or from the process environment
    /// when `None`.
    pub fn from_source(vars: Option<Map<String, String>>) -> Result<Self, AppError> {
        let config = builder(vars).build()?;
        Ok(config.try_deserialize()?)
    }
}

/// Source pipeline used by every service configuration in the workspace.
pub fn builder(vars: Option<Map<String, String>>) -> ConfigBuilder<DefaultState> {
    Cfg::builder()
        .add_source(File::with_name("configuration").required(false))
        .add_source(
            Environment::default()
                .try_parsing(true)
                .ignore_empty(true)
                .source(vars),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Option<Map<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = Config::from_source(vars(&[])).unwrap();
        assert_eq!(config.port, 5050);
        assert_eq!(config.log_level, "info");
        assert!(config.otlp_endpoint.is_none());
    }

    #[test]
    fn port_is_read_from_environment() {
        let config = Config::from_source(vars(&[("PORT", "8081")])).unwrap();
        assert_eq!(config.port, 8081);
    }

    #[test]
    fn empty_port_falls_back_to_default() {
        let config = Config::from_source(vars(&[("PORT", "")])).unwrap();
        assert_eq!(config.port, 5050);
    }

    #[test]
    fn invalid_port_is_a_config_error() {
        let err = Config::from_source(vars(&[("PORT", "not-a-port")])).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));

        let err = Config::from_source(vars(&[("PORT", "70000")])).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }

    #[test]
    fn logging_settings_are_read() {
        let config = Config::from_source(vars(&[
            ("LOG_LEVEL", "debug"),
            ("OTLP_ENDPOINT", "http://tempo:4317"),
        ]))
        .unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.otlp_endpoint.as_deref(), Some("http://tempo:4317"));
    }
}

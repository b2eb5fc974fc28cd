//! Configuration types.

use std::net::SocketAddr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use daedalus_server::ServerConfig;
use daedalus_telemetry::{LogConfig, LogFormat};

use crate::ConfigError;

/// Complete service configuration.
///
/// ```
/// use daedalus_config::DaedalusConfig;
///
/// let config = DaedalusConfig::default();
/// assert_eq!(config.server.http_addr, "0.0.0.0:8080");
/// assert_eq!(config.logging.level, "info");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct DaedalusConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerSection,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingSection,
}

impl DaedalusConfig {
    /// Checks values that deserialize but cannot be used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.http_addr.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::invalid_value(
                "server.http_addr",
                format!("invalid socket address: {}", self.server.http_addr),
            ));
        }
        if self.server.shutdown_timeout_secs == 0 {
            return Err(ConfigError::invalid_value(
                "server.shutdown_timeout_secs",
                "must be greater than zero",
            ));
        }
        if self.server.request_timeout_ms == 0 {
            return Err(ConfigError::invalid_value(
                "server.request_timeout_ms",
                "must be greater than zero",
            ));
        }
        if self.server.max_body_bytes == 0 {
            return Err(ConfigError::invalid_value(
                "server.max_body_bytes",
                "must be greater than zero",
            ));
        }
        if let Err(err) = daedalus_telemetry::create_env_filter(&self.logging.level) {
            return Err(ConfigError::invalid_value("logging.level", err.to_string()));
        }
        Ok(())
    }
}

/// `[server]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSection {
    /// Bind address.
    pub http_addr: String,
    /// Graceful shutdown timeout in seconds.
    pub shutdown_timeout_secs: u64,
    /// Body collection timeout in milliseconds.
    pub request_timeout_ms: u64,
    /// Largest accepted request body.
    pub max_body_bytes: usize,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            http_addr: daedalus_server::config::DEFAULT_HTTP_ADDR.to_string(),
            shutdown_timeout_secs: daedalus_server::config::DEFAULT_SHUTDOWN_TIMEOUT_SECS,
            request_timeout_ms: daedalus_server::config::DEFAULT_REQUEST_TIMEOUT_MS,
            max_body_bytes: daedalus_server::config::DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl ServerSection {
    /// Converts to the server's runtime configuration.
    #[must_use]
    pub fn to_server_config(&self) -> ServerConfig {
        ServerConfig::builder()
            .http_addr(self.http_addr.clone())
            .shutdown_timeout(Duration::from_secs(self.shutdown_timeout_secs))
            .request_timeout(Duration::from_millis(self.request_timeout_ms))
            .max_body_bytes(self.max_body_bytes)
            .build()
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    /// Whether to install a subscriber.
    pub enabled: bool,
    /// Filter directive.
    pub level: String,
    /// `json`, `pretty` or `compact`.
    pub format: LogFormat,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            format: LogFormat::Json,
        }
    }
}

impl LoggingSection {
    /// Converts to the telemetry crate's configuration.
    #[must_use]
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig {
            enabled: self.enabled,
            level: self.level.clone(),
            format: self.format,
            ..LogConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DaedalusConfig::default();
        assert_eq!(config.server.shutdown_timeout_secs, 30);
        assert_eq!(config.server.request_timeout_ms, 30_000);
        assert_eq!(config.server.max_body_bytes, 1_048_576);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_address() {
        let mut config = DaedalusConfig::default();
        config.server.http_addr = "localhost".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "server.http_addr"
        ));
    }

    #[test]
    fn test_validate_rejects_zero_limits() {
        let mut config = DaedalusConfig::default();
        config.server.max_body_bytes = 0;
        assert!(config.validate().is_err());

        let mut config = DaedalusConfig::default();
        config.server.request_timeout_ms = 0;
        assert!(config.validate().is_err());

        let mut config = DaedalusConfig::default();
        config.server.shutdown_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_level() {
        let mut config = DaedalusConfig::default();
        config.logging.level = "daedalus=shouting".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let result: Result<DaedalusConfig, _> =
            serde_json::from_str(r#"{"server": {"http_adr": "0.0.0.0:1"}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let result: Result<DaedalusConfig, _> =
            serde_json::from_str(r#"{"logging": {"format": "xml"}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_conversions() {
        let config = DaedalusConfig::default();
        let server = config.server.to_server_config();
        assert_eq!(server.request_timeout(), Duration::from_secs(30));
        assert_eq!(server.max_body_bytes(), 1_048_576);

        let log = config.logging.to_log_config();
        assert_eq!(log.level, "info");
        assert_eq!(log.format, LogFormat::Json);
    }
}

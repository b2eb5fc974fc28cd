//! Layered configuration loader.
//!
//! Layers apply in this order, later ones winning:
//!
//! 1. Built-in defaults
//! 2. A TOML or JSON file
//! 3. Environment variables named `{PREFIX}__{SECTION}__{KEY}`
//!
//! Validation runs once, after every layer has been applied.

use std::path::Path;

use crate::{ConfigError, DaedalusConfig};

/// Default prefix for environment overrides.
pub const DEFAULT_ENV_PREFIX: &str = "DAEDALUS";

/// Supported file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// TOML.
    Toml,
    /// JSON.
    Json,
}

impl FileFormat {
    /// Detects the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("json") => Ok(Self::Json),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }

    fn parse(self, content: &str) -> Result<DaedalusConfig, ConfigError> {
        match self {
            Self::Toml => Ok(toml::from_str(content)?),
            Self::Json => Ok(serde_json::from_str(content)?),
        }
    }
}

/// Builds a [`DaedalusConfig`] from defaults, a file and the environment.
///
/// ```
/// use daedalus_config::{ConfigLoader, FileFormat};
///
/// let config = ConfigLoader::new()
///     .with_string("[server]\nhttp_addr = \"127.0.0.1:9000\"", FileFormat::Toml)?
///     .load_from_vars(std::iter::empty())?;
/// assert_eq!(config.server.http_addr, "127.0.0.1:9000");
/// # Ok::<(), daedalus_config::ConfigError>(())
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    config: DaedalusConfig,
    env_prefix: String,
}

impl ConfigLoader {
    /// Starts from built-in defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: DaedalusConfig::default(),
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
        }
    }

    /// Replaces the current layer with a file. Missing files are an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }
        let format = FileFormat::from_path(path)?;
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;
        self.config = format.parse(&content)?;
        Ok(self)
    }

    /// Like [`with_file`](Self::with_file), but a missing file is skipped.
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Replaces the current layer with inline content.
    pub fn with_string(mut self, content: &str, format: FileFormat) -> Result<Self, ConfigError> {
        self.config = format.parse(content)?;
        Ok(self)
    }

    /// Sets the environment prefix. The prefix is uppercased.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into().to_uppercase();
        self
    }

    /// Loads a `.env` file from the working directory into the process
    /// environment, if one exists.
    pub fn with_dotenv(self) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(err) if err.not_found() => Ok(self),
            Err(err) => Err(err.into()),
        }
    }

    /// Applies process environment overrides and validates.
    pub fn load(self) -> Result<DaedalusConfig, ConfigError> {
        self.load_from_vars(std::env::vars())
    }

    /// Applies overrides from `vars` instead of the process environment,
    /// then validates.
    pub fn load_from_vars<I>(mut self, vars: I) -> Result<DaedalusConfig, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let marker = format!("{}__", self.env_prefix);
        for (key, value) in vars {
            if let Some(rest) = key.strip_prefix(&marker) {
                let parts: Vec<&str> = rest.split("__").collect();
                apply_env_var(&mut self.config, &key, &parts, &value)?;
            }
        }
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_env_var(
    config: &mut DaedalusConfig,
    var: &str,
    parts: &[&str],
    value: &str,
) -> Result<(), ConfigError> {
    match parts {
        ["SERVER", "HTTP_ADDR"] => config.server.http_addr = value.to_string(),
        ["SERVER", "SHUTDOWN_TIMEOUT_SECS"] => {
            config.server.shutdown_timeout_secs = parse_number(var, value)?;
        }
        ["SERVER", "REQUEST_TIMEOUT_MS"] => {
            config.server.request_timeout_ms = parse_number(var, value)?;
        }
        ["SERVER", "MAX_BODY_BYTES"] => {
            config.server.max_body_bytes = parse_number(var, value)?;
        }
        ["LOGGING", "ENABLED"] => config.logging.enabled = parse_bool(var, value)?,
        ["LOGGING", "LEVEL"] => config.logging.level = value.to_string(),
        ["LOGGING", "FORMAT"] => {
            config.logging.format = value
                .parse()
                .map_err(|e: daedalus_telemetry::TelemetryError| {
                    ConfigError::env_parse_error(var, e.to_string())
                })?;
        }
        // Unknown keys under the prefix are ignored.
        _ => {}
    }
    Ok(())
}

fn parse_number<N: std::str::FromStr>(var: &str, value: &str) -> Result<N, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::env_parse_error(var, format!("expected integer, got '{value}'")))
}

fn parse_bool(var: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::env_parse_error(
            var,
            format!("expected boolean, got '{value}'"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use daedalus_telemetry::LogFormat;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_only() {
        let config = ConfigLoader::new().load_from_vars(Vec::new()).unwrap();
        assert_eq!(config, DaedalusConfig::default());
    }

    #[test]
    fn test_loader_with_string_toml() {
        let toml = r#"
            [server]
            http_addr = "127.0.0.1:3000"
            max_body_bytes = 2048

            [logging]
            level = "debug"
            format = "pretty"
        "#;
        let config = ConfigLoader::new()
            .with_string(toml, FileFormat::Toml)
            .unwrap()
            .load_from_vars(Vec::new())
            .unwrap();

        assert_eq!(config.server.http_addr, "127.0.0.1:3000");
        assert_eq!(config.server.max_body_bytes, 2048);
        assert_eq!(config.server.request_timeout_ms, 30_000);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_loader_with_string_json() {
        let json = r#"{"server": {"shutdown_timeout_secs": 5}}"#;
        let config = ConfigLoader::new()
            .with_string(json, FileFormat::Json)
            .unwrap()
            .load_from_vars(Vec::new())
            .unwrap();
        assert_eq!(config.server.shutdown_timeout_secs, 5);
    }

    #[test]
    fn test_env_overrides_file() {
        let config = ConfigLoader::new()
            .with_string("[server]\nhttp_addr = \"127.0.0.1:3000\"", FileFormat::Toml)
            .unwrap()
            .load_from_vars(vars(&[
                ("DAEDALUS__SERVER__HTTP_ADDR", "127.0.0.1:4000"),
                ("DAEDALUS__SERVER__REQUEST_TIMEOUT_MS", "250"),
                ("DAEDALUS__LOGGING__FORMAT", "compact"),
                ("DAEDALUS__LOGGING__ENABLED", "off"),
                ("OTHER__SERVER__HTTP_ADDR", "ignored"),
            ]))
            .unwrap();

        assert_eq!(config.server.http_addr, "127.0.0.1:4000");
        assert_eq!(config.server.request_timeout_ms, 250);
        assert_eq!(config.logging.format, LogFormat::Compact);
        assert!(!config.logging.enabled);
    }

    #[test]
    fn test_custom_prefix() {
        let config = ConfigLoader::new()
            .with_env_prefix("games")
            .load_from_vars(vars(&[
                ("GAMES__SERVER__MAX_BODY_BYTES", "10"),
                ("DAEDALUS__SERVER__MAX_BODY_BYTES", "20"),
            ]))
            .unwrap();
        assert_eq!(config.server.max_body_bytes, 10);
    }

    #[test]
    fn test_env_parse_error() {
        let err = ConfigLoader::new()
            .load_from_vars(vars(&[("DAEDALUS__SERVER__MAX_BODY_BYTES", "lots")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::EnvParseError { ref var, .. } if var == "DAEDALUS__SERVER__MAX_BODY_BYTES"
        ));

        let err = ConfigLoader::new()
            .load_from_vars(vars(&[("DAEDALUS__LOGGING__FORMAT", "xml")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::EnvParseError { .. }));
    }

    #[test]
    fn test_validation_runs_after_env() {
        let err = ConfigLoader::new()
            .load_from_vars(vars(&[("DAEDALUS__SERVER__HTTP_ADDR", "not-an-address")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_unknown_env_keys_are_ignored() {
        let config = ConfigLoader::new()
            .load_from_vars(vars(&[("DAEDALUS__CACHE__SIZE", "12")]))
            .unwrap();
        assert_eq!(config, DaedalusConfig::default());
    }

    #[test]
    fn test_invalid_toml() {
        let result = ConfigLoader::new().with_string("[server", FileFormat::Toml);
        assert!(matches!(result, Err(ConfigError::TomlError(_))));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(FileFormat::from_path(Path::new("a.toml")).unwrap(), FileFormat::Toml);
        assert_eq!(FileFormat::from_path(Path::new("a.json")).unwrap(), FileFormat::Json);
        assert!(FileFormat::from_path(Path::new("a.yaml")).is_err());
        assert!(FileFormat::from_path(Path::new("config")).is_err());
    }
}

// TOML config adapter - Configuration management using TOML files

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::adapters::probe_ffprobe::DEFAULT_FFPROBE;
use crate::domain::errors::*;
use crate::probe::MalformedLinePolicy;
use crate::utils::logging::{LogFormat, LogLevel, LoggingConfig};

/// File looked up in the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "streamprobe.toml";

/// Environment variables and the setting each one overrides
pub const ENV_FFPROBE: &str = "STREAMPROBE_FFPROBE";
pub const ENV_MALFORMED_LINES: &str = "STREAMPROBE_MALFORMED_LINES";
pub const ENV_TIMEOUT_SECS: &str = "STREAMPROBE_TIMEOUT_SECS";
pub const ENV_LOG_LEVEL: &str = "STREAMPROBE_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "STREAMPROBE_LOG_FORMAT";

/// Effective application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Inspection tool executable
    pub ffprobe_path: PathBuf,
    /// Handling of report lines without `=`
    pub malformed_lines: MalformedLinePolicy,
    /// Upper bound on one tool invocation
    pub timeout_secs: Option<u64>,
    pub log_level: LogLevel,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ffprobe_path: PathBuf::from(DEFAULT_FFPROBE),
            malformed_lines: MalformedLinePolicy::Skip,
            timeout_secs: None,
            log_level: LogLevel::Info,
            log_format: LogFormat::Pretty,
        }
    }
}

impl AppConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn logging(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.log_level,
            format: self.log_format,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    streamprobe: AppConfig,
}

/// TOML configuration adapter
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Parse the `[streamprobe]` table of a TOML document
    pub fn parse(toml_content: &str) -> Result<AppConfig, DomainError> {
        let file: ConfigFile = toml::from_str(toml_content)
            .map_err(|e| DomainError::Config(format!("Failed to parse TOML config: {}", e)))?;
        Ok(file.streamprobe)
    }

    /// Load configuration from file
    pub fn load(path: &Path) -> Result<AppConfig, DomainError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DomainError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::parse(&content)
    }

    /// Explicit path if given, else the default file when it exists
    pub fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
        match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                default.is_file().then_some(default)
            }
        }
    }

    /// Apply environment overrides read through `lookup`
    pub fn apply_env<F>(config: &mut AppConfig, lookup: F) -> Result<usize, DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut overrides = 0;

        if let Some(value) = lookup(ENV_FFPROBE) {
            config.ffprobe_path = PathBuf::from(value);
            overrides += 1;
        }
        if let Some(value) = lookup(ENV_MALFORMED_LINES) {
            config.malformed_lines = value.parse()?;
            overrides += 1;
        }
        if let Some(value) = lookup(ENV_TIMEOUT_SECS) {
            let secs = value.trim().parse::<u64>().map_err(|e| {
                DomainError::Config(format!("Invalid {}: {} ({})", ENV_TIMEOUT_SECS, value, e))
            })?;
            config.timeout_secs = Some(secs);
            overrides += 1;
        }
        if let Some(value) = lookup(ENV_LOG_LEVEL) {
            config.log_level = value.parse()?;
            overrides += 1;
        }
        if let Some(value) = lookup(ENV_LOG_FORMAT) {
            config.log_format = value.parse()?;
            overrides += 1;
        }

        Ok(overrides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_parse_full_table() {
        let config = TomlConfigAdapter::parse(
            r#"
            [streamprobe]
            ffprobe_path = "/opt/ffmpeg/bin/ffprobe"
            malformed_lines = "fail"
            timeout_secs = 30
            log_level = "debug"
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.ffprobe_path, PathBuf::from("/opt/ffmpeg/bin/ffprobe"));
        assert_eq!(config.malformed_lines, MalformedLinePolicy::Fail);
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let config = TomlConfigAdapter::parse("[streamprobe]\ntimeout_secs = 5\n").unwrap();
        assert_eq!(config.ffprobe_path, PathBuf::from("ffprobe"));
        assert_eq!(config.malformed_lines, MalformedLinePolicy::Skip);

        assert_eq!(TomlConfigAdapter::parse("").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(TomlConfigAdapter::parse("[streamprobe]\nmalformed_lines = \"maybe\"\n").is_err());
        assert!(TomlConfigAdapter::parse("not toml at all [").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_MALFORMED_LINES, "fail"),
            (ENV_TIMEOUT_SECS, "12"),
            (ENV_LOG_LEVEL, "warn"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        let applied =
            TomlConfigAdapter::apply_env(&mut config, |key| env.get(key).map(|v| v.to_string()))
                .unwrap();

        assert_eq!(applied, 3);
        assert_eq!(config.malformed_lines, MalformedLinePolicy::Fail);
        assert_eq!(config.timeout_secs, Some(12));
        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_env_override_invalid() {
        let mut config = AppConfig::default();
        let result = TomlConfigAdapter::apply_env(&mut config, |key| {
            (key == ENV_TIMEOUT_SECS).then(|| "soon".to_string())
        });
        assert!(matches!(result, Err(DomainError::Config(_))));
    }
}

//! Configuration initialization and hierarchy management

use anyhow::{Context, Result};

use crate::adapters::{AppConfig, TomlConfigAdapter};
use crate::cli::{Cli, Commands};
use crate::probe::MalformedLinePolicy;

/// Where each layer of the effective configuration came from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSources {
    pub file: Option<String>,
    pub env_overrides: usize,
    pub cli_overrides: usize,
}

/// Resolve configuration following precedence: CLI > Env > File > Defaults
pub fn initialize_configuration_hierarchy(cli: &Cli) -> Result<(AppConfig, ConfigSources)> {
    resolve_configuration(cli, |key| std::env::var(key).ok())
}

/// Same as [`initialize_configuration_hierarchy`] with an injectable
/// environment lookup
pub fn resolve_configuration<F>(cli: &Cli, env: F) -> Result<(AppConfig, ConfigSources)>
where
    F: Fn(&str) -> Option<String>,
{
    let mut sources = ConfigSources::default();

    // Step 1: defaults, step 2: file
    let mut config = match TomlConfigAdapter::resolve_path(cli.config.as_deref()) {
        Some(path) => {
            let config = TomlConfigAdapter::load(&path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            sources.file = Some(path.display().to_string());
            config
        }
        None => AppConfig::default(),
    };

    // Step 3: environment
    sources.env_overrides = TomlConfigAdapter::apply_env(&mut config, env)
        .context("Invalid environment configuration")?;

    // Step 4: command line
    sources.cli_overrides = apply_cli_configuration_overrides(&mut config, cli);

    Ok((config, sources))
}

fn apply_cli_configuration_overrides(config: &mut AppConfig, cli: &Cli) -> usize {
    let mut cli_overrides = 0;

    if let Some(level) = cli.log_level {
        config.log_level = level;
        cli_overrides += 1;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
        cli_overrides += 1;
    }

    match &cli.command {
        Commands::Inspect(args) => {
            if let Some(ffprobe) = &args.ffprobe {
                config.ffprobe_path = ffprobe.clone();
                cli_overrides += 1;
            }
            if let Some(timeout) = args.timeout {
                config.timeout_secs = Some(timeout);
                cli_overrides += 1;
            }
        }
        Commands::Parse(args) => {
            if args.strict {
                config.malformed_lines = MalformedLinePolicy::Fail;
                cli_overrides += 1;
            }
        }
    }

    cli_overrides
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::logging::LogLevel;
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn test_cli_beats_env_beats_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("probe.toml");
        std::fs::write(
            &config_path,
            "[streamprobe]\nffprobe_path = \"/from/file\"\nlog_level = \"error\"\ntimeout_secs = 1\n",
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "streamprobe",
            "--config",
            config_path.to_str().unwrap(),
            "inspect",
            "--input",
            "movie.mkv",
            "--timeout",
            "9",
        ])
        .unwrap();

        let (config, sources) = resolve_configuration(&cli, |key| {
            (key == "STREAMPROBE_LOG_LEVEL").then(|| "debug".to_string())
        })
        .unwrap();

        assert_eq!(config.ffprobe_path, PathBuf::from("/from/file"));
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.timeout_secs, Some(9));
        assert_eq!(config.malformed_lines, MalformedLinePolicy::Skip);
        assert_eq!(sources.env_overrides, 1);
        assert_eq!(sources.cli_overrides, 1);
        assert!(sources.file.is_some());
    }

    #[test]
    fn test_missing_explicit_config_file_is_an_error() {
        let cli = Cli::try_parse_from([
            "streamprobe",
            "--config",
            "/no/such/streamprobe.toml",
            "parse",
            "--report",
            "-",
        ])
        .unwrap();
        assert!(resolve_configuration(&cli, |_| None).is_err());
    }

    #[test]
    fn test_strict_only_applies_to_parse() {
        let inspect = Cli::try_parse_from([
            "streamprobe",
            "inspect",
            "--input",
            "movie.mkv",
            "--strict",
        ]);
        assert!(inspect.is_err());

        let cli = Cli::try_parse_from(["streamprobe", "parse", "--report", "-", "--strict"])
            .unwrap();
        let (config, sources) = resolve_configuration(&cli, |_| None).unwrap();
        assert_eq!(config.malformed_lines, MalformedLinePolicy::Fail);
        assert_eq!(sources.cli_overrides, 1);
    }
}

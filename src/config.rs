/// Configuration loader - parses batmon.toml
///
/// Keeps the data layout (where the logger's files live and how they are
/// named) and chart settings out of the code, so a different SD card dump
/// or shunt naming scheme needs no recompile.

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::model::ChannelKind;

/// Default config file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "batmon.toml";

/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_ENV: &str = "BATMON_CONFIG";

/// Environment variable overriding `data.base_dir`.
pub const DATA_DIR_ENV: &str = "BATMON_DATA_DIR";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Where the date directories live and how channel files are named.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DataConfig {
    pub base_dir: PathBuf,
    pub current_prefix: String,
    pub voltage_prefix: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("visualization/data"),
            current_prefix: ChannelKind::Current.default_prefix().to_string(),
            voltage_prefix: ChannelKind::Voltage.default_prefix().to_string(),
        }
    }
}

impl DataConfig {
    pub fn prefix(&self, kind: ChannelKind) -> &str {
        match kind {
            ChannelKind::Current => &self.current_prefix,
            ChannelKind::Voltage => &self.voltage_prefix,
        }
    }
}

/// Chart output settings (used by the `plot` feature).
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlotConfig {
    pub output_dir: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("visualization/plots"),
            width: 1500,
            height: 800,
        }
    }
}

/// Root configuration structure for TOML parsing
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct BatmonConfig {
    pub data: DataConfig,
    pub plot: PlotConfig,
}

/// Parses configuration text. Missing tables and fields take defaults.
pub fn parse_config(contents: &str, path: &Path) -> Result<BatmonConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads configuration from an explicit path. The file must exist.
pub fn load_config_from(path: &Path) -> Result<BatmonConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&contents, path)
}

/// Loads the configuration the CLI runs with.
///
/// Path resolution: `explicit` if given, else `$BATMON_CONFIG`, else
/// `batmon.toml`. Only an explicitly named file is required to exist;
/// otherwise a missing file means defaults. `$BATMON_DATA_DIR`, when set,
/// replaces `data.base_dir`.
pub fn load_config(explicit: Option<&Path>) -> Result<BatmonConfig, ConfigError> {
    let mut config = match explicit {
        Some(path) => load_config_from(path)?,
        None => {
            let path = env::var_os(CONFIG_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
            if path.exists() {
                load_config_from(&path)?
            } else {
                log::debug!("{} not found, using defaults", path.display());
                BatmonConfig::default()
            }
        }
    };

    if let Some(dir) = env::var_os(DATA_DIR_ENV) {
        config.data.base_dir = PathBuf::from(dir);
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_config_parses() {
        let config = load_config_from(Path::new(DEFAULT_CONFIG_PATH))
            .expect("batmon.toml at the crate root should parse");
        assert_eq!(config.data.current_prefix, "Amps");
        assert_eq!(config.data.voltage_prefix, "Volts");
        assert!(config.plot.width > 0 && config.plot.height > 0);
    }

    #[test]
    fn test_empty_config_takes_defaults() {
        let config = parse_config("", Path::new("empty.toml")).expect("empty TOML is valid");
        assert_eq!(config, BatmonConfig::default());
        assert_eq!(config.data.base_dir, PathBuf::from("visualization/data"));
    }

    #[test]
    fn test_partial_config_keeps_other_defaults() {
        let config = parse_config(
            "[data]\nbase_dir = \"/mnt/sd\"\n",
            Path::new("partial.toml"),
        )
        .expect("partial TOML should parse");
        assert_eq!(config.data.base_dir, PathBuf::from("/mnt/sd"));
        assert_eq!(config.data.current_prefix, "Amps");
        assert_eq!(config.plot, PlotConfig::default());
    }

    #[test]
    fn test_prefix_lookup_by_kind() {
        let data = DataConfig {
            current_prefix: "Shunt".to_string(),
            ..DataConfig::default()
        };
        assert_eq!(data.prefix(ChannelKind::Current), "Shunt");
        assert_eq!(data.prefix(ChannelKind::Voltage), "Volts");
    }

    #[test]
    fn test_malformed_config_is_parse_error() {
        let result = parse_config("[plot]\nwidth = \"wide\"\n", Path::new("bad.toml"));
        assert!(
            matches!(result, Err(ConfigError::Parse { .. })),
            "wrong field type should fail, got {:?}",
            result
        );
    }

    #[test]
    fn test_missing_explicit_config_is_read_error() {
        let path = std::env::temp_dir().join("batmon-missing-config.toml");
        let result = load_config(Some(&path));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}

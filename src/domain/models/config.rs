use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::error::{LogitError, LogitResult};
use crate::domain::models::format::StructuredFormat;
use crate::domain::models::level::Level;
use crate::domain::units::{parse_duration, parse_size};

/// String-keyed configuration, as accepted by `Logger::configure_from_dict`
pub type ConfigDict = BTreeMap<String, String>;

/// Keys every configuration dictionary must carry
pub const REQUIRED_KEYS: [&str; 2] = ["level", "log_file_path"];

/// Keys a configuration dictionary may carry in addition to the required ones
pub const OPTIONAL_KEYS: [&str; 2] = ["rotation_time", "rotation_size"];

/// Level, file and rotation configuration of a logger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    /// Messages below this level are dropped
    pub level: Level,
    /// Primary log file; relative paths resolve against the project root
    pub log_file_path: PathBuf,
    /// Rotate once this many seconds have passed since the last rotation
    pub rotation_seconds: Option<u64>,
    /// Rotate once the file holds at least this many kilobytes (1 kb = 1000 bytes)
    pub rotation_kilobytes: Option<u64>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: Level::Clutter,
            log_file_path: PathBuf::from(default_log_file_path()),
            rotation_seconds: None,
            rotation_kilobytes: None,
        }
    }
}

impl LoggerConfig {
    /// Build a configuration from a dictionary with a fixed key set.
    ///
    /// `level` and `log_file_path` are required, `rotation_time` and
    /// `rotation_size` are optional, anything else is rejected.
    pub fn from_dict(dict: &ConfigDict) -> LogitResult<Self> {
        let missing: Vec<&str> = REQUIRED_KEYS
            .into_iter()
            .filter(|key| !dict.contains_key(*key))
            .collect();
        if !missing.is_empty() {
            return Err(LogitError::InvalidConfig(format!(
                "missing required keys: {}",
                missing.join(", ")
            )));
        }

        let unknown: Vec<&str> = dict
            .keys()
            .map(String::as_str)
            .filter(|key| !REQUIRED_KEYS.contains(key) && !OPTIONAL_KEYS.contains(key))
            .collect();
        if !unknown.is_empty() {
            return Err(LogitError::InvalidConfig(format!(
                "unknown keys: {}",
                unknown.join(", ")
            )));
        }

        Ok(Self {
            level: Level::from_value(&dict["level"])?,
            log_file_path: PathBuf::from(&dict["log_file_path"]),
            rotation_seconds: dict
                .get("rotation_time")
                .map(|text| parse_duration(text))
                .transpose()?,
            rotation_kilobytes: dict
                .get("rotation_size")
                .map(|text| parse_size(text))
                .transpose()?,
        })
    }

    /// The `level` and `log_file_path` entries of this configuration
    pub fn to_dict(&self) -> ConfigDict {
        ConfigDict::from([
            ("level".to_string(), self.level.value().to_string()),
            (
                "log_file_path".to_string(),
                self.log_file_path.display().to_string(),
            ),
        ])
    }
}

/// Serializable logger settings, loaded from `.logit/config.yaml` and the environment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct LoggerSettings {
    /// Minimum level name
    #[serde(default = "default_level")]
    pub level: String,

    /// Primary log file
    #[serde(default = "default_log_file_path")]
    pub log_file_path: String,

    /// Duration literal such as `"7d"`
    #[serde(default)]
    pub rotation_time: Option<String>,

    /// Size literal such as `"5mb"`
    #[serde(default)]
    pub rotation_size: Option<String>,

    /// Print each line to stdout as well
    #[serde(default = "default_true")]
    pub echo: bool,

    /// Structured sink formats to register
    #[serde(default)]
    pub structured: Vec<String>,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
            log_file_path: default_log_file_path(),
            rotation_time: None,
            rotation_size: None,
            echo: true,
            structured: Vec::new(),
        }
    }
}

impl LoggerSettings {
    /// Validate every field and convert to a logger configuration plus sink formats
    pub fn resolve(&self) -> LogitResult<(LoggerConfig, Vec<StructuredFormat>)> {
        if self.log_file_path.trim().is_empty() {
            return Err(LogitError::InvalidConfig(
                "log_file_path cannot be empty".to_string(),
            ));
        }

        let config = LoggerConfig {
            level: Level::from_value(&self.level)?,
            log_file_path: PathBuf::from(&self.log_file_path),
            rotation_seconds: self
                .rotation_time
                .as_deref()
                .map(parse_duration)
                .transpose()?,
            rotation_kilobytes: self
                .rotation_size
                .as_deref()
                .map(parse_size)
                .transpose()?,
        };

        let formats = self
            .structured
            .iter()
            .map(|name| name.parse::<StructuredFormat>())
            .collect::<LogitResult<Vec<_>>>()?;

        Ok((config, formats))
    }
}

fn default_level() -> String {
    Level::Clutter.value().to_string()
}

fn default_log_file_path() -> String {
    "app.log".to_string()
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dict(pairs: &[(&str, &str)]) -> ConfigDict {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_from_dict_minimal() {
        let config =
            LoggerConfig::from_dict(&dict(&[("level", "debug"), ("log_file_path", "keys.log")]))
                .unwrap();
        assert_eq!(config.level, Level::Debug);
        assert_eq!(config.log_file_path, PathBuf::from("keys.log"));
        assert_eq!(config.rotation_seconds, None);
        assert_eq!(config.rotation_kilobytes, None);
    }

    #[test]
    fn test_from_dict_with_rotation() {
        let config = LoggerConfig::from_dict(&dict(&[
            ("level", "info"),
            ("log_file_path", "app.log"),
            ("rotation_time", "1w"),
            ("rotation_size", "2mb"),
        ]))
        .unwrap();
        assert_eq!(config.rotation_seconds, Some(604_800));
        assert_eq!(config.rotation_kilobytes, Some(2_000));
    }

    #[test]
    fn test_from_dict_missing_key() {
        let err = LoggerConfig::from_dict(&dict(&[("level", "info")])).unwrap_err();
        assert!(matches!(err, LogitError::InvalidConfig(msg) if msg.contains("log_file_path")));
    }

    #[test]
    fn test_from_dict_unknown_key() {
        let err = LoggerConfig::from_dict(&dict(&[
            ("level", "info"),
            ("log_file_path", "app.log"),
            ("colour", "red"),
        ]))
        .unwrap_err();
        assert!(matches!(err, LogitError::InvalidConfig(msg) if msg.contains("colour")));
    }

    #[test]
    fn test_from_dict_bad_values() {
        assert!(matches!(
            LoggerConfig::from_dict(&dict(&[("level", "loud"), ("log_file_path", "a.log")])),
            Err(LogitError::InvalidLevel(_))
        ));
        assert!(matches!(
            LoggerConfig::from_dict(&dict(&[
                ("level", "info"),
                ("log_file_path", "a.log"),
                ("rotation_time", "5x"),
            ])),
            Err(LogitError::Parse { .. })
        ));
    }

    #[test]
    fn test_to_dict() {
        let config = LoggerConfig::default();
        assert_eq!(
            config.to_dict(),
            dict(&[("level", "clutter"), ("log_file_path", "app.log")])
        );
    }

    #[test]
    fn test_settings_resolve() {
        let settings = LoggerSettings {
            level: "warning".to_string(),
            rotation_size: Some("10kb".to_string()),
            structured: vec!["json".to_string(), "csv".to_string()],
            ..LoggerSettings::default()
        };
        let (config, formats) = settings.resolve().unwrap();
        assert_eq!(config.level, Level::Warning);
        assert_eq!(config.rotation_kilobytes, Some(10));
        assert_eq!(formats, vec![StructuredFormat::Json, StructuredFormat::Csv]);
    }

    #[test]
    fn test_settings_resolve_rejects_unknown_format() {
        let settings = LoggerSettings {
            structured: vec!["yaml".to_string()],
            ..LoggerSettings::default()
        };
        assert!(matches!(
            settings.resolve(),
            Err(LogitError::FormatNotSupported(_))
        ));
    }

    #[test]
    fn test_settings_resolve_rejects_empty_path() {
        let settings = LoggerSettings {
            log_file_path: "  ".to_string(),
            ..LoggerSettings::default()
        };
        assert!(matches!(settings.resolve(), Err(LogitError::InvalidConfig(_))));
    }
}

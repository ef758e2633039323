use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;

use crate::domain::error::LogitError;
use crate::domain::models::LoggerSettings;
use crate::infrastructure::paths::ProjectPaths;

/// Settings loader with hierarchical merging
pub struct SettingsLoader;

impl SettingsLoader {
    /// Load settings for a project
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. `.logit/config.yaml` (project settings, optional)
    /// 3. Environment variables (`LOGIT_*` prefix, highest priority)
    pub fn load(paths: &ProjectPaths) -> Result<LoggerSettings> {
        let settings: LoggerSettings = Figment::new()
            .merge(Serialized::defaults(LoggerSettings::default()))
            .merge(Yaml::file(paths.settings_file()))
            .merge(Env::prefixed("LOGIT_").split("__"))
            .extract()
            .context("Failed to extract logger settings from figment")?;

        Self::validate(&settings)?;
        Ok(settings)
    }

    /// Load settings from a specific YAML file, without environment overrides
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<LoggerSettings> {
        let settings: LoggerSettings = Figment::new()
            .merge(Serialized::defaults(LoggerSettings::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load logger settings from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&settings)?;
        Ok(settings)
    }

    /// Validate settings after loading
    pub fn validate(settings: &LoggerSettings) -> Result<(), LogitError> {
        settings.resolve().map(drop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Level;
    use std::fs;
    use tempfile::TempDir;

    const ENV_KEYS: [&str; 6] = [
        "LOGIT_LEVEL",
        "LOGIT_LOG_FILE_PATH",
        "LOGIT_ROTATION_TIME",
        "LOGIT_ROTATION_SIZE",
        "LOGIT_ECHO",
        "LOGIT_STRUCTURED",
    ];

    fn write_settings(paths: &ProjectPaths, yaml: &str) {
        fs::create_dir_all(paths.config_dir()).unwrap();
        fs::write(paths.settings_file(), yaml).unwrap();
    }

    #[test]
    fn test_defaults_without_file() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ProjectPaths::new(temp_dir.path());

        temp_env::with_vars_unset(ENV_KEYS, || {
            let settings = SettingsLoader::load(&paths).unwrap();
            assert_eq!(settings, LoggerSettings::default());
        });
    }

    #[test]
    fn test_yaml_file_is_merged() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ProjectPaths::new(temp_dir.path());
        write_settings(
            &paths,
            r"
level: warning
log_file_path: logs/server.log
rotation_time: 1w
rotation_size: 5mb
echo: false
structured:
  - json
  - xml
",
        );

        temp_env::with_vars_unset(ENV_KEYS, || {
            let settings = SettingsLoader::load(&paths).unwrap();
            assert_eq!(settings.level, "warning");
            assert_eq!(settings.log_file_path, "logs/server.log");
            assert_eq!(settings.rotation_time.as_deref(), Some("1w"));
            assert!(!settings.echo);

            let (config, formats) = settings.resolve().unwrap();
            assert_eq!(config.level, Level::Warning);
            assert_eq!(config.rotation_kilobytes, Some(5_000));
            assert_eq!(formats.len(), 2);
        });
    }

    #[test]
    fn test_env_overrides_file() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ProjectPaths::new(temp_dir.path());
        write_settings(&paths, "level: info\n");

        temp_env::with_vars(
            [
                ("LOGIT_LEVEL", Some("error")),
                ("LOGIT_LOG_FILE_PATH", None),
                ("LOGIT_ROTATION_TIME", None),
                ("LOGIT_ROTATION_SIZE", None),
                ("LOGIT_ECHO", None),
                ("LOGIT_STRUCTURED", None),
            ],
            || {
                let settings = SettingsLoader::load(&paths).unwrap();
                assert_eq!(settings.level, "error");
            },
        );
    }

    #[test]
    fn test_invalid_level_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ProjectPaths::new(temp_dir.path());
        write_settings(&paths, "level: shouty\n");

        temp_env::with_vars_unset(ENV_KEYS, || {
            let err = SettingsLoader::load(&paths).unwrap_err();
            assert!(matches!(
                err.downcast_ref::<LogitError>(),
                Some(LogitError::InvalidLevel(_))
            ));
        });
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("logit.yaml");
        fs::write(&path, "rotation_time: 5x\n").unwrap();

        let err = SettingsLoader::load_from_file(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LogitError>(),
            Some(LogitError::Parse { .. })
        ));
    }
}

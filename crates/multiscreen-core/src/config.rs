use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::defaults::Settings;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    /// Transition defaults, keyed like the runtime settings surface
    #[serde(default)]
    pub defaults: Settings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Get the configuration file path
    /// Always uses ~/.config/multiscreen/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("multiscreen")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::Defaults;
    use crate::command::Direction;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.general.log_level, "info");
        assert!(config.defaults.is_empty());
    }

    #[test]
    fn test_defaults_table() {
        let config: AppConfig = toml::from_str(
            r#"
            [general]
            log_level = "debug"

            [defaults]
            default_animation = "fadeleft"
            default_scroll_time = 80
            "#,
        )
        .unwrap();
        assert_eq!(config.general.log_level, "debug");

        let mut defaults = Defaults::new();
        assert!(config.defaults.apply(&mut defaults).all_ok());
        assert_eq!(defaults.exit_animation(), Direction::FadeLeft);
        assert_eq!(defaults.scroll_time().as_millis(), 80);
    }

    #[test]
    fn test_malformed_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[defaults\n").unwrap();

        assert!(matches!(AppConfig::load_from(&path), Err(crate::Error::Config(_))));
        assert!(matches!(
            AppConfig::load_from(&dir.path().join("missing.toml")),
            Err(crate::Error::Io(_))
        ));
    }
}

//! Calendar configuration.
//!
//! Read from `~/.config/eventcal/config.toml` and `EVENTCAL_*` environment
//! variables (the environment wins).

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{CalendarError, CalendarResult};
use crate::view::ViewMode;

static DEFAULT_STORE_PATH: &str = "~/.local/share/eventcal/events.json";

fn default_store_path() -> PathBuf {
    PathBuf::from(DEFAULT_STORE_PATH)
}

fn is_default_store_path(p: &PathBuf) -> bool {
    *p == default_store_path()
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CalendarConfig {
    /// JSON document holding events and lookup tables
    #[serde(default = "default_store_path", skip_serializing_if = "is_default_store_path")]
    pub store_path: PathBuf,

    /// View shown when no view is requested explicitly
    #[serde(default)]
    pub default_view: ViewMode,

    /// Employee id to act as, overriding the store's session user
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_user: Option<String>,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        CalendarConfig {
            store_path: default_store_path(),
            default_view: ViewMode::default(),
            current_user: None,
        }
    }
}

impl CalendarConfig {
    pub fn config_path() -> CalendarResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CalendarError::Config("Could not determine config directory".into()))?
            .join("eventcal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the user config, creating a commented default file on first run.
    pub fn load() -> CalendarResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> CalendarResult<Self> {
        Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("EVENTCAL"))
            .build()
            .map_err(|e| CalendarError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CalendarError::Config(e.to_string()))
    }

    /// Store path with `~` expanded.
    pub fn store_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.store_path.to_string_lossy()).into_owned())
    }

    pub fn save(&self, path: &Path) -> CalendarResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| CalendarError::Config(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| CalendarError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> CalendarResult<()> {
        let contents = format!(
            "\
# eventcal configuration

# Where events and lookup tables are stored:
# store_path = \"{}\"

# View to open with (month, week, day, employee):
# default_view = \"month\"

# Employee id to act as:
# current_user = \"emp-1\"
",
            DEFAULT_STORE_PATH
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CalendarError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CalendarError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_file_loads_as_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eventcal/config.toml");

        CalendarConfig::create_default_config(&path).unwrap();
        let config = CalendarConfig::load_from(&path).unwrap();

        assert_eq!(config.store_path, default_store_path());
        assert_eq!(config.default_view, ViewMode::Month);
        assert_eq!(config.current_user, None);
    }

    #[test]
    fn saved_values_are_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = CalendarConfig {
            store_path: PathBuf::from("/srv/events.json"),
            default_view: ViewMode::Week,
            current_user: Some("emp-7".into()),
        };
        config.save(&path).unwrap();

        assert_eq!(CalendarConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn store_path_expands_tilde() {
        let config = CalendarConfig::default();
        assert!(!config.store_path().to_string_lossy().starts_with('~'));
    }
}

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const APP_DIR: &str = "taskplanner";

fn default_api_base_url() -> String {
    "http://localhost:5000".into()
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("~/.local/share"))
        .join(APP_DIR)
}

/// How a failed completion toggle is rolled back when several toggles of
/// the same record are in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToggleRollback {
    /// Every failure restores the flag it toggled away from, in resolution
    /// order, even over a newer toggle.
    #[default]
    LastResolvedWins,
    /// A failure only rolls back if no newer toggle of the record was issued.
    LatestToggleWins,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub api_base_url: String,
    pub data_directory: PathBuf,
    pub debug_logging: bool,
    pub toggle_rollback: ToggleRollback,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            data_directory: default_data_dir(),
            debug_logging: false,
            toggle_rollback: ToggleRollback::default(),
        }
    }
}

impl PlannerConfig {
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join(APP_DIR)
            .join("config.json")
    }

    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Read the config, falling back to defaults when it is missing or broken.
    pub fn load(path: &Path) -> Self {
        match Self::read(path) {
            Ok(config) => config,
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                log::warn!("Using default config, {} unusable: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Key-value store file holding the category list.
    pub fn store_path(&self) -> PathBuf {
        self.data_directory.join("store.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = PlannerConfig::load(&dir.path().join("absent.json"));
        assert_eq!(config, PlannerConfig::default());
        assert_eq!(config.api_base_url, "http://localhost:5000");
        assert_eq!(config.toggle_rollback, ToggleRollback::LastResolvedWins);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"api_base_url":"http://tasks.lan:8080","toggle_rollback":"latest-toggle-wins"}"#).unwrap();

        let config = PlannerConfig::load(&path);
        assert_eq!(config.api_base_url, "http://tasks.lan:8080");
        assert_eq!(config.toggle_rollback, ToggleRollback::LatestToggleWins);
        assert!(!config.debug_logging);
    }

    #[test]
    fn broken_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{").unwrap();
        assert!(matches!(PlannerConfig::read(&path), Err(ConfigError::Json(_))));
        assert_eq!(PlannerConfig::load(&path), PlannerConfig::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = PlannerConfig {
            debug_logging: true,
            data_directory: dir.path().to_path_buf(),
            ..PlannerConfig::default()
        };
        config.save(&path).unwrap();
        assert_eq!(PlannerConfig::load(&path), config);
        assert_eq!(config.store_path(), dir.path().join("store.json"));
    }
}

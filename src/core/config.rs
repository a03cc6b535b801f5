use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::alerts::suggestions::SuggestionTables;

fn default_check_interval() -> u64 {
    60
}

fn default_dedup_window() -> i64 {
    5
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

/// Engine settings. Everything the source hardcoded inconsistently lives
/// here instead: tick interval, dedup window, and the demo placeholder flag.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    /// Seconds between evaluation cycles while the scheduler runs.
    #[serde(default = "default_check_interval")]
    pub check_interval_secs: u64,
    /// Recency window within which a matching candidate is a repeat.
    #[serde(default = "default_dedup_window")]
    pub dedup_window_minutes: i64,
    /// Emit heuristic placeholder alerts when detection finds nothing.
    /// A demo convenience; off by default.
    #[serde(default)]
    pub synthetic_alerts: bool,
    /// Directory holding the persisted alert collection.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Remediation text tables, extensible by operators.
    #[serde(default)]
    pub suggestions: SuggestionTables,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            check_interval_secs: default_check_interval(),
            dedup_window_minutes: default_dedup_window(),
            synthetic_alerts: false,
            data_dir: default_data_dir(),
            suggestions: SuggestionTables::default(),
        }
    }
}

pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(config_dir: PathBuf) -> Self {
        Self {
            config_path: config_dir.join("settings.json"),
        }
    }

    pub fn load(&self) -> Settings {
        if self.config_path.exists() {
            if let Ok(content) = fs::read_to_string(&self.config_path) {
                if let Ok(settings) = serde_json::from_str(&content) {
                    return settings;
                }
            }
        }
        Settings::default()
    }

    pub fn save(&self, settings: &Settings) -> io::Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(settings)?;
        fs::write(&self.config_path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::new(dir.path().to_path_buf());

        let default = manager.load();
        assert_eq!(default.check_interval_secs, 60);
        assert_eq!(default.dedup_window_minutes, 5);
        assert!(!default.synthetic_alerts);

        let new_settings = Settings {
            check_interval_secs: 1,
            dedup_window_minutes: 10,
            synthetic_alerts: true,
            data_dir: PathBuf::from("/tmp/citywatch"),
            suggestions: SuggestionTables::default(),
        };

        manager.save(&new_settings).unwrap();
        let loaded = manager.load();

        assert_eq!(loaded.check_interval_secs, 1);
        assert_eq!(loaded.dedup_window_minutes, 10);
        assert!(loaded.synthetic_alerts);
        assert_eq!(loaded.data_dir, PathBuf::from("/tmp/citywatch"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("settings.json"),
            r#"{"check_interval_secs": 30}"#,
        )
        .unwrap();
        let manager = ConfigManager::new(dir.path().to_path_buf());
        let loaded = manager.load();
        assert_eq!(loaded.check_interval_secs, 30);
        assert_eq!(loaded.dedup_window_minutes, 5);
        assert!(loaded.suggestions.events.contains_key("flooding"));
    }
}

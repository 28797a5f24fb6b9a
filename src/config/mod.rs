//! JSON configuration: bootstrapped with defaults on first run, loaded from
//! the platform config directory afterwards.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use crate::runner::DEFAULT_TIMEOUT_SECS;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub default_language: String,
    pub auto_save_history: bool,
    pub max_output_lines: usize,
    /// Wall-clock budget in seconds for each spawned process.
    pub timeout: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_language: "python".to_string(),
            auto_save_history: true,
            max_output_lines: 50,
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load from the default config directory, writing a default config file
    /// on first run.
    pub fn load() -> Self {
        Self::load_from(&config_dir())
    }

    /// Load from `dir/config.json`. A missing file is created with defaults;
    /// an unreadable or malformed file falls back to defaults without
    /// touching it.
    pub fn load_from(dir: &Path) -> Self {
        let path = dir.join("config.json");
        if !path.exists() {
            let defaults = Self::default();
            if fs::create_dir_all(dir).is_ok() {
                if let Ok(text) = serde_json::to_string_pretty(&defaults) {
                    let _ = fs::write(&path, text);
                }
            }
            return defaults;
        }

        match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                eprintln!("warning: ignoring malformed {}: {}", path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

/// `<platform config dir>/devbot`, e.g. `~/.config/devbot` on Linux.
pub fn config_dir() -> PathBuf {
    let base = BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config"));
    base.join("devbot")
}

pub fn history_path() -> PathBuf {
    config_dir().join("history.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bootstrap_writes_defaults_once() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(dir.path());
        assert_eq!(cfg.default_language, "python");
        assert_eq!(cfg.timeout, 30);
        assert!(dir.path().join("config.json").exists());

        // Second load reads the file back rather than rewriting it.
        let reread = Config::load_from(dir.path());
        assert_eq!(reread.max_output_lines, 50);
        assert!(reread.auto_save_history);
    }

    #[test]
    fn existing_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("config.json"),
            r#"{ "default_language": "rust", "timeout": 5 }"#,
        )
        .unwrap();
        let cfg = Config::load_from(dir.path());
        assert_eq!(cfg.default_language, "rust");
        assert_eq!(cfg.timeout, 5);
        // Unspecified keys keep their defaults.
        assert_eq!(cfg.max_output_lines, 50);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.json"), "not json").unwrap();
        let cfg = Config::load_from(dir.path());
        assert_eq!(cfg.default_language, "python");
    }
}

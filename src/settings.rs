use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::aggregate::{AggregateOptions, DEFAULT_DENSITY_BINS, DEFAULT_HISTOGRAM_BINS};
use crate::error::{DashError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_data_path")]
    pub data_path: String,
    #[serde(default = "default_histogram_bins")]
    pub histogram_bins: usize,
    #[serde(default = "default_density_bins")]
    pub density_bins: usize,
}

fn default_data_path() -> String {
    "data.csv".to_string()
}

fn default_histogram_bins() -> usize {
    DEFAULT_HISTOGRAM_BINS
}

fn default_density_bins() -> usize {
    DEFAULT_DENSITY_BINS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            histogram_bins: default_histogram_bins(),
            density_bins: default_density_bins(),
        }
    }
}

impl Settings {
    pub fn aggregate_options(&self) -> AggregateOptions {
        AggregateOptions {
            histogram_bins: self.histogram_bins.max(1),
            density_bins: self.density_bins.max(1),
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("salesdash")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn load_settings() -> Settings {
    load_settings_from(&settings_path())
}

pub fn load_settings_from(path: &Path) -> Settings {
    if path.exists() {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_default()
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    save_settings_to(settings, &settings_path())
}

pub fn save_settings_to(settings: &Settings, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| DashError::Settings(e.to_string()))?;
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| PathBuf::from(path))
        .to_string_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            data_path: "/tmp/sales.csv".to_string(),
            histogram_bins: 10,
            density_bins: 15,
        };
        save_settings_to(&settings, &path).unwrap();
        assert_eq!(load_settings_from(&path), settings);
    }

    #[test]
    fn test_load_returns_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let s = load_settings_from(&dir.path().join("missing.json"));
        assert_eq!(s, Settings::default());
        assert_eq!(s.histogram_bins, 20);
        assert_eq!(s.density_bins, 30);
    }

    #[test]
    fn test_load_merges_with_defaults() {
        let json = r#"{"data_path": "/tmp/sales.csv"}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.data_path, "/tmp/sales.csv");
        assert_eq!(s.histogram_bins, 20);
    }

    #[test]
    fn test_save_creates_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep").join("nested").join("settings.json");
        save_settings_to(&Settings::default(), &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_zero_bins_clamped() {
        let s = Settings {
            histogram_bins: 0,
            density_bins: 0,
            ..Settings::default()
        };
        let o = s.aggregate_options();
        assert_eq!(o.histogram_bins, 1);
        assert_eq!(o.density_bins, 1);
    }

    #[test]
    fn test_shellexpand_home() {
        if let Some(home) = dirs::home_dir() {
            let expanded = shellexpand_path("~/sales.csv");
            assert!(expanded.starts_with(&*home.to_string_lossy()));
        }
    }
}

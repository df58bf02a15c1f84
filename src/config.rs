//! Application settings loaded from JSON.
//!
//! Looked up at `$MRR_CHART_CONFIG`, then `mrr_chart.json` in the working
//! directory. Missing files give the defaults; missing fields too.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub const CONFIG_ENV: &str = "MRR_CHART_CONFIG";
pub const CONFIG_FILE: &str = "mrr_chart.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Headless frame export settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Logical surface width.
    pub width: f64,
    /// Logical surface height.
    pub height: f64,
    pub pixel_ratio: f64,
    /// Folder the frames go to. The viewer creates it inside the location
    /// picked in its export dialog.
    pub output_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 300.0,
            pixel_ratio: 2.0,
            output_dir: PathBuf::from("mrr_frames"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window_size: [f32; 2],
    pub min_window_size: [f32; 2],
    /// Height of the chart's layout box in the viewer.
    pub chart_height: f32,
    pub export: ExportConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_size: [1200.0, 800.0],
            min_window_size: [720.0, 560.0],
            chart_height: 300.0,
            export: ExportConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve and load the config file, falling back to defaults when none
    /// exists. A file that exists but fails to parse is an error.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));

        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let config = Self::from_path(&path)?;
        info!(path = %path.display(), "Loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "chart_height": 360, "export": {{ "pixel_ratio": 1.0 }} }}"#).unwrap();

        let config = AppConfig::from_path(file.path()).unwrap();
        assert_eq!(config.chart_height, 360.0);
        assert_eq!(config.export.pixel_ratio, 1.0);
        assert_eq!(config.export.width, 600.0);
        assert_eq!(config.window_size, [1200.0, 800.0]);
    }

    #[test]
    fn test_bad_json_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(
            AppConfig::from_path(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            AppConfig::from_path(&dir.path().join("nope.json")),
            Err(ConfigError::Io { .. })
        ));
    }
}

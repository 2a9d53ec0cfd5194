use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV: &str = "DSP_TALLY_CONFIG";

/// Prefix rejected by the "DSP Initiated Work" filter unless overridden.
pub const DEFAULT_EXCLUDED_PREFIX: &str = "dsp initiated work";

// ---------------------------------------------------------------------------
// Sheet layout – fixed cell offsets of the schedule convention
// ---------------------------------------------------------------------------

/// Zero-based positions of metadata, header and data in the first sheet.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SheetLayout {
    pub metadata_row: usize,
    pub company_col: usize,
    pub station_col: usize,
    /// Row holding one date per column; data starts on the row below.
    pub header_row: usize,
    pub first_date_col: usize,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            metadata_row: 1,
            company_col: 1,
            station_col: 2,
            header_row: 3,
            first_date_col: 2,
        }
    }
}

impl SheetLayout {
    /// First row of the data region.
    pub fn first_data_row(&self) -> usize {
        self.header_row + 1
    }

    /// Grids shorter than this have no header row and yield no counts.
    pub fn min_rows(&self) -> usize {
        self.header_row + 1
    }
}

// ---------------------------------------------------------------------------
// Application config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub layout: SheetLayout,
    pub excluded_prefix: String,
    pub window: WindowConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            layout: SheetLayout::default(),
            excluded_prefix: DEFAULT_EXCLUDED_PREFIX.to_string(),
            window: WindowConfig::default(),
        }
    }
}

impl AppConfig {
    /// Parse a JSON config file; missing fields take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Load from `$DSP_TALLY_CONFIG` if set, falling back to defaults on any problem.
    pub fn load() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV) else {
            return Self::default();
        };
        match Self::from_file(Path::new(&path)) {
            Ok(config) => {
                log::info!("Loaded config from {}", Path::new(&path).display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring config: {e:#}");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_schedule_convention() {
        let layout = SheetLayout::default();
        assert_eq!(layout.first_data_row(), 4);
        assert_eq!(layout.min_rows(), 4);
        assert_eq!(AppConfig::default().excluded_prefix, "dsp initiated work");
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tally.json");
        std::fs::write(&path, r#"{ "layout": { "header_row": 5 }, "excluded_prefix": "rescue" }"#)
            .unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.layout.header_row, 5);
        assert_eq!(config.layout.first_date_col, 2);
        assert_eq!(config.excluded_prefix, "rescue");
        assert_eq!(config.window, WindowConfig::default());
    }

    #[test]
    fn malformed_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(AppConfig::from_file(&path).is_err());
    }
}

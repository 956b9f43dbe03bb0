use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};

pub const DEFAULT_FILE: &str = "email_status.csv";

/// Read-only user settings. Nothing in the app writes this file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_file")]
    pub default_file: String,
    #[serde(default)]
    pub show_line_chart: bool,
}

fn default_file() -> String {
    DEFAULT_FILE.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_file: default_file(),
            show_line_chart: false,
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("email-status")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn read_settings(path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| ReportError::Settings(format!("{}: {e}", path.display())))
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    if !path.exists() {
        return Settings::default();
    }
    match read_settings(&path) {
        Ok(s) => s,
        Err(e) => {
            log::warn!("ignoring settings file: {e}");
            Settings::default()
        }
    }
}

/// The data file to open when none is given on the command line.
pub fn default_data_file(settings: &Settings) -> PathBuf {
    shellexpand_path(&settings.default_file)
}

pub fn shellexpand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

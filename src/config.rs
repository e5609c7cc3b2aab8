use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const CONFIG_DIR_PREFIX: &str = "budget-sheets";

// Sheet every budget spreadsheet must contain.
const DEFAULT_REQUIRED_SHEET: &str = "Transactions";

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    pub google: GoogleConfig,
    #[serde(default)]
    pub spreadsheet: SpreadsheetConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SpreadsheetConfig {
    /// Spreadsheet used when none is given on the command line
    #[serde(default)]
    pub id: Option<String>,
    /// Sheet name checked when validating a spreadsheet
    #[serde(default = "default_required_sheet")]
    pub required_sheet: String,
}

impl Default for SpreadsheetConfig {
    fn default() -> Self {
        Self {
            id: None,
            required_sheet: default_required_sheet(),
        }
    }
}

fn default_required_sheet() -> String {
    DEFAULT_REQUIRED_SHEET.to_string()
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file()?;

        if !config_path.exists() {
            return Err(AppError::Config(format!(
                "Config file not found at {:?}. Please create one.",
                config_path
            )));
        }

        let contents = fs::read_to_string(&config_path)?;
        Self::parse(&contents)
    }

    fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {}", e)))?;

        if config.google.client_id.is_empty() || config.google.client_secret.is_empty() {
            return Err(AppError::Config(
                "Google client_id and client_secret must be set in config file".to_string(),
            ));
        }

        Ok(config)
    }

    /// Pick the spreadsheet to operate on, preferring an explicit id over the configured one
    pub fn spreadsheet_id(&self, explicit: Option<&str>) -> Result<String> {
        explicit
            .map(str::to_string)
            .or_else(|| self.spreadsheet.id.clone())
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| {
                AppError::Config(
                    "No spreadsheet id given. Pass --spreadsheet-id or set spreadsheet.id in config file"
                        .to_string(),
                )
            })
    }

    fn xdg_dirs() -> xdg::BaseDirectories {
        xdg::BaseDirectories::with_prefix(CONFIG_DIR_PREFIX)
    }

    /// Get the config file path
    pub fn config_file() -> Result<PathBuf> {
        let xdg_dirs = Self::xdg_dirs();
        xdg_dirs
            .place_config_file("config.toml")
            .map_err(|e| AppError::Config(format!("Failed to create config directory: {}", e)))
    }

    /// Get the cache directory path
    pub fn cache_dir() -> Result<PathBuf> {
        let xdg = Self::xdg_dirs();
        xdg.get_cache_home()
            .ok_or_else(|| AppError::Config("Failed to determine cache directory".to_string()))
    }

    /// Get a cache file path
    pub fn cache_file(filename: &str) -> Result<PathBuf> {
        let xdg = Self::xdg_dirs();
        xdg.place_cache_file(filename)
            .map_err(|e| AppError::Config(format!("Failed to create cache file path: {}", e)))
    }
}

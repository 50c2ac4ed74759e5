use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::swipe::SWIPE_THRESHOLD_PX;
use crate::vocabulary::INTERACTION_FEE_CENTS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Fee charged per unlocked listing, in cents.
    pub interaction_fee_cents: u32,
    /// Drag distance before a mouse swipe commits.
    pub swipe_threshold_px: f32,
    /// Terminal cell width used to turn mouse columns into pixels.
    pub cell_width_px: f32,
    /// `tracing` filter directive used when RUST_LOG is unset.
    pub log_filter: String,
    /// Overrides the default database location.
    pub database: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interaction_fee_cents: INTERACTION_FEE_CENTS,
            swipe_threshold_px: SWIPE_THRESHOLD_PX,
            cell_width_px: 8.0,
            log_filter: "warn".to_string(),
            database: None,
        }
    }
}

impl Config {
    /// Loads `path` if given, else `config.json` in the platform config dir when it exists,
    /// else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "deck")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }
}

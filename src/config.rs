//! Board configuration, persisted as JSON in the OS config directory.

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{BoardError, Result};
use crate::timeline::{BoardZone, DEFAULT_MONTH_WIDTH};
use crate::timeline::position::DEFAULT_MIN_BAR_WIDTH;

const CONFIG_FILE: &str = "config.json";

/// User settings for the board view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Pixels per month column.
    pub month_width: f32,
    /// Cards never render narrower than this.
    pub min_bar_width: f32,
    /// Months of slack on either side of the planned range.
    pub padding_months: u32,
    /// IANA zone for the month grid; the host's local zone when unset.
    pub time_zone: Option<String>,
    /// Where unplanned items are drawn and anchored; today when unset.
    pub unplanned_anchor: Option<NaiveDate>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            month_width: DEFAULT_MONTH_WIDTH,
            min_bar_width: DEFAULT_MIN_BAR_WIDTH,
            padding_months: 1,
            time_zone: None,
            unplanned_anchor: None,
        }
    }
}

impl BoardConfig {
    /// Load from the config directory, falling back to defaults when the
    /// file is missing or unreadable.
    pub fn load() -> Self {
        match Self::config_path().and_then(|path| Self::load_from(&path)) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config, using defaults: {}", e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &PathBuf) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// The time zone the month grid is laid out in.
    pub fn zone(&self) -> Result<BoardZone> {
        match self.time_zone.as_deref().map(str::trim) {
            None | Some("") => Ok(BoardZone::Local),
            Some(name) => BoardZone::named(name).ok_or_else(|| BoardError::UnknownTimeZone(name.to_string())),
        }
    }

    /// Anchor date for unplanned items.
    pub fn unplanned_anchor_or(&self, today: NaiveDate) -> NaiveDate {
        self.unplanned_anchor.unwrap_or(today)
    }

    pub fn config_dir() -> Result<PathBuf> {
        directories::ProjectDirs::from("", "", "PlanningBoard")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or(BoardError::ConfigDir)
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }
}

//! Desk configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use tabdock_tabs::{Size, TabbableOptions, MAX_LIST_PANE_FRACTION};

use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the database file
    pub database_path: PathBuf,
    /// Dock new Tabbables unless their saved state says otherwise
    pub tabbed_by_default: bool,
    /// Size of a newly created window when no allocation is known
    pub default_window_size: Size,
    /// Upper bound for a restored list-pane divider
    pub max_list_pane_fraction: f32,
    pub list_pane_min_size: u32,
    pub ui_scale: f32,
    /// Save a Tabbable's state whenever it changes
    pub autosave: bool,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            database_path: data_dir.join("tabdock.db"),
            tabbed_by_default: true,
            default_window_size: Size::new(800, 600),
            max_list_pane_fraction: MAX_LIST_PANE_FRACTION,
            list_pane_min_size: 160,
            ui_scale: 1.0,
            autosave: true,
        }
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("tabdock"))
            .unwrap_or_else(|| PathBuf::from(".tabdock"))
    }

    /// Read a JSON config file. A missing file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let json = std::fs::read_to_string(path)?;
        let mut config: Config = serde_json::from_str(&json)?;
        config.validate()?;

        tracing::info!(path = %path.display(), "Loaded config");

        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Clamp out-of-range values. Only an unusable database path is an error.
    pub fn validate(&mut self) -> Result<()> {
        if self.database_path.as_os_str().is_empty() {
            return Err(CoreError::Config("database_path is empty".to_string()));
        }

        if !(0.0..=MAX_LIST_PANE_FRACTION).contains(&self.max_list_pane_fraction) {
            let clamped = if self.max_list_pane_fraction.is_nan() {
                MAX_LIST_PANE_FRACTION
            } else {
                self.max_list_pane_fraction.clamp(0.0, MAX_LIST_PANE_FRACTION)
            };
            tracing::warn!(
                value = self.max_list_pane_fraction,
                clamped,
                "max_list_pane_fraction out of range"
            );
            self.max_list_pane_fraction = clamped;
        }

        if !(self.ui_scale.is_finite() && self.ui_scale > 0.0) {
            tracing::warn!(value = self.ui_scale, "ui_scale must be positive, using 1.0");
            self.ui_scale = 1.0;
        }

        if self.default_window_size.width <= 0 || self.default_window_size.height <= 0 {
            tracing::warn!(
                width = self.default_window_size.width,
                height = self.default_window_size.height,
                "default_window_size must be positive, using 800x600"
            );
            self.default_window_size = Size::new(800, 600);
        }

        Ok(())
    }

    /// Construction settings for a Tabbable living on this desk.
    pub fn tabbable_options(&self) -> TabbableOptions {
        TabbableOptions {
            tabbed_by_default: self.tabbed_by_default,
            default_window_size: self.default_window_size,
            ui_scale: self.ui_scale,
            list_pane_min_size: self.list_pane_min_size,
            max_list_pane_fraction: self.max_list_pane_fraction,
            ..TabbableOptions::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

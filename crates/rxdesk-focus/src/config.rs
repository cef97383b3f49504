//! Focus configuration
//!
//! Loaded from `focus.toml` in the user config directory
//! (`~/.config/rxdesk/focus.toml` on Linux). Every field is optional:
//!
//! ```toml
//! reset_focus_delay_ms = 500
//! escape_ends_keyboard_navigation = true
//!
//! [tab_stop_revert]
//! enabled = true
//! delay_ms = 100
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Settings for the focus core
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusConfig {
    /// Debounce before a focus reset moves focus to the first element
    pub reset_focus_delay_ms: u64,
    /// Esc switches keyboard navigation mode off
    pub escape_ends_keyboard_navigation: bool,
    pub tab_stop_revert: TabStopRevertPolicy,
}

/// Policy for hosts that refuse to focus an element which is not a tab stop.
///
/// When enabled, focusing such an element turns it into a tab stop for
/// `delay_ms` and then reverts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabStopRevertPolicy {
    pub enabled: bool,
    pub delay_ms: u64,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            reset_focus_delay_ms: 500,
            escape_ends_keyboard_navigation: true,
            tab_stop_revert: TabStopRevertPolicy::default(),
        }
    }
}

impl Default for TabStopRevertPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            delay_ms: 100,
        }
    }
}

impl TabStopRevertPolicy {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl FocusConfig {
    pub fn reset_focus_delay(&self) -> Duration {
        Duration::from_millis(self.reset_focus_delay_ms)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Save configuration as TOML, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("rxdesk").join("focus.toml"))
    }

    /// Load from the user config path, falling back to defaults
    pub fn load_or_default() -> Self {
        let path = match Self::config_path() {
            Ok(path) => path,
            Err(e) => {
                tracing::debug!(error = %e, "Using default focus configuration");
                return Self::default();
            }
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Invalid focus configuration, using defaults");
                Self::default()
            }
        }
    }
}

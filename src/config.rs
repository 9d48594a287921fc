use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::engine::mode::PracticeMode;

pub const MIN_DEBOUNCE_MS: u64 = 100;
pub const MAX_DEBOUNCE_MS: u64 = 5000;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_mode")]
    pub default_mode: String,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_bank")]
    pub bank: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_mode() -> String {
    PracticeMode::Random.as_str().to_string()
}
fn default_debounce_ms() -> u64 {
    600
}
fn default_bank() -> String {
    "default".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_mode: default_mode(),
            debounce_ms: default_debounce_ms(),
            bank: default_bank(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content =
                fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?
        } else {
            Config::default()
        };
        config.validate();
        Ok(config)
    }

    /// Load `path`, falling back to defaults when it cannot be read or
    /// parsed. The error is handed back so it can be logged once logging is up.
    pub fn load_or_default(path: &Path) -> (Self, Option<anyhow::Error>) {
        match Self::load_from(path) {
            Ok(config) => (config, None),
            Err(e) => (Config::default(), Some(e)),
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("recitalist")
            .join("config.toml")
    }

    pub fn mode(&self) -> PracticeMode {
        self.default_mode.parse().unwrap_or_default()
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Clamp out-of-range values and reset unknown names to their defaults.
    /// Call after deserialization to handle hand-edited configs.
    pub fn validate(&mut self) {
        let clamped = self.debounce_ms.clamp(MIN_DEBOUNCE_MS, MAX_DEBOUNCE_MS);
        if clamped != self.debounce_ms {
            warn!(debounce_ms = self.debounce_ms, clamped, "debounce out of range");
            self.debounce_ms = clamped;
        }
        if let Err(e) = self.default_mode.parse::<PracticeMode>() {
            warn!(error = %e, "resetting default mode");
            self.default_mode = default_mode();
        }
        if self.bank.trim().is_empty() {
            self.bank = default_bank();
        }
        if self.log_level.trim().is_empty() {
            self.log_level = default_log_level();
        }
    }
}

//! Configuration loaded from `~/.config/gemdash/config.toml`.
//!
//! Precedence, lowest first: built-in defaults, the TOML file, environment
//! (`GEMDASH_URL`, `GEMDASH_DATA_DIR`), command-line flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::extract::ExtractOptions;

/// The archived Voorjaarsnota 2024 progress page.
pub const DEFAULT_SOURCE_URL: &str = "https://abx10.archiefweb.eu:8443/watdoetdegemeentevoorjaarsnota2024/20241114091054mp_/https://archieven.watdoetdegemeente.rotterdam.nl/voorjaarsnota2024/hoofdlijnen/01-voortgang/";

pub const ENV_URL: &str = "GEMDASH_URL";
pub const ENV_DATA_DIR: &str = "GEMDASH_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source_url: String,
    pub data_dir: PathBuf,
    pub images_dir: PathBuf,
    pub navigation_timeout_secs: u64,
    pub selector_timeout_secs: u64,
    /// Age after which the dashboard re-extracts before rendering. Must not be
    /// negative; values beyond what a duration can hold mean "never stale".
    pub stale_after_hours: i64,
    /// Replaces the generated browser User-Agent.
    pub user_agent: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            data_dir: PathBuf::from("data"),
            images_dir: PathBuf::from("public/images"),
            navigation_timeout_secs: 60,
            selector_timeout_secs: 60,
            stale_after_hours: 24,
            user_agent: None,
        }
    }
}

impl Config {
    /// Load from `path`, or from the default location when `None`.
    ///
    /// A missing default file yields the defaults; a missing explicit file is
    /// an error. Environment overrides are applied afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if
    /// `stale_after_hours` is negative.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let path = config_path();
                if path.exists() {
                    Self::from_file(&path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.stale_after_hours < 0 {
            bail!(
                "stale_after_hours must not be negative (got {})",
                self.stale_after_hours
            );
        }
        Ok(())
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("invalid TOML in {}", path.display()))
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var(ENV_URL).filter(|v| !v.is_empty()) {
            self.source_url = url;
        }
        if let Some(dir) = var(ENV_DATA_DIR).filter(|v| !v.is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }
    }

    /// Freshness threshold. Clamped to zero below and to the largest
    /// representable duration above.
    pub fn stale_after(&self) -> chrono::Duration {
        chrono::Duration::try_hours(self.stale_after_hours.max(0))
            .unwrap_or(chrono::Duration::MAX)
    }

    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            url: self.source_url.clone(),
            navigation_timeout: Duration::from_secs(self.navigation_timeout_secs),
            selector_timeout: Duration::from_secs(self.selector_timeout_secs),
            images_dir: self.images_dir.clone(),
        }
    }
}

/// Return the path to the default config file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("gemdash")
        .join("config.toml")
}

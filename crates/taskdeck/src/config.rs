//! Application configuration loaded from `config.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use taskdeck_app::{FileSeedSource, HttpSeedSource, SeedSource};

const CONFIG_DIR: &str = "taskdeck";
const CONFIG_FILE: &str = "config.toml";
const SEED_FILE: &str = "data.json";

/// Top-level configuration loaded from the platform config directory.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// Directory holding the task store; platform data dir when unset.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Where first-run sample tasks come from.
    #[serde(default)]
    pub seed: SeedConfig,
}

/// Seed document location: a URL wins over a path, the bundled default
/// (`data.json` in the data directory) applies when both are unset.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SeedConfig {
    /// Path to a seed document on disk.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// URL of a seed document to fetch once.
    #[serde(default)]
    pub url: Option<String>,
}

impl AppConfig {
    /// Load configuration from `<config dir>/taskdeck/config.toml`.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    /// Returns an error when the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let Some(config_dir) = dirs::config_dir() else {
            return Ok(Self::default());
        };
        Self::from_path(config_dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load configuration from an explicit path.
    ///
    /// # Errors
    /// Returns an error when the file exists but cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Resolve the directory holding the task store.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(CONFIG_DIR)
        })
    }

    /// Build the seed source the bootstrap should use.
    #[must_use]
    pub fn seed_source(&self) -> Box<dyn SeedSource> {
        if let Some(url) = &self.seed.url {
            return Box::new(HttpSeedSource::new(url.clone()));
        }
        let path = self
            .seed
            .path
            .clone()
            .unwrap_or_else(|| self.data_dir().join(SEED_FILE));
        Box::new(FileSeedSource::new(path))
    }
}

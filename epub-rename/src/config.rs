//! epub-rename configuration management.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::metadata::ExtractorKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Remove stop words from titles before building the filename
    #[serde(default)]
    pub strip_stopwords: bool,

    /// Words removed when `strip_stopwords` is on
    #[serde(default = "default_stopwords")]
    pub stopwords: Vec<String>,

    /// Which metadata extractor to use
    #[serde(default)]
    pub extractor: ExtractorKind,

    /// Extension of candidate files, matched case-insensitively
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_stopwords() -> Vec<String> {
    vec!["the".to_string(), "a".to_string(), "at".to_string()]
}

fn default_extension() -> String {
    "epub".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strip_stopwords: false,
            stopwords: default_stopwords(),
            extractor: ExtractorKind::default(),
            extension: default_extension(),
        }
    }
}

impl Config {
    /// Get the config file path: ~/.config/cli-programs/epub-rename.toml
    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("cli-programs")
            .join("epub-rename.toml"))
    }

    /// Load config from file, returning default if file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }
}

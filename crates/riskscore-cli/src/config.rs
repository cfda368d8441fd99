//! CLI configuration.
//!
//! The engine takes no configuration of its own; these settings only decide
//! where the CLI keeps its cache and how it prints results.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level riskscore configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskscoreConfig {
    /// Directory holding one cached analysis per attempt.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
    /// Output format when `--format` is not given: text, json or markdown.
    #[serde(default = "default_format")]
    pub default_format: String,
    /// Attach the built-in narrative writer to fresh analyses.
    #[serde(default)]
    pub narrative: bool,
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("./riskscore-cache")
}

fn default_format() -> String {
    "text".to_string()
}

impl Default for RiskscoreConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            default_format: default_format(),
            narrative: false,
        }
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `riskscore.toml` in the current directory
/// 2. `~/.config/riskscore/config.toml`
///
/// `RISKSCORE_CACHE_DIR` overrides the cache directory.
pub fn load_config_from(path: Option<&Path>) -> Result<RiskscoreConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("riskscore.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => RiskscoreConfig::default(),
    };

    if let Ok(dir) = std::env::var("RISKSCORE_CACHE_DIR") {
        if !dir.trim().is_empty() {
            config.cache_dir = PathBuf::from(dir);
        }
    }

    Ok(config)
}

fn parse_config(content: &str) -> Result<RiskscoreConfig> {
    let config: RiskscoreConfig = toml::from_str(content)?;
    anyhow::ensure!(
        matches!(config.default_format.as_str(), "text" | "json" | "markdown" | "md"),
        "unknown default_format '{}'",
        config.default_format
    );
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("riskscore"))
}

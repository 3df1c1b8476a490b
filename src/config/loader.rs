// Configuration loader
// Reads ~/.plume/config.toml, with PLUME_API_KEY as an env fallback

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::settings::Config;

/// Load configuration from the given path, or from ~/.plume/config.toml.
/// A missing file is not an error — defaults apply and the API key may still
/// come from the environment.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config_path = match path {
        Some(p) => p.to_path_buf(),
        None => config_dir()?.join("config.toml"),
    };

    let mut config = if config_path.exists() {
        let contents = fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read config file {}", config_path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file {}", config_path.display()))?
    } else {
        Config::default()
    };

    if config.api_key.is_empty() {
        if let Ok(key) = std::env::var("PLUME_API_KEY") {
            config.api_key = key;
        }
    }

    Ok(config)
}

/// The configuration directory, ~/.plume.
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("could not determine home directory")?;
    Ok(home.join(".plume"))
}

/// Directory holding user prompt templates, ~/.plume/prompts.
pub fn prompts_dir() -> Result<PathBuf> {
    Ok(config_dir()?.join("prompts"))
}

/// REPL history file path, if the config dir can be resolved.
pub fn history_path() -> Option<PathBuf> {
    config_dir().ok().map(|dir| dir.join("history"))
}

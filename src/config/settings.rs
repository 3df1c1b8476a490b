// Configuration structs

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::models::ModelEntry;

/// Desired output length tier for generated completions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl OutputLength {
    pub const ALL: [OutputLength; 3] = [OutputLength::Short, OutputLength::Medium, OutputLength::Long];

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputLength::Short => "short",
            OutputLength::Medium => "medium",
            OutputLength::Long => "long",
        }
    }
}

impl fmt::Display for OutputLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputLength {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "short" => Ok(OutputLength::Short),
            "medium" => Ok(OutputLength::Medium),
            "long" => Ok(OutputLength::Long),
            other => anyhow::bail!("invalid output length: {other} (must be short, medium, or long)"),
        }
    }
}

/// Application configuration, loaded once at startup and threaded explicitly
/// through constructors — there is no process-wide config singleton.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// OpenRouter API key; falls back to the PLUME_API_KEY env var when empty.
    pub api_key: String,

    /// Model alias used when no --model flag is given.
    pub default_model: String,

    /// Output length used when no --length flag is given.
    pub default_length: OutputLength,

    /// Disable the automatic clipboard copy after each generation.
    pub disable_copy: bool,

    /// Sampling temperature forwarded to the API.
    pub temperature: f64,

    /// User-defined model aliases, merged over the built-in registry.
    pub models: HashMap<String, ModelEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            default_model: super::models::DEFAULT_MODEL.to_string(),
            default_length: OutputLength::Medium,
            disable_copy: false,
            temperature: 0.7,
            models: HashMap::new(),
        }
    }
}

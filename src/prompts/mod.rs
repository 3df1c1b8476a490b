// Prompt template store
//
// Prompts come from two places: compiled-in defaults, and user YAML files in
// the prompts directory. User prompts can shadow builtins by name. Templates
// use `{length_directive}` and `{context}` placeholders.

mod defaults;

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::length_params;
use crate::config::OutputLength;

pub use defaults::{BULLETLIST_NAME, METAPROMPT_NAME};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prompt {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub system: String,
    /// Per-tier output length directives keyed by "short"/"medium"/"long".
    /// A directive consisting only of digits is a max_tokens override and is
    /// not injected into the rendered template.
    #[serde(default)]
    pub length_directives: HashMap<String, String>,
}

pub struct PromptStore {
    prompts: HashMap<String, Prompt>,
}

impl PromptStore {
    /// Load builtin prompts plus any user prompts found in `user_dir`.
    /// Malformed user files are skipped with a warning rather than failing
    /// the whole store.
    pub fn load(user_dir: &Path) -> Self {
        let mut store = Self {
            prompts: HashMap::new(),
        };
        store.insert_builtins();

        if let Err(e) = store.load_user_prompts(user_dir) {
            tracing::warn!(dir = %user_dir.display(), error = %e, "failed to load user prompts");
        }

        store
    }

    /// Builtins only, no filesystem access. Used by tests and as a fallback.
    pub fn builtin() -> Self {
        let mut store = Self {
            prompts: HashMap::new(),
        };
        store.insert_builtins();
        store
    }

    fn insert_builtins(&mut self) {
        let all_tiers = |tiers: &[OutputLength]| -> HashMap<String, String> {
            tiers
                .iter()
                .map(|&t| (t.as_str().to_string(), length_params(t).directive.to_string()))
                .collect()
        };

        self.insert(Prompt {
            name: defaults::METAPROMPT_NAME.to_string(),
            description: defaults::METAPROMPT_DESCRIPTION.to_string(),
            system: defaults::METAPROMPT_TEMPLATE.to_string(),
            length_directives: all_tiers(&[
                OutputLength::Short,
                OutputLength::Medium,
                OutputLength::Long,
            ]),
        });

        // bulletlist intentionally has no long tier.
        self.insert(Prompt {
            name: defaults::BULLETLIST_NAME.to_string(),
            description: defaults::BULLETLIST_DESCRIPTION.to_string(),
            system: defaults::BULLETLIST_TEMPLATE.to_string(),
            length_directives: all_tiers(&[OutputLength::Short, OutputLength::Medium]),
        });
    }

    fn load_user_prompts(&mut self, dir: &Path) -> Result<()> {
        if !dir.is_dir() {
            return Ok(());
        }

        let entries = fs::read_dir(dir)
            .with_context(|| format!("failed to list prompt files in {}", dir.display()))?;

        for entry in entries.flatten() {
            let path = entry.path();
            let is_yaml = matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("yaml") | Some("yml")
            );
            if !is_yaml {
                continue;
            }
            if let Err(e) = self.load_prompt_file(&path) {
                tracing::warn!(file = %path.display(), error = %e, "skipping prompt file");
            }
        }

        Ok(())
    }

    fn load_prompt_file(&mut self, path: &Path) -> Result<()> {
        let data = fs::read_to_string(path).context("failed to read file")?;
        let prompt: Prompt = serde_yaml::from_str(&data).context("failed to parse YAML")?;
        if prompt.name.is_empty() {
            bail!("prompt name is required");
        }
        self.insert(prompt);
        Ok(())
    }

    fn insert(&mut self, prompt: Prompt) {
        self.prompts.insert(prompt.name.clone(), prompt);
    }

    pub fn get(&self, name: &str) -> Result<&Prompt> {
        self.prompts
            .get(name)
            .with_context(|| format!("prompt not found: {name}"))
    }

    /// All prompt names, sorted for stable display.
    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.prompts.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Custom max_tokens for this prompt and length, if the matching directive
    /// is a pure integer. Returns None when no override applies.
    pub fn max_tokens_override(&self, name: &str, length: OutputLength) -> Option<u32> {
        let prompt = self.prompts.get(name)?;
        let directive = prompt.length_directives.get(length.as_str())?;
        parse_numeric_directive(directive)
    }

    /// Render a prompt's system template for the given length and project
    /// context. Prompts with explicit directives reject unsupported lengths;
    /// prompts without any directives fall back to the tier default.
    pub fn render(&self, name: &str, length: OutputLength, context: &str) -> Result<String> {
        let prompt = self.get(name)?;

        let directive = match prompt.length_directives.get(length.as_str()) {
            Some(d) => d.clone(),
            None if prompt.length_directives.is_empty() => {
                length_params(length).directive.to_string()
            }
            None => bail!("prompt '{name}' does not support output length '{length}'"),
        };

        // Numeric directives are token budget overrides, not prompt text.
        let directive = if parse_numeric_directive(&directive).is_some() {
            String::new()
        } else {
            directive
        };

        Ok(prompt
            .system
            .replace("{length_directive}", &directive)
            .replace("{context}", context))
    }
}

fn parse_numeric_directive(s: &str) -> Option<u32> {
    if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    s.parse::<u32>().ok().filter(|&n| n > 0)
}

// Built-in model registry and alias resolution

use std::collections::HashMap;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Alias used when neither the config file nor the --model flag names one.
pub const DEFAULT_MODEL: &str = "cerebras-gpt-oss-120b";

/// A model registry entry mapping a short alias to an upstream model ID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelEntry {
    pub id: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub tier: String,
}

impl ModelEntry {
    fn new(id: &str, provider: &str, tier: &str) -> Self {
        Self {
            id: id.to_string(),
            provider: provider.to_string(),
            tier: tier.to_string(),
        }
    }
}

/// The built-in alias registry.
pub fn default_models() -> HashMap<String, ModelEntry> {
    HashMap::from([
        (
            "cerebras-llama-8b".to_string(),
            ModelEntry::new("meta-llama/llama-3.1-8b-instruct", "cerebras", "fast"),
        ),
        (
            "cerebras-gpt-oss-120b".to_string(),
            ModelEntry::new("openai/gpt-oss-120b", "cerebras", "balanced"),
        ),
        (
            "openai-gpt5-nano".to_string(),
            ModelEntry::new("openai/gpt-5-nano", "openai", "fast"),
        ),
    ])
}

/// Resolve an alias to a registry entry. Custom models shadow built-ins;
/// an alias found in neither is treated as a direct upstream model ID.
pub fn resolve_model(alias: &str, custom_models: &HashMap<String, ModelEntry>) -> ModelEntry {
    if let Some(model) = custom_models.get(alias) {
        return model.clone();
    }
    if let Some(model) = default_models().get(alias) {
        return model.clone();
    }
    ModelEntry::new(alias, "unknown", "unknown")
}

/// The upstream model ID for an alias.
pub fn model_id(alias: &str, custom_models: &HashMap<String, ModelEntry>) -> Result<String> {
    let model = resolve_model(alias, custom_models);
    if model.id.is_empty() {
        bail!("model {alias} has no ID");
    }
    Ok(model.id)
}

/// All known aliases, custom models first, without duplicates.
pub fn list_models(custom_models: &HashMap<String, ModelEntry>) -> Vec<String> {
    let mut aliases: Vec<String> = custom_models.keys().cloned().collect();
    for alias in default_models().keys() {
        if !custom_models.contains_key(alias) {
            aliases.push(alias.clone());
        }
    }
    aliases
}

#[cfg(test)]
mod tests {
    use super::*;

    fn custom() -> HashMap<String, ModelEntry> {
        HashMap::from([(
            "my-model".to_string(),
            ModelEntry::new("vendor/custom", "vendor", "fast"),
        )])
    }

    #[test]
    fn resolves_builtin_alias() {
        let model = resolve_model("cerebras-llama-8b", &HashMap::new());
        assert_eq!(model.id, "meta-llama/llama-3.1-8b-instruct");
        assert_eq!(model.provider, "cerebras");
    }

    #[test]
    fn custom_models_shadow_builtins() {
        let mut models = custom();
        models.insert(
            "cerebras-llama-8b".to_string(),
            ModelEntry::new("vendor/override", "vendor", "fast"),
        );
        assert_eq!(resolve_model("cerebras-llama-8b", &models).id, "vendor/override");
    }

    #[test]
    fn unknown_alias_is_a_literal_model_id() {
        let model = resolve_model("openai/gpt-4o", &HashMap::new());
        assert_eq!(model.id, "openai/gpt-4o");
        assert_eq!(model.provider, "unknown");
    }

    #[test]
    fn model_id_rejects_empty_id() {
        let models = HashMap::from([(
            "broken".to_string(),
            ModelEntry::new("", "vendor", "fast"),
        )]);
        assert!(model_id("broken", &models).is_err());
    }

    #[test]
    fn list_models_merges_without_duplicates() {
        let mut models = custom();
        models.insert(
            "openai-gpt5-nano".to_string(),
            ModelEntry::new("vendor/override", "vendor", "fast"),
        );

        let aliases = list_models(&models);
        assert_eq!(aliases.len(), 4); // 2 custom + 2 remaining builtins
        assert_eq!(
            aliases.iter().filter(|a| a.as_str() == "openai-gpt5-nano").count(),
            1
        );
        assert!(aliases.contains(&"my-model".to_string()));
        assert!(aliases.contains(&"cerebras-gpt-oss-120b".to_string()));
    }
}

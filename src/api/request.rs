// Completion request building and output-length parameters

use std::collections::HashMap;

use anyhow::Result;

use crate::config::{model_id, ModelEntry, OutputLength};

use super::types::{CompletionRequest, Message};

pub struct LengthParams {
    pub max_tokens: u32,
    pub directive: &'static str,
}

/// Token budget and prompt directive for each output length tier.
pub fn length_params(length: OutputLength) -> LengthParams {
    match length {
        OutputLength::Short => LengthParams {
            max_tokens: 550,
            directive: "Keep the generated prompt concise — under 150 words. \
                        Focus on the core instruction only.",
        },
        OutputLength::Medium => LengthParams {
            max_tokens: 850,
            directive: "Generate a moderately detailed prompt (~200-350 words) with \
                        context, constraints, and desired output format.",
        },
        OutputLength::Long => LengthParams {
            max_tokens: 1600,
            directive: "Generate a comprehensive prompt (400-600+ words) including \
                        examples, edge cases, tone guidance, and detailed formatting \
                        instructions.",
        },
    }
}

/// Build a completion request for the given model alias and prompts.
pub fn build_request(
    model_alias: &str,
    system_prompt: &str,
    user_prompt: &str,
    length: OutputLength,
    temperature: f64,
    stream: bool,
    custom_models: &HashMap<String, ModelEntry>,
) -> Result<CompletionRequest> {
    let model = model_id(model_alias, custom_models)?;
    let params = length_params(length);

    let mut req = CompletionRequest {
        model: model.clone(),
        messages: vec![Message::system(system_prompt), Message::user(user_prompt)],
        max_tokens: Some(params.max_tokens),
        max_completion_tokens: None,
        reasoning_effort: None,
        temperature: Some(temperature),
        stream,
    };

    // GPT-5 models account for reasoning tokens inside completion tokens.
    // Using max_completion_tokens and lower reasoning effort avoids empty
    // visible outputs caused by reasoning consuming the full budget.
    if is_gpt5_model(&model) {
        req.max_tokens = None;
        req.max_completion_tokens = Some(params.max_tokens);
        req.reasoning_effort = Some("minimal".to_string());
    }

    Ok(req)
}

/// Replace the request's token budget, respecting the GPT-5 field split.
pub fn apply_max_tokens_override(req: &mut CompletionRequest, limit: u32) {
    if req.max_completion_tokens.is_some() {
        req.max_completion_tokens = Some(limit);
    } else {
        req.max_tokens = Some(limit);
    }
}

fn is_gpt5_model(model_id: &str) -> bool {
    let id = model_id.to_lowercase();
    id.starts_with("openai/gpt-5") || id.starts_with("gpt-5")
}

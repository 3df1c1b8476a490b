// One-shot generation: render, complete, print, copy

use std::collections::HashMap;
use std::io::IsTerminal;
use std::time::Instant;

use anyhow::{Context, Result};

use crate::api::{apply_max_tokens_override, build_request, ApiClient};
use crate::clipboard;
use crate::config::{ModelEntry, OutputLength};
use crate::context::ProjectContext;
use crate::output;
use crate::prompts::PromptStore;

pub struct OneShotRequest<'a> {
    pub input: &'a str,
    pub model: &'a str,
    pub length: OutputLength,
    pub prompt_name: &'a str,
    pub temperature: f64,
    pub auto_copy: bool,
    pub models: &'a HashMap<String, ModelEntry>,
}

/// Generate a single completion and print it. Ctrl+C aborts with an error
/// rather than leaving a half-finished request running.
pub async fn run(
    client: &ApiClient,
    store: &PromptStore,
    project_context: &ProjectContext,
    req: OneShotRequest<'_>,
) -> Result<()> {
    let system_prompt = store
        .render(req.prompt_name, req.length, &project_context.content)
        .context("failed to render prompt")?;

    let mut completion = build_request(
        req.model,
        &system_prompt,
        req.input,
        req.length,
        req.temperature,
        false,
        req.models,
    )?;
    if let Some(limit) = store.max_tokens_override(req.prompt_name, req.length) {
        apply_max_tokens_override(&mut completion, limit);
    }

    eprintln!(
        "{}",
        output::generating_message(req.model, req.length.as_str(), &project_context.filename)
    );
    eprintln!();

    let start = Instant::now();
    let (result, usage) = tokio::select! {
        result = client.complete(completion) => result.context("generation failed")?,
        _ = tokio::signal::ctrl_c() => anyhow::bail!("generation interrupted"),
    };
    let duration_ms = start.elapsed().as_millis();

    let colorize = std::io::stdout().is_terminal();
    println!("{}", output::colorize_markdown(&result, colorize));

    if req.auto_copy {
        match clipboard::copy_with_warning(&result) {
            Some(warning) => eprintln!("{warning}"),
            None => {
                eprintln!();
                eprintln!("{}", output::copied_message());
            }
        }
    }

    eprintln!("{}", output::token_usage_message(&usage, duration_ms));

    Ok(())
}

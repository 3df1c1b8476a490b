// Terminal output: markdown colorization and status messages

mod colorizer;

pub use colorizer::{classify_line, colorize_markdown, is_markdown, LineKind, StreamingColorizer};

use crossterm::style::Stylize;

use crate::api::TokenUsage;

/// Status line shown on stderr before streaming starts. The context filename
/// is appended only when project context was found.
pub fn generating_message(model: &str, length: &str, context_file: &str) -> String {
    let mut msg = format!("Generating with {model}... | output length: {length}");
    if !context_file.is_empty() {
        msg.push_str(" | with project context from ");
        msg.push_str(context_file);
    }
    msg.cyan().to_string()
}

pub fn copied_message() -> String {
    "✓ Copied to clipboard".green().to_string()
}

/// Token usage and elapsed time summary, shown dimmed on stderr after a
/// completed generation.
pub fn token_usage_message(usage: &TokenUsage, duration_ms: u128) -> String {
    format!(
        "Tokens: {} prompt + {} completion | {:.1}s",
        usage.prompt_tokens,
        usage.completion_tokens,
        duration_ms as f64 / 1000.0
    )
    .dim()
    .to_string()
}

// Tab completion and inline suggestion hints
//
// Completion is context-aware: the first token completes against command
// names, while "/model <prefix>" and "/prompt <prefix>" complete against
// model aliases and prompt names. The same candidate logic drives both Tab
// completion and the dimmed inline hint.

use std::borrow::Cow;

use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

use super::commands::{autocomplete_names, normalize_command};

/// Candidates matching the typed input, plus the prefix they replace.
/// Empty unless the input is a slash command.
pub fn complete_line(
    input: &str,
    command_names: &[String],
    model_names: &[String],
    prompt_names: &[String],
) -> (Vec<String>, String) {
    let trimmed = input.trim_start_matches([' ', '\t']);
    if !trimmed.starts_with('/') {
        return (Vec::new(), String::new());
    }

    let Some(typed) = trimmed.split_whitespace().next() else {
        return (Vec::new(), String::new());
    };

    match normalize_command(typed).as_str() {
        "/model" if has_arguments(trimmed) => {
            let prefix = argument_prefix(trimmed);
            (filter_by_prefix_case_insensitive(model_names, &prefix), prefix)
        }
        "/prompt" if has_arguments(trimmed) => {
            let prefix = argument_prefix(trimmed);
            (filter_by_prefix_case_insensitive(prompt_names, &prefix), prefix)
        }
        _ => (
            filter_by_prefix_case_insensitive(command_names, typed),
            typed.to_string(),
        ),
    }
}

fn has_arguments(input: &str) -> bool {
    input.contains([' ', '\t'])
}

/// The partial argument being typed, or empty right after a separator.
fn argument_prefix(input: &str) -> String {
    if input.ends_with([' ', '\t']) {
        return String::new();
    }
    let fields: Vec<&str> = input.split_whitespace().collect();
    if fields.len() < 2 {
        return String::new();
    }
    fields[fields.len() - 1].to_string()
}

fn filter_by_prefix_case_insensitive(candidates: &[String], prefix: &str) -> Vec<String> {
    let prefix = prefix.to_lowercase();
    candidates
        .iter()
        .filter(|c| c.to_lowercase().starts_with(&prefix))
        .cloned()
        .collect()
}

/// Case-insensitive sort with a byte-order tie-break so equal-ignoring-case
/// names still land in a deterministic order.
pub fn sorted_case_insensitive(values: Vec<String>) -> Vec<String> {
    let mut sorted = values;
    sorted.sort_by(|a, b| {
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    });
    sorted
}

/// rustyline helper wiring completion and hints into the editor.
pub struct ReplHelper {
    command_names: Vec<String>,
    model_names: Vec<String>,
    prompt_names: Vec<String>,
}

impl ReplHelper {
    pub fn new(model_names: Vec<String>, prompt_names: Vec<String>) -> Self {
        Self {
            command_names: autocomplete_names(),
            model_names: sorted_case_insensitive(model_names),
            prompt_names: sorted_case_insensitive(prompt_names),
        }
    }

    fn candidates(&self, input: &str) -> (Vec<String>, String) {
        complete_line(
            input,
            &self.command_names,
            &self.model_names,
            &self.prompt_names,
        )
    }
}

impl Completer for ReplHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let input = &line[..pos.min(line.len())];
        let (candidates, prefix) = self.candidates(input);
        let start = input.len() - prefix.len();
        let pairs = candidates
            .into_iter()
            .map(|c| Pair {
                display: c.clone(),
                replacement: c,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for ReplHelper {
    type Hint = String;

    /// Inline preview of the first candidate's remainder. Only shown with
    /// the cursor at the end of the line and at least two characters typed,
    /// so a bare "/" does not flicker a suggestion.
    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        if pos < line.len() || line.chars().count() < 2 {
            return None;
        }
        let (candidates, prefix) = self.candidates(line);
        let first = candidates.first()?;
        let suffix = first.get(prefix.len()..)?;
        if suffix.is_empty() {
            None
        } else {
            Some(suffix.to_string())
        }
    }
}

impl Highlighter for ReplHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(format!("\x1b[2m{hint}\x1b[0m"))
    }
}

impl Validator for ReplHelper {}

impl Helper for ReplHelper {}

// Interactive session loop

use std::collections::HashMap;

use anyhow::bail;
use crossterm::style::Stylize;

use crate::api::ApiClient;
use crate::config::{ModelEntry, OutputLength};
use crate::context::ProjectContext;
use crate::prompts::PromptStore;

use super::autocomplete::ReplHelper;
use super::commands::handle_slash_command;
use super::events::ReadEvent;
use super::generation::run_generation_with_cancel;
use super::line_source::spawn_line_reader;
use super::paste::{collect_pasted_input, drain_lines};

/// Mutable session state. Slash commands change it; generations read it.
pub struct SessionState {
    pub model: String,
    pub length: OutputLength,
    pub prompt_name: String,
    pub last_response: String,
    pub project_context: ProjectContext,
    pub store: PromptStore,
    pub client: ApiClient,
}

pub struct SessionOptions {
    pub temperature: f64,
    pub models: HashMap<String, ModelEntry>,
    pub auto_copy: bool,
    pub colorize: bool,
    pub history_path: Option<std::path::PathBuf>,
}

/// Run the REPL until EOF, /quit, or a reader failure.
pub async fn run(mut state: SessionState, opts: SessionOptions) -> anyhow::Result<()> {
    let helper = ReplHelper::new(
        crate::config::list_models(&opts.models),
        state.store.list().iter().map(|s| s.to_string()).collect(),
    );
    let mut rx = spawn_line_reader(helper, opts.history_path.clone())?;

    print_welcome(&state);

    loop {
        let Some(event) = rx.recv().await else {
            break;
        };

        match event {
            ReadEvent::Interrupted => {
                // ^C at an empty prompt, nothing to cancel.
                drain_lines(&mut rx);
            }
            ReadEvent::Eof => break,
            ReadEvent::Failed(msg) => bail!("readline failed: {msg}"),
            ReadEvent::Line(line) => {
                let line = line.trim().to_string();
                if line.is_empty() {
                    continue;
                }

                let input = collect_pasted_input(&mut rx, &line).await;

                // A slash command must be a single line; a pasted block that
                // happens to start with '/' is treated as generation input.
                if input.starts_with('/') && !input.contains('\n') {
                    if handle_slash_command(&input, &mut state, &opts.models) {
                        break;
                    }
                    continue;
                }

                let cancelled =
                    run_generation_with_cancel(&input, &mut state, &mut rx, &opts).await;
                drain_lines(&mut rx);

                if cancelled {
                    eprintln!("{}", "\nGeneration cancelled".yellow());
                }
            }
        }
    }

    println!("{}", "\nGoodbye!".green().bold());
    Ok(())
}

pub(super) fn print_welcome(state: &SessionState) {
    for line in welcome_lines(state) {
        println!("{line}");
    }
}

fn welcome_lines(state: &SessionState) -> Vec<String> {
    vec![
        "plume interactive mode".cyan().to_string(),
        format!(
            "Model: {} | Length: {} | Prompt: {}",
            state.model.as_str().blue().bold(),
            state.length.as_str().yellow().bold(),
            state.prompt_name.as_str().green().bold(),
        ),
        format!(
            "Type {} for commands, {} or {} to quit",
            "/help".green().bold(),
            "Ctrl+D".red().bold(),
            "/quit".red().bold(),
        ),
        String::new(),
    ]
}

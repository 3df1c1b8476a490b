// Slash command registry and dispatch
//
// Commands are declared once in SLASH_COMMANDS; help text, alias
// normalization, and autocomplete all derive from the same table.

use std::collections::HashMap;
use std::str::FromStr;

use crossterm::style::Stylize;

use crate::clipboard;
use crate::config::{list_models, ModelEntry, OutputLength};
use crate::output;

use super::session::{print_welcome, SessionState};

pub struct HelpEntry {
    pub usage: &'static str,
    pub description: &'static str,
}

pub struct CommandSpec {
    pub primary: &'static str,
    pub aliases: &'static [&'static str],
    pub help: &'static [HelpEntry],
    /// Names offered by autocomplete. Empty means just the primary.
    pub autocomplete: &'static [&'static str],
}

pub const SLASH_COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        primary: "/clear",
        aliases: &[],
        help: &[HelpEntry {
            usage: "/clear",
            description: "Clear the screen",
        }],
        autocomplete: &[],
    },
    CommandSpec {
        primary: "/length",
        aliases: &["/l"],
        help: &[
            HelpEntry {
                usage: "/length",
                description: "Show current length and list of available lengths",
            },
            HelpEntry {
                usage: "/length [name]",
                description: "Change output length to provided length",
            },
        ],
        autocomplete: &[],
    },
    CommandSpec {
        primary: "/model",
        aliases: &["/m"],
        help: &[
            HelpEntry {
                usage: "/model",
                description: "Show current model and list of available models",
            },
            HelpEntry {
                usage: "/model [name]",
                description: "Switch model to provided model",
            },
        ],
        autocomplete: &[],
    },
    CommandSpec {
        primary: "/copy",
        aliases: &["/c"],
        help: &[HelpEntry {
            usage: "/copy",
            description: "Copy last response to clipboard",
        }],
        autocomplete: &[],
    },
    CommandSpec {
        primary: "/prompt",
        aliases: &["/p"],
        help: &[
            HelpEntry {
                usage: "/prompt",
                description: "Show current prompt and list of available prompts",
            },
            HelpEntry {
                usage: "/prompt [name]",
                description: "Switch prompt template to provided prompt",
            },
        ],
        autocomplete: &[],
    },
    CommandSpec {
        primary: "/help",
        aliases: &[],
        help: &[HelpEntry {
            usage: "/help",
            description: "Show this help",
        }],
        autocomplete: &[],
    },
    CommandSpec {
        primary: "/quit",
        aliases: &["/exit"],
        help: &[HelpEntry {
            usage: "/quit or /exit",
            description: "Exit the session",
        }],
        autocomplete: &["/quit", "/exit"],
    },
];

/// Map a typed command (any case, alias or primary) to its primary form.
/// Unknown commands come back lowercased.
pub fn normalize_command(typed: &str) -> String {
    let lower = typed.to_lowercase();
    for spec in SLASH_COMMANDS {
        if spec.primary == lower || spec.aliases.contains(&lower.as_str()) {
            return spec.primary.to_string();
        }
    }
    lower
}

/// Command names offered to autocomplete. Aliases are included only where a
/// spec opts in (e.g. /exit alongside /quit).
pub fn autocomplete_names() -> Vec<String> {
    let mut names = Vec::new();
    for spec in SLASH_COMMANDS {
        if spec.autocomplete.is_empty() {
            names.push(spec.primary.to_string());
        } else {
            names.extend(spec.autocomplete.iter().map(|s| s.to_string()));
        }
    }
    names
}

/// Execute a slash command. Returns true when the session should exit.
pub fn handle_slash_command(
    line: &str,
    state: &mut SessionState,
    models: &HashMap<String, ModelEntry>,
) -> bool {
    let mut parts = line.split_whitespace();
    let Some(typed) = parts.next() else {
        return false;
    };
    let command = normalize_command(typed);
    let args: Vec<&str> = parts.collect();

    match command.as_str() {
        "/quit" => return true,

        "/clear" => {
            clear_screen();
            print_welcome(state);
        }

        "/help" => print_help(),

        "/length" => {
            let Some(arg) = args.first() else {
                println!("Current length: {}", state.length.as_str().yellow().bold());
                println!("Usage: {}", "/length <short|medium|long>".cyan());
                return false;
            };
            match OutputLength::from_str(arg) {
                Ok(length) => {
                    state.length = length;
                    println!("Length set to: {}", length.as_str().yellow().bold());
                }
                Err(e) => eprintln!("Error: {}", e.to_string().red()),
            }
        }

        "/model" => {
            let Some(arg) = args.first() else {
                println!("Current model: {}", state.model.as_str().blue().bold());
                let available: Vec<String> = list_models(models)
                    .iter()
                    .map(|m| m.as_str().blue().to_string())
                    .collect();
                println!("Available models: {}", available.join(", "));
                println!("Usage: {}", "/model <alias>".cyan());
                return false;
            };
            // Unrecognized names pass through as literal model IDs.
            state.model = (*arg).to_string();
            println!("Model set to: {}", state.model.as_str().blue().bold());
        }

        "/prompt" => {
            let Some(arg) = args.first() else {
                println!("Current prompt: {}", state.prompt_name.as_str().green().bold());
                let available: Vec<String> = state
                    .store
                    .list()
                    .into_iter()
                    .map(|p| p.green().to_string())
                    .collect();
                println!("Available prompts: {}", available.join(", "));
                println!("Usage: {}", "/prompt <name>".cyan());
                return false;
            };
            match state.store.get(arg) {
                Ok(_) => {
                    state.prompt_name = (*arg).to_string();
                    println!("Prompt set to: {}", state.prompt_name.as_str().green().bold());
                }
                Err(e) => eprintln!("Error: {}", e.to_string().red()),
            }
        }

        "/copy" => {
            if state.last_response.is_empty() {
                println!("{}", "No response to copy".yellow());
                return false;
            }
            match clipboard::copy_with_warning(&state.last_response) {
                Some(warning) => eprintln!("{}", warning.yellow()),
                None => println!("{}", output::copied_message()),
            }
        }

        unknown => {
            println!(
                "Unknown command: {} (type {} for help)",
                unknown.red(),
                "/help".green().bold(),
            );
        }
    }

    false
}

pub fn print_help() {
    let max_usage = SLASH_COMMANDS
        .iter()
        .flat_map(|spec| spec.help.iter())
        .map(|entry| entry.usage.len())
        .max()
        .unwrap_or(0);

    println!("{}", "Available commands:".bold());
    println!();
    for spec in SLASH_COMMANDS {
        for entry in spec.help {
            let padding = " ".repeat(max_usage - entry.usage.len());
            println!("  {}{} - {}", entry.usage.cyan(), padding, entry.description);
        }
    }
    println!("\nKeyboard shortcuts:");
    println!("  {}  - Cancel current generation", "Ctrl+C".yellow().bold());
    println!("  {}  - Exit the session", "Ctrl+D".red().bold());
    println!();
}

pub fn clear_screen() {
    print!("\x1b[2J\x1b[H");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_models;
    use crate::prompts::PromptStore;

    fn test_state() -> SessionState {
        use crate::api::ApiClient;
        use crate::context::ProjectContext;

        SessionState {
            model: "cerebras-llama-8b".to_string(),
            length: OutputLength::Medium,
            prompt_name: "metaprompt".to_string(),
            last_response: String::new(),
            project_context: ProjectContext::default(),
            store: PromptStore::builtin(),
            client: ApiClient::new("test-key".to_string()).unwrap(),
        }
    }

    #[test]
    fn aliases_normalize_to_primary() {
        assert_eq!(normalize_command("/l"), "/length");
        assert_eq!(normalize_command("/m"), "/model");
        assert_eq!(normalize_command("/c"), "/copy");
        assert_eq!(normalize_command("/p"), "/prompt");
        assert_eq!(normalize_command("/exit"), "/quit");
        assert_eq!(normalize_command("/quit"), "/quit");
    }

    #[test]
    fn normalization_is_case_insensitive() {
        assert_eq!(normalize_command("/HELP"), "/help");
        assert_eq!(normalize_command("/Model"), "/model");
        assert_eq!(normalize_command("/QUIT"), "/quit");
    }

    #[test]
    fn unknown_commands_are_lowercased_but_kept() {
        assert_eq!(normalize_command("/Bogus"), "/bogus");
    }

    #[test]
    fn autocomplete_names_include_both_quit_forms() {
        let names = autocomplete_names();
        assert!(names.contains(&"/quit".to_string()));
        assert!(names.contains(&"/exit".to_string()));
        assert!(names.contains(&"/help".to_string()));
        // Short aliases are not offered as completions.
        assert!(!names.contains(&"/l".to_string()));
    }

    #[test]
    fn quit_requests_exit() {
        let mut state = test_state();
        assert!(handle_slash_command("/quit", &mut state, &default_models()));
        assert!(handle_slash_command("/exit", &mut state, &default_models()));
    }

    #[test]
    fn length_command_updates_state() {
        let mut state = test_state();
        assert!(!handle_slash_command("/length long", &mut state, &default_models()));
        assert_eq!(state.length, OutputLength::Long);

        // Alias works the same way.
        assert!(!handle_slash_command("/l short", &mut state, &default_models()));
        assert_eq!(state.length, OutputLength::Short);

        // Invalid tier leaves state unchanged.
        assert!(!handle_slash_command("/length huge", &mut state, &default_models()));
        assert_eq!(state.length, OutputLength::Short);
    }

    #[test]
    fn model_command_accepts_any_name() {
        let mut state = test_state();
        handle_slash_command("/model openai-gpt5-nano", &mut state, &default_models());
        assert_eq!(state.model, "openai-gpt5-nano");

        handle_slash_command("/m vendor/custom-model", &mut state, &default_models());
        assert_eq!(state.model, "vendor/custom-model");
    }

    #[test]
    fn prompt_command_validates_against_store() {
        let mut state = test_state();
        handle_slash_command("/prompt bulletlist", &mut state, &default_models());
        assert_eq!(state.prompt_name, "bulletlist");

        handle_slash_command("/prompt nonexistent", &mut state, &default_models());
        assert_eq!(state.prompt_name, "bulletlist");
    }

    #[test]
    fn bare_commands_do_not_mutate_state() {
        let mut state = test_state();
        handle_slash_command("/length", &mut state, &default_models());
        handle_slash_command("/model", &mut state, &default_models());
        handle_slash_command("/prompt", &mut state, &default_models());
        assert_eq!(state.length, OutputLength::Medium);
        assert_eq!(state.model, "cerebras-llama-8b");
        assert_eq!(state.prompt_name, "metaprompt");
    }
}

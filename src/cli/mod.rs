// Command-line interface definition

use std::path::PathBuf;

use clap::Parser;

/// Ultra-fast AI-revised meta prompts from your input text.
#[derive(Parser, Debug)]
#[command(
    name = "plume",
    version,
    about = "Generate AI-optimized prompts from your input",
    long_about = "plume - Ultra-fast AI-revised meta prompts from your input text.\n\n\
                  Generates meta-prompts and general AI completions via OpenRouter, with\n\
                  configurable output lengths and fast/small model routing.\n\n\
                  Examples:\n  \
                  plume \"help me write a blog post\" --length short\n  \
                  plume \"analyze CSV data\" -l long\n  \
                  echo \"my goal\" | plume\n  \
                  plume --interactive"
)]
pub struct Cli {
    /// Input text; read from stdin when piped and no argument is given
    pub input: Vec<String>,

    /// Model alias or OpenRouter ID
    #[arg(short, long)]
    pub model: Option<String>,

    /// Output length: short|medium|long
    #[arg(short, long)]
    pub length: Option<String>,

    /// Prompt template name
    #[arg(short, long, default_value = "metaprompt")]
    pub prompt: String,

    /// Disable auto-copy to clipboard
    #[arg(long)]
    pub no_copy: bool,

    /// Config file (default is ~/.plume/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Start an interactive session
    #[arg(short, long)]
    pub interactive: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags_and_positional_input() {
        let cli = Cli::parse_from(["plume", "write a haiku", "-l", "short", "-m", "openai-gpt5-nano"]);
        assert_eq!(cli.input, vec!["write a haiku"]);
        assert_eq!(cli.length.as_deref(), Some("short"));
        assert_eq!(cli.model.as_deref(), Some("openai-gpt5-nano"));
        assert_eq!(cli.prompt, "metaprompt");
        assert!(!cli.no_copy);
        assert!(!cli.interactive);
    }

    #[test]
    fn interactive_flag_needs_no_input() {
        let cli = Cli::parse_from(["plume", "-i"]);
        assert!(cli.interactive);
        assert!(cli.input.is_empty());
    }

    #[test]
    fn no_copy_and_prompt_flags() {
        let cli = Cli::parse_from(["plume", "--no-copy", "-p", "bulletlist", "organize this"]);
        assert!(cli.no_copy);
        assert_eq!(cli.prompt, "bulletlist");
    }
}

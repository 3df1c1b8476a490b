use std::io::{IsTerminal, Read};
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use plume::api::ApiClient;
use plume::cli::Cli;
use plume::config::{self, OutputLength};
use plume::context::{self, ProjectContext};
use plume::oneshot::{self, OneShotRequest};
use plume::prompts::PromptStore;
use plume::repl;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cfg = config::load_config(cli.config.as_deref())?;
    if cfg.api_key.is_empty() {
        bail!("API key not found. Set PLUME_API_KEY or add api_key to ~/.plume/config.toml");
    }

    let length = match &cli.length {
        Some(raw) => OutputLength::from_str(raw)?,
        None => cfg.default_length,
    };
    let model = cli.model.clone().unwrap_or_else(|| cfg.default_model.clone());
    let auto_copy = !cli.no_copy && !cfg.disable_copy;

    let client = ApiClient::new(cfg.api_key.clone())?;
    let store = match config::prompts_dir() {
        Ok(dir) => PromptStore::load(&dir),
        Err(_) => PromptStore::builtin(),
    };

    let working_dir = std::env::current_dir().context("could not determine working directory")?;
    let project_context = context::load(&working_dir);

    let interactive = cli.interactive
        || (cli.input.is_empty() && std::io::stdin().is_terminal());
    if interactive {
        return run_session(client, store, project_context, cfg, model, length, cli.prompt, auto_copy)
            .await;
    }

    let input = gather_input(&cli.input)?;
    if input.trim().is_empty() {
        bail!("no input provided (pass text as an argument, pipe it in, or use --interactive)");
    }

    oneshot::run(
        &client,
        &store,
        &project_context,
        OneShotRequest {
            input: input.trim(),
            model: &model,
            length,
            prompt_name: &cli.prompt,
            temperature: cfg.temperature,
            auto_copy,
            models: &cfg.models,
        },
    )
    .await
}

#[allow(clippy::too_many_arguments)]
async fn run_session(
    client: ApiClient,
    store: PromptStore,
    project_context: ProjectContext,
    cfg: plume::config::Config,
    model: String,
    length: OutputLength,
    prompt_name: String,
    auto_copy: bool,
) -> Result<()> {
    let state = repl::SessionState {
        model,
        length,
        prompt_name,
        last_response: String::new(),
        project_context,
        store,
        client,
    };
    let opts = repl::SessionOptions {
        temperature: cfg.temperature,
        models: cfg.models,
        auto_copy,
        colorize: std::io::stdout().is_terminal(),
        history_path: config::history_path(),
    };
    repl::run(state, opts).await
}

/// Input from positional arguments, or from stdin when piped.
fn gather_input(args: &[String]) -> Result<String> {
    if !args.is_empty() {
        return Ok(args.join(" "));
    }

    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Ok(String::new());
    }

    let mut buffer = String::new();
    stdin
        .read_to_string(&mut buffer)
        .context("failed to read stdin")?;
    Ok(buffer)
}

pub mod api;
pub mod cli;
pub mod clipboard;
pub mod config;
pub mod context;
pub mod oneshot;
pub mod output;
pub mod prompts;
pub mod repl;

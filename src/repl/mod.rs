// Interactive REPL session
//
// The session is split along its concurrency seams: a reader thread feeding
// ReadEvents into a channel, paste aggregation over that channel, a slash
// command table, and a cancellable streaming generation task.

mod autocomplete;
mod commands;
mod events;
mod generation;
mod line_source;
mod paste;
mod session;

pub use session::{run, SessionOptions, SessionState};

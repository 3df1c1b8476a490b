// Readline runs on a dedicated OS thread
//
// rustyline's readline() blocks, so it gets its own thread and feeds the
// async session loop through a channel. That split is what lets the session
// receive Ctrl+C while a generation is streaming, and lets pasted multi-line
// input queue up for aggregation instead of firing one request per line.

use std::path::PathBuf;
use std::thread;

use rustyline::error::ReadlineError;
use rustyline::history::FileHistory;
use rustyline::{Config, Editor};
use tokio::sync::mpsc;

use super::autocomplete::ReplHelper;
use super::events::ReadEvent;

/// Channel depth. Large enough that a big paste never blocks the reader.
pub const LINE_CHANNEL_CAPACITY: usize = 512;

pub const PROMPT: &str = "> ";

/// Spawn the reader thread and return the receiving end of its event stream.
/// The thread exits on EOF or a permanent readline error; interrupts are
/// forwarded and reading continues.
pub fn spawn_line_reader(
    helper: ReplHelper,
    history_path: Option<PathBuf>,
) -> anyhow::Result<mpsc::Receiver<ReadEvent>> {
    let (tx, rx) = mpsc::channel(LINE_CHANNEL_CAPACITY);

    let config = Config::builder().auto_add_history(true).build();
    let mut editor: Editor<ReplHelper, FileHistory> = Editor::with_config(config)?;
    editor.set_helper(Some(helper));

    if let Some(path) = &history_path {
        if path.exists() {
            if let Err(e) = editor.load_history(path) {
                tracing::debug!(error = %e, "could not load history");
            }
        }
    }

    thread::spawn(move || {
        loop {
            let event = match editor.readline(PROMPT) {
                Ok(line) => ReadEvent::Line(line),
                Err(ReadlineError::Interrupted) => ReadEvent::Interrupted,
                Err(ReadlineError::Eof) => ReadEvent::Eof,
                Err(e) => ReadEvent::Failed(e.to_string()),
            };
            let stop = event.is_terminal();

            // blocking_send is correct here: this is a plain thread, not a
            // tokio task. If the receiver is gone the session has exited.
            if tx.blocking_send(event).is_err() {
                break;
            }
            if stop {
                break;
            }
        }

        if let Some(path) = &history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            if let Err(e) = editor.save_history(path) {
                tracing::debug!(error = %e, "could not save history");
            }
        }
    });

    Ok(rx)
}

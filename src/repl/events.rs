// Events flowing from the line reader thread to the session loop

/// One read outcome from the readline thread. The channel carrying these is
/// deliberately large so rapid paste lines queue up without blocking the
/// reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadEvent {
    /// A line of input, newline stripped.
    Line(String),
    /// Ctrl+C. The reader keeps running; the session decides what it means
    /// (cancel an in-flight generation, or just re-prompt).
    Interrupted,
    /// Ctrl+D. The reader stops after sending this.
    Eof,
    /// A readline error the reader cannot recover from.
    Failed(String),
}

impl ReadEvent {
    /// True for events that terminate the reader thread.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReadEvent::Eof | ReadEvent::Failed(_))
    }
}

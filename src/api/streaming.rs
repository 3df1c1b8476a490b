// Server-Sent Events parsing for streaming completions
//
// SSE comments (lines starting with ":") such as ": OPENROUTER PROCESSING"
// are ignored per the SSE spec. Mid-stream failures are surfaced via the
// chunk's error field or a finish_reason of "error".

use super::types::{ApiError, StreamChunk, TokenUsage};

/// What one SSE line amounts to.
#[derive(Debug)]
pub enum SseLine {
    /// Blank line, comment, non-data field, or malformed chunk — skip it.
    Ignore,
    /// The "[DONE]" terminator.
    Done,
    /// A parsed data chunk.
    Chunk(StreamChunk),
}

/// Parse a single line of an SSE stream.
pub fn parse_sse_line(line: &str) -> SseLine {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.is_empty() || line.starts_with(':') {
        return SseLine::Ignore;
    }

    let Some(data) = line.strip_prefix("data: ") else {
        return SseLine::Ignore;
    };

    if data.trim() == "[DONE]" {
        return SseLine::Done;
    }

    match serde_json::from_str::<StreamChunk>(data) {
        Ok(chunk) => SseLine::Chunk(chunk),
        // Malformed chunks are skipped rather than aborting the stream.
        Err(_) => SseLine::Ignore,
    }
}

/// Feed one parsed chunk to the token callback, tracking usage reported by
/// the final chunk. Returns an error for mid-stream failures.
pub fn apply_chunk(
    chunk: StreamChunk,
    usage: &mut TokenUsage,
    on_token: &mut dyn FnMut(&str),
) -> Result<(), ApiError> {
    if let Some(failure) = chunk.error {
        return Err(ApiError::Stream(failure.message));
    }

    if let Some(reported) = chunk.usage {
        *usage = reported;
    }

    if let Some(choice) = chunk.choices.first() {
        if choice.finish_reason.as_deref() == Some("error") {
            return Err(ApiError::Stream(
                "stream terminated with error finish_reason".to_string(),
            ));
        }
        if let Some(content) = &choice.delta.content {
            if !content.is_empty() {
                on_token(content);
            }
        }
    }

    Ok(())
}

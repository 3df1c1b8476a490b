// System clipboard access via arboard.
//
// Clipboard failures are never fatal; callers surface a warning and move on.

use anyhow::{Context, Result};

pub fn copy(text: &str) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new().context("clipboard not available")?;
    clipboard
        .set_text(text.to_string())
        .context("failed to copy to clipboard")?;
    Ok(())
}

/// Copy text to the clipboard, returning a user-facing warning on failure.
pub fn copy_with_warning(text: &str) -> Option<String> {
    match copy(text) {
        Ok(()) => None,
        Err(e) => Some(format!("Warning: Could not copy to clipboard: {e:#}")),
    }
}

//! Copying results to the system clipboard.

use arboard::Clipboard;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("failed to access clipboard: {0}")]
    Unavailable(#[source] arboard::Error),

    #[error("failed to copy to clipboard: {0}")]
    Write(#[source] arboard::Error),

    #[error("nothing to copy")]
    Empty,
}

/// Copy a result string to the system clipboard.
pub fn copy_to_clipboard(text: &str) -> Result<(), ClipboardError> {
    if text.is_empty() {
        return Err(ClipboardError::Empty);
    }

    let mut clipboard = Clipboard::new().map_err(ClipboardError::Unavailable)?;
    clipboard
        .set_text(text.to_string())
        .map_err(ClipboardError::Write)?;

    tracing::debug!(len = text.len(), "copied result to clipboard");
    Ok(())
}

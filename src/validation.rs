use crate::error::{Result, SiteGenError};

/// Number of characters of a prompt shown in log lines.
pub const LOG_PREVIEW_CHARS: usize = 100;

/// Reject missing or blank required fields.
pub fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SiteGenError::Validation(format!("{field} is required")));
    }
    Ok(())
}

/// Truncate text for logging without splitting a character.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

//! Input validation helpers for registration and account updates.

/// Extract a required text field, trimming surrounding whitespace.
///
/// Returns `Err` with a human-readable message when the field is missing
/// or empty after trimming.
pub fn required_field(value: Option<&str>, field: &str) -> Result<String, String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(format!("{field} is required")),
    }
}

/// Normalize a username or email for storage and lookup: trim and lowercase.
///
/// Both columns are unique on the normalized form, so every lookup must go
/// through the same normalization.
pub fn normalize_identifier(raw: &str) -> String {
    raw.trim().to_lowercase()
}

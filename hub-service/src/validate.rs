//! Shape checks for user-supplied text fields.

use crate::error::{Result, ServiceError};

pub const MAX_NAME_LEN: usize = 255;
pub const MAX_DESCRIPTION_LEN: usize = 1000;
pub const MAX_EMOJI_LEN: usize = 16;

/// Trimmed, non-empty, at most [`MAX_NAME_LEN`] characters.
pub fn name<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::InvalidInput(format!("{} is required", field)));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(ServiceError::InvalidInput(format!(
            "{} must be at most {} characters",
            field, MAX_NAME_LEN
        )));
    }
    Ok(trimmed)
}

/// Optional free text; blank input becomes `None`.
pub fn optional_text(field: &str, value: Option<&str>, max: usize) -> Result<Option<String>> {
    let Some(trimmed) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    if trimmed.chars().count() > max {
        return Err(ServiceError::InvalidInput(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(Some(trimmed.to_string()))
}

//! Request validation performed by the HTTP layer before dispatch.
//!
//! Covers presence, type, and size checks only. Existence and ownership
//! checks belong to the note actor.

use serde_json::Value;
use thiserror::Error;

pub const MAX_TITLE_LEN: usize = 512;
pub const MAX_NOTE_LEN: usize = 64 * 1024;
pub const MAX_ID_LEN: usize = 256;
pub const MAX_TAGS: usize = 32;
pub const MAX_TAG_LEN: usize = 64;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("{field} exceeds max length of {max}")]
    TooLong { field: &'static str, max: usize },

    #[error("{field} exceeds maximum count of {max}")]
    TooMany { field: &'static str, max: usize },

    #[error("either courseId or contentId is required")]
    MissingAssociation,

    #[error("tags must be an array of strings")]
    InvalidTags,
}

#[cfg(test)]
impl ValidationError {
    /// Check if the error message contains a substring (convenience for tests).
    pub fn contains(&self, s: &str) -> bool {
        self.to_string().contains(s)
    }
}

/// Validates the `request` member of a create note call.
pub fn validate_note_payload(payload: &Value) -> Result<(), ValidationError> {
    require_text(payload, "userId", MAX_ID_LEN)?;
    require_text(payload, "title", MAX_TITLE_LEN)?;
    require_text(payload, "note", MAX_NOTE_LEN)?;

    let has_course = optional_text(payload, "courseId", MAX_ID_LEN)?;
    let has_content = optional_text(payload, "contentId", MAX_ID_LEN)?;
    if !has_course && !has_content {
        return Err(ValidationError::MissingAssociation);
    }

    validate_tags(payload)
}

/// Validates a note id taken from the request path.
pub fn validate_note_id(note_id: &str) -> Result<(), ValidationError> {
    if note_id.trim().is_empty() {
        return Err(ValidationError::MissingField { field: "noteId" });
    }
    if note_id.len() > MAX_ID_LEN {
        return Err(ValidationError::TooLong {
            field: "noteId",
            max: MAX_ID_LEN,
        });
    }
    Ok(())
}

fn require_text(payload: &Value, field: &'static str, max: usize) -> Result<(), ValidationError> {
    match payload.get(field).and_then(Value::as_str) {
        Some(value) if !value.trim().is_empty() => {
            if value.len() > max {
                Err(ValidationError::TooLong { field, max })
            } else {
                Ok(())
            }
        }
        _ => Err(ValidationError::MissingField { field }),
    }
}

/// Like `require_text` but absence is fine. Returns whether the field
/// was present.
fn optional_text(payload: &Value, field: &'static str, max: usize) -> Result<bool, ValidationError> {
    match payload.get(field).and_then(Value::as_str) {
        Some(value) if !value.trim().is_empty() => {
            if value.len() > max {
                Err(ValidationError::TooLong { field, max })
            } else {
                Ok(true)
            }
        }
        _ => Ok(false),
    }
}

fn validate_tags(payload: &Value) -> Result<(), ValidationError> {
    let Some(tags) = payload.get("tags") else {
        return Ok(());
    };
    let Some(tags) = tags.as_array() else {
        return Err(ValidationError::InvalidTags);
    };
    if tags.len() > MAX_TAGS {
        return Err(ValidationError::TooMany {
            field: "tags",
            max: MAX_TAGS,
        });
    }
    for tag in tags {
        let Some(tag) = tag.as_str() else {
            return Err(ValidationError::InvalidTags);
        };
        if tag.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "tag" });
        }
        if tag.len() > MAX_TAG_LEN {
            return Err(ValidationError::TooLong {
                field: "tag",
                max: MAX_TAG_LEN,
            });
        }
    }
    Ok(())
}

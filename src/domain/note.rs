use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user note stored by the note actor.
///
/// Serializes with camelCase keys so stored rows and API results share
/// one shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_id: Option<String>,
    pub title: String,
    pub note: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_deleted: bool,
}

/// Payload for creating a new note. Unknown keys in the incoming
/// request object are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePayload {
    pub user_id: String,
    #[serde(default)]
    pub course_id: Option<String>,
    #[serde(default)]
    pub content_id: Option<String>,
    pub title: String,
    pub note: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Payload for updating an existing note. Only these fields are
/// mutable; identifiers and associations are fixed at creation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl Note {
    /// Materializes a stored note from a create payload.
    ///
    /// # Notes
    /// The `id` is assigned by the actor, not the caller. `created_date`
    /// is stamped here and never changes afterwards.
    pub fn from_payload(id: impl Into<String>, payload: NotePayload) -> Self {
        Self {
            id: id.into(),
            user_id: payload.user_id,
            course_id: payload.course_id,
            content_id: payload.content_id,
            title: payload.title,
            note: payload.note,
            tags: payload.tags,
            created_date: Utc::now(),
            updated_date: None,
            is_deleted: false,
        }
    }

    /// Applies a patch in place and stamps `updated_date`.
    pub fn apply_patch(&mut self, patch: NotePatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(note) = patch.note {
            self.note = note;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        self.updated_date = Some(Utc::now());
    }
}

use std::fmt;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::error::NoteError;

/// Generic type aliases for service communication
pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

/// Operations the note actor understands. The wire name matches the
/// `operation` field callers see in logs, and each operation carries the
/// API id stamped into its response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorOperation {
    CreateNote,
    UpdateNote,
    GetNote,
    SearchNote,
    DeleteNote,
}

impl ActorOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateNote => "createNote",
            Self::UpdateNote => "updateNote",
            Self::GetNote => "getNote",
            Self::SearchNote => "searchNote",
            Self::DeleteNote => "deleteNote",
        }
    }

    pub fn api_id(&self) -> &'static str {
        match self {
            Self::CreateNote => "api.note.create",
            Self::UpdateNote => "api.note.update",
            Self::GetNote => "api.note.read",
            Self::SearchNote => "api.note.search",
            Self::DeleteNote => "api.note.delete",
        }
    }
}

impl fmt::Display for ActorOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized request handed to the note actor. The HTTP layer fills in
/// everything the caller did not send: operation, correlation id,
/// environment, requesting user and timestamp.
#[derive(Debug, Clone)]
pub struct RequestEnvelope {
    pub operation: ActorOperation,
    pub request_id: String,
    pub env: String,
    pub requested_by: Option<String>,
    pub note_id: Option<String>,
    pub payload: Value,
    pub ts: DateTime<Utc>,
}

impl RequestEnvelope {
    pub fn new(operation: ActorOperation, env: impl Into<String>) -> Self {
        Self {
            operation,
            request_id: Uuid::now_v7().to_string(),
            env: env.into(),
            requested_by: None,
            note_id: None,
            payload: Value::Null,
            ts: Utc::now(),
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    pub fn with_requested_by(mut self, requested_by: Option<String>) -> Self {
        self.requested_by = requested_by;
        self
    }

    pub fn with_note_id(mut self, note_id: impl Into<String>) -> Self {
        self.note_id = Some(note_id.into());
        self
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }
}

/// Typed message enum for note actor communication. Each variant includes
/// parameters and a oneshot channel for responses.
#[derive(Debug)]
pub enum NoteCommand {
    Dispatch {
        envelope: RequestEnvelope,
        respond_to: ServiceResponse<Value, NoteError>,
    },
    Shutdown,
    #[cfg(test)]
    GetNoteCount {
        respond_to: ServiceResponse<usize, NoteError>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_wire_names() {
        assert_eq!(ActorOperation::CreateNote.as_str(), "createNote");
        assert_eq!(ActorOperation::UpdateNote.as_str(), "updateNote");
        assert_eq!(ActorOperation::GetNote.as_str(), "getNote");
        assert_eq!(ActorOperation::SearchNote.as_str(), "searchNote");
        assert_eq!(ActorOperation::DeleteNote.as_str(), "deleteNote");
        assert_eq!(ActorOperation::GetNote.to_string(), "getNote");
    }

    #[test]
    fn test_operation_api_ids() {
        assert_eq!(ActorOperation::CreateNote.api_id(), "api.note.create");
        assert_eq!(ActorOperation::DeleteNote.api_id(), "api.note.delete");
    }

    #[test]
    fn test_envelope_builder() {
        let envelope = RequestEnvelope::new(ActorOperation::GetNote, "dev")
            .with_request_id("req-1")
            .with_requested_by(Some("user-1".to_string()))
            .with_note_id("note-1");

        assert_eq!(envelope.operation, ActorOperation::GetNote);
        assert_eq!(envelope.request_id, "req-1");
        assert_eq!(envelope.env, "dev");
        assert_eq!(envelope.requested_by.as_deref(), Some("user-1"));
        assert_eq!(envelope.note_id.as_deref(), Some("note-1"));
        assert!(envelope.payload.is_null());
    }

    #[test]
    fn test_envelope_assigns_request_id_by_default() {
        let envelope = RequestEnvelope::new(ActorOperation::CreateNote, "dev");
        assert!(!envelope.request_id.is_empty());
    }
}

use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use crate::clients::NoteClient;
use crate::domain::{Note, NotePatch, NotePayload, SearchCriteria};
use crate::error::NoteError;
use crate::messages::{ActorOperation, NoteCommand, RequestEnvelope, ServiceResponse};

// =============================================================================
// NOTE SERVICE
// =============================================================================

/// Actor owning the note store. All note state lives behind this mailbox;
/// the HTTP layer only ever talks to it through a `NoteClient`.
pub struct NoteService {
    receiver: mpsc::Receiver<NoteCommand>,
    notes: HashMap<String, Note>,
}

impl NoteService {
    pub fn new(buffer_size: usize, ask_timeout: Duration) -> (Self, NoteClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            notes: HashMap::new(),
        };
        let client = NoteClient::new(sender, ask_timeout);
        (service, client)
    }

    #[instrument(name = "note_service", skip(self))]
    pub async fn run(mut self) {
        info!("NoteService starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                NoteCommand::Dispatch { envelope, respond_to } => {
                    self.handle_dispatch(envelope, respond_to);
                }
                NoteCommand::Shutdown => {
                    info!("NoteService shutting down");
                    break;
                }
                #[cfg(test)]
                NoteCommand::GetNoteCount { respond_to } => {
                    let _ = respond_to.send(Ok(self.notes.len()));
                }
            }
        }
        info!("NoteService stopped");
    }

    #[instrument(
        fields(operation = %envelope.operation, request_id = %envelope.request_id),
        skip(self, envelope, respond_to)
    )]
    fn handle_dispatch(
        &mut self,
        envelope: RequestEnvelope,
        respond_to: ServiceResponse<Value, NoteError>,
    ) {
        let queued_ms = (Utc::now() - envelope.ts).num_milliseconds();
        debug!(env = %envelope.env, queued_ms, "Dispatching");
        let result = match envelope.operation {
            ActorOperation::CreateNote => self.handle_create_note(&envelope),
            ActorOperation::UpdateNote => self.handle_update_note(&envelope),
            ActorOperation::GetNote => self.handle_get_note(&envelope),
            ActorOperation::SearchNote => self.handle_search_note(&envelope),
            ActorOperation::DeleteNote => self.handle_delete_note(&envelope),
        };
        let _ = respond_to.send(result);
    }

    fn handle_create_note(&mut self, envelope: &RequestEnvelope) -> Result<Value, NoteError> {
        info!("Processing create note request");
        let payload: NotePayload = serde_json::from_value(envelope.payload.clone())
            .map_err(|e| NoteError::ValidationError(e.to_string()))?;
        let requester = requesting_user(envelope)?;
        if payload.user_id != requester {
            error!("Payload user does not match requesting user");
            return Err(NoteError::Unauthorized(
                "userId does not match the requesting user".to_string(),
            ));
        }

        let note = Note::from_payload(Uuid::now_v7().to_string(), payload);
        let id = note.id.clone();
        self.notes.insert(id.clone(), note);
        info!(note_id = %id, "Note created successfully");
        Ok(json!({ "id": id }))
    }

    fn handle_get_note(&self, envelope: &RequestEnvelope) -> Result<Value, NoteError> {
        debug!("Processing get note request");
        let requester = requesting_user(envelope)?;
        let id = note_id(envelope)?;
        let note = self.owned_note(id, requester)?;
        info!(note_id = %note.id, "Note found");
        Ok(json!({ "response": note }))
    }

    fn handle_update_note(&mut self, envelope: &RequestEnvelope) -> Result<Value, NoteError> {
        info!("Processing update note request");
        let requester = requesting_user(envelope)?.to_string();
        let id = note_id(envelope)?.to_string();
        let patch: NotePatch = serde_json::from_value(envelope.payload.clone())
            .map_err(|e| NoteError::ValidationError(e.to_string()))?;

        self.owned_note(&id, &requester)?;
        let note = self
            .notes
            .get_mut(&id)
            .ok_or_else(|| NoteError::NotFound(id.clone()))?;
        note.apply_patch(patch);
        info!(note_id = %id, "Note updated successfully");
        Ok(json!({ "response": "SUCCESS" }))
    }

    fn handle_delete_note(&mut self, envelope: &RequestEnvelope) -> Result<Value, NoteError> {
        info!("Processing delete note request");
        let requester = requesting_user(envelope)?.to_string();
        let id = note_id(envelope)?.to_string();

        self.owned_note(&id, &requester)?;
        let note = self
            .notes
            .get_mut(&id)
            .ok_or_else(|| NoteError::NotFound(id.clone()))?;
        // Soft delete: the row stays but stops being visible to reads.
        note.is_deleted = true;
        note.updated_date = Some(Utc::now());
        info!(note_id = %id, "Note deleted successfully");
        Ok(json!({ "response": "SUCCESS" }))
    }

    fn handle_search_note(&self, envelope: &RequestEnvelope) -> Result<Value, NoteError> {
        debug!("Processing search note request");
        let mut criteria = SearchCriteria::from_payload(&envelope.payload);
        // Unscoped searches only ever see the requester's own notes.
        if criteria.user_id.is_none() {
            criteria.user_id = Some(requesting_user(envelope)?.to_string());
        }

        let mut matches: Vec<Note> = self
            .notes
            .values()
            .filter(|note| !note.is_deleted && criteria.matches(note))
            .cloned()
            .collect();
        let count = matches.len();
        criteria.sort(&mut matches);
        let page = criteria.page(matches);

        info!(count, returned = page.len(), "Search completed");
        Ok(json!({ "response": { "count": count, "note": page } }))
    }

    /// Looks up a live note and checks it belongs to the requester.
    fn owned_note(&self, id: &str, requester: &str) -> Result<&Note, NoteError> {
        let note = self
            .notes
            .get(id)
            .filter(|note| !note.is_deleted)
            .ok_or_else(|| {
                debug!(note_id = %id, "Note not found");
                NoteError::NotFound(id.to_string())
            })?;
        if note.user_id != requester {
            error!(note_id = %id, "Note is owned by another user");
            return Err(NoteError::Unauthorized(
                "note belongs to another user".to_string(),
            ));
        }
        Ok(note)
    }
}

fn requesting_user(envelope: &RequestEnvelope) -> Result<&str, NoteError> {
    envelope
        .requested_by
        .as_deref()
        .ok_or_else(|| NoteError::Unauthorized("requesting user is unknown".to_string()))
}

fn note_id(envelope: &RequestEnvelope) -> Result<&str, NoteError> {
    envelope
        .note_id
        .as_deref()
        .ok_or_else(|| NoteError::Internal("envelope carries no note id".to_string()))
}

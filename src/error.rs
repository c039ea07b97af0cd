use std::time::Duration;

use thiserror::Error;

/// Errors produced while processing a note operation, either by the note
/// actor itself or by the channel machinery between the HTTP layer and
/// the actor.
#[derive(Debug, Clone, Error)]
pub enum NoteError {
    #[error("Note not found: {0}")]
    NotFound(String),
    #[error("Unauthorized note access: {0}")]
    Unauthorized(String),
    #[error("Note validation error: {0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
    #[error("Note actor did not reply within {0:?}")]
    Timeout(Duration),
    #[error("Internal note service error: {0}")]
    Internal(String),
}

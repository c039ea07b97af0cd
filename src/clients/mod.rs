use std::time::Duration;

use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tracing::{debug, instrument};

use crate::error::NoteError;
use crate::messages::{NoteCommand, RequestEnvelope};

/// Client for interacting with the note actor.
///
/// Cheap to clone; every HTTP handler holds one. `dispatch` is an ask:
/// it sends the envelope together with a oneshot responder and waits a
/// bounded time for the actor's reply.
#[derive(Clone)]
pub struct NoteClient {
    sender: mpsc::Sender<NoteCommand>,
    ask_timeout: Duration,
}

impl NoteClient {
    pub fn new(sender: mpsc::Sender<NoteCommand>, ask_timeout: Duration) -> Self {
        Self { sender, ask_timeout }
    }

    #[instrument(
        skip(self, envelope),
        fields(operation = %envelope.operation, request_id = %envelope.request_id)
    )]
    pub async fn dispatch(&self, envelope: RequestEnvelope) -> Result<Value, NoteError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(NoteCommand::Dispatch { envelope, respond_to })
            .await
            .map_err(|_| NoteError::ActorCommunicationError("Actor closed".to_string()))?;

        match timeout(self.ask_timeout, response).await {
            Ok(reply) => {
                reply.map_err(|_| NoteError::ActorCommunicationError("Actor dropped".to_string()))?
            }
            Err(_) => Err(NoteError::Timeout(self.ask_timeout)),
        }
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), NoteError> {
        debug!("Sending shutdown request");
        self.sender
            .send(NoteCommand::Shutdown)
            .await
            .map_err(|_| NoteError::ActorCommunicationError("Actor closed".to_string()))
    }

    /// True while the actor end of the channel is still alive.
    pub fn is_connected(&self) -> bool {
        !self.sender.is_closed()
    }

    #[cfg(test)]
    pub async fn note_count(&self) -> Result<usize, NoteError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(NoteCommand::GetNoteCount { respond_to })
            .await
            .map_err(|_| NoteError::ActorCommunicationError("Actor closed".to_string()))?;
        response
            .await
            .map_err(|_| NoteError::ActorCommunicationError("Actor dropped".to_string()))?
    }
}

//! # Mock Framework
//!
//! Utilities for testing the HTTP layer in isolation.
//!
//! Use [`create_mock_client`] to get a [`NoteClient`] and the receiver
//! end of its channel. Tests stand in for the note actor: they inspect
//! the envelopes arriving on the channel and reply through the oneshot,
//! which makes success, failure, and delay scenarios deterministic.

use std::time::Duration;

use serde_json::Value;
use tokio::sync::{mpsc, oneshot};

use crate::clients::NoteClient;
use crate::error::NoteError;
use crate::messages::{NoteCommand, RequestEnvelope};

pub fn create_mock_client(
    buffer_size: usize,
    ask_timeout: Duration,
) -> (NoteClient, mpsc::Receiver<NoteCommand>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (NoteClient::new(sender, ask_timeout), receiver)
}

/// Helper to verify that the next message is a Dispatch request
pub async fn expect_dispatch(
    receiver: &mut mpsc::Receiver<NoteCommand>,
) -> Option<(RequestEnvelope, oneshot::Sender<Result<Value, NoteError>>)> {
    match receiver.recv().await {
        Some(NoteCommand::Dispatch {
            envelope,
            respond_to,
        }) => Some((envelope, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::ActorOperation;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client(10, Duration::from_secs(1));

        let dispatch_task = tokio::spawn(async move {
            let envelope = RequestEnvelope::new(ActorOperation::GetNote, "test")
                .with_note_id("note-1");
            client.dispatch(envelope).await
        });

        let (envelope, responder) = expect_dispatch(&mut receiver)
            .await
            .expect("Expected Dispatch request");
        assert_eq!(envelope.operation, ActorOperation::GetNote);
        assert_eq!(envelope.note_id.as_deref(), Some("note-1"));
        responder.send(Ok(json!({"response": "SUCCESS"}))).unwrap();

        let result = dispatch_task.await.unwrap().unwrap();
        assert_eq!(result, json!({"response": "SUCCESS"}));
    }
}

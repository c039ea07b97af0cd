use tracing::{error, info, instrument};

use crate::actors::NoteService;
use crate::clients::NoteClient;
use crate::config::GatewayConfig;

/// Coordinator owning the note actor's lifecycle.
///
/// Starts the actor, hands out its client, and tracks the spawned task
/// so shutdown can wait for it.
pub struct NoteSystem {
    pub note_client: NoteClient,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl NoteSystem {
    #[instrument(name = "note_system", skip(config))]
    pub fn new(config: &GatewayConfig) -> Self {
        let mut handles = Vec::new();

        info!("Starting note system");

        let (note_service, note_client) =
            NoteService::new(config.mailbox_capacity, config.actor_timeout());
        handles.push(tokio::spawn(note_service.run()));

        info!("Note system started successfully");

        Self {
            note_client,
            handles,
        }
    }

    /// Gracefully shut down the actor system.
    ///
    /// Join errors are logged rather than propagated so shutdown cannot
    /// hang on a failed task.
    #[instrument(skip(self))]
    pub async fn shutdown(self) {
        info!("Shutting down note system");

        let _ = self.note_client.shutdown().await;

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = ?e, "Service shutdown error");
            }
        }

        info!("Note system shutdown complete");
    }
}

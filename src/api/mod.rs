//! HTTP controller surface of the notes gateway.
//!
//! Handlers hold no business logic. Each one validates the incoming
//! request, enriches it into a [`RequestEnvelope`](crate::messages::RequestEnvelope),
//! dispatches it to the note actor, and wraps the reply in the response
//! envelope.

pub mod auth;
pub mod handlers;
pub mod response;
pub mod routes;

use axum::http::HeaderMap;
use uuid::Uuid;

use crate::clients::NoteClient;
use crate::config::GatewayConfig;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Shared state handed to every handler.
pub struct AppState {
    pub note_client: NoteClient,
    pub config: GatewayConfig,
}

impl AppState {
    pub fn new(note_client: NoteClient, config: GatewayConfig) -> Self {
        Self {
            note_client,
            config,
        }
    }
}

/// Correlation id of the in-flight request.
///
/// The request-id layer sets the header before handlers run; the
/// fallback covers direct handler calls in tests.
pub fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(String::from)
        .unwrap_or_else(|| Uuid::now_v7().to_string())
}

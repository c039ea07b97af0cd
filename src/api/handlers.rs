//! Request handlers for the note endpoints.
//!
//! Each handler does the same four steps: validate what little the
//! gateway checks itself, enrich the request into an envelope (operation,
//! correlation id, environment, caller, note id), dispatch to the note
//! actor, and wrap the actor's reply. Storage and ownership rules live
//! in the actor.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::api::auth::AuthContext;
use crate::api::response::{ApiError, ResponseEnvelope};
use crate::api::{request_id, AppState};
use crate::messages::{ActorOperation, RequestEnvelope};
use crate::validation::{validate_note_id, validate_note_payload};

/// Standard body wrapper: body-carrying endpoints accept `{"request": {...}}`.
#[derive(Debug, Default, Deserialize)]
pub struct ApiRequestBody {
    #[serde(default)]
    pub request: Value,
}

type JsonBody = Result<Json<ApiRequestBody>, JsonRejection>;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub actor_connected: bool,
}

pub async fn create_note(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    headers: HeaderMap,
    body: JsonBody,
) -> Result<Json<ResponseEnvelope>, ApiError> {
    const OP: ActorOperation = ActorOperation::CreateNote;
    let msgid = request_id(&headers);
    info!(request_id = %msgid, "Create note request");

    let payload = request_member(body, OP, &msgid)?;
    validate_note_payload(&payload).map_err(|e| ApiError::validation(OP, &msgid, e))?;

    let envelope = RequestEnvelope::new(OP, state.config.environment.as_str())
        .with_request_id(msgid.clone())
        .with_requested_by(auth.user_id)
        .with_payload(payload);
    let result = dispatch(&state, OP, &msgid, envelope).await?;
    Ok(Json(ResponseEnvelope::success(OP, &msgid, result)))
}

pub async fn update_note(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    headers: HeaderMap,
    Path(note_id): Path<String>,
    body: JsonBody,
) -> Result<Json<ResponseEnvelope>, ApiError> {
    const OP: ActorOperation = ActorOperation::UpdateNote;
    let msgid = request_id(&headers);
    info!(request_id = %msgid, note_id = %note_id, "Update note request");

    validate_note_id(&note_id).map_err(|e| ApiError::validation(OP, &msgid, e))?;
    let payload = request_member(body, OP, &msgid)?;

    let envelope = RequestEnvelope::new(OP, state.config.environment.as_str())
        .with_request_id(msgid.clone())
        .with_requested_by(auth.user_id)
        .with_note_id(note_id)
        .with_payload(payload);
    let result = dispatch(&state, OP, &msgid, envelope).await?;
    Ok(Json(ResponseEnvelope::success(OP, &msgid, result)))
}

pub async fn get_note(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    headers: HeaderMap,
    Path(note_id): Path<String>,
) -> Result<Json<ResponseEnvelope>, ApiError> {
    const OP: ActorOperation = ActorOperation::GetNote;
    let msgid = request_id(&headers);
    info!(request_id = %msgid, note_id = %note_id, "Get note request");

    validate_note_id(&note_id).map_err(|e| ApiError::validation(OP, &msgid, e))?;

    let envelope = RequestEnvelope::new(OP, state.config.environment.as_str())
        .with_request_id(msgid.clone())
        .with_requested_by(auth.user_id)
        .with_note_id(note_id);
    let result = dispatch(&state, OP, &msgid, envelope).await?;
    Ok(Json(ResponseEnvelope::success(OP, &msgid, result)))
}

pub async fn search_note(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    headers: HeaderMap,
    body: JsonBody,
) -> Result<Json<ResponseEnvelope>, ApiError> {
    const OP: ActorOperation = ActorOperation::SearchNote;
    let msgid = request_id(&headers);
    info!(request_id = %msgid, "Search note request");

    let payload = request_member(body, OP, &msgid)?;

    let envelope = RequestEnvelope::new(OP, state.config.environment.as_str())
        .with_request_id(msgid.clone())
        .with_requested_by(auth.user_id)
        .with_payload(payload);
    let result = dispatch(&state, OP, &msgid, envelope).await?;
    Ok(Json(ResponseEnvelope::success(OP, &msgid, result)))
}

pub async fn delete_note(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    headers: HeaderMap,
    Path(note_id): Path<String>,
) -> Result<Json<ResponseEnvelope>, ApiError> {
    const OP: ActorOperation = ActorOperation::DeleteNote;
    let msgid = request_id(&headers);
    info!(request_id = %msgid, note_id = %note_id, "Delete note request");

    validate_note_id(&note_id).map_err(|e| ApiError::validation(OP, &msgid, e))?;

    let envelope = RequestEnvelope::new(OP, state.config.environment.as_str())
        .with_request_id(msgid.clone())
        .with_requested_by(auth.user_id)
        .with_note_id(note_id);
    let result = dispatch(&state, OP, &msgid, envelope).await?;
    Ok(Json(ResponseEnvelope::success(OP, &msgid, result)))
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        actor_connected: state.note_client.is_connected(),
    })
}

/// Unwraps the JSON body and pulls out its `request` member. A missing
/// or non-object member becomes an empty object; create validation then
/// rejects it while search treats it as match-all.
fn request_member(
    body: JsonBody,
    operation: ActorOperation,
    msgid: &str,
) -> Result<Value, ApiError> {
    let Json(body) =
        body.map_err(|rejection| ApiError::malformed_body(operation, msgid, rejection.to_string()))?;
    Ok(match body.request {
        Value::Object(map) => Value::Object(map),
        _ => Value::Object(Default::default()),
    })
}

async fn dispatch(
    state: &AppState,
    operation: ActorOperation,
    msgid: &str,
    envelope: RequestEnvelope,
) -> Result<Value, ApiError> {
    state
        .note_client
        .dispatch(envelope)
        .await
        .map_err(|e| ApiError::from_note_error(operation, msgid, e))
}

//! Route table and middleware stack.

use std::sync::Arc;

use axum::http::Request;
use axum::middleware;
use axum::routing::{delete, get, patch, post};
use axum::Router;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::api::{auth, handlers, AppState};

/// Request ids are UUID v7 so they sort by time in logs.
#[derive(Clone, Copy, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// Builds the gateway router.
///
/// Layer order matters: the request-id layer runs first so the trace
/// and auth layers, and every handler, see the correlation id; the
/// propagate layer copies it onto the response.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/v1/note/create", post(handlers::create_note))
        .route("/v1/note/update/:note_id", patch(handlers::update_note))
        .route("/v1/note/read/:note_id", get(handlers::get_note))
        .route("/v1/note/search", post(handlers::search_note))
        .route("/v1/note/delete/:note_id", delete(handlers::delete_note))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7::default()))
        .with_state(state)
}

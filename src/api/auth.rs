//! Caller identity and the optional bearer-token gate.
//!
//! The gateway trusts the upstream auth proxy: the caller's user id
//! arrives in the `x-authenticated-userid` header. A missing id is not
//! an HTTP error here; operations that need an owner are rejected by
//! the note actor instead.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::Response;
use tracing::warn;

use crate::api::response::ApiError;
use crate::api::{request_id, AppState};

pub const AUTHENTICATED_USER_HEADER: &str = "x-authenticated-userid";

const BEARER_PREFIX: &str = "Bearer ";
const HEALTH_PATH: &str = "/health";

/// Identity attached to every request as an extension.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    pub user_id: Option<String>,
}

pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if request.uri().path() == HEALTH_PATH {
        request.extensions_mut().insert(AuthContext::default());
        return Ok(next.run(request).await);
    }

    if let Some(expected) = state.config.auth_token.as_deref() {
        if bearer_token(request.headers()) != Some(expected) {
            warn!(path = %request.uri().path(), "Rejecting request without a valid bearer token");
            return Err(ApiError::missing_token(&request_id(request.headers())));
        }
    }

    let context = AuthContext {
        user_id: authenticated_user(request.headers()),
    };
    request.extensions_mut().insert(context);
    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn authenticated_user(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHENTICATED_USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(String::from)
}

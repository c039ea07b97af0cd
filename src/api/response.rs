//! Response envelope shared by every note endpoint.
//!
//! Successful and failed calls alike return the same shape: an API id,
//! version, timestamp, correlation params, a response code and a result
//! object. Errors map onto HTTP statuses here and nowhere else.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::error::NoteError;
use crate::messages::ActorOperation;
use crate::validation::ValidationError;

pub const API_VERSION: &str = "v1";

const STATUS_SUCCESS: &str = "success";
const STATUS_FAILED: &str = "failed";

const RESPONSE_OK: &str = "OK";
const RESPONSE_CLIENT_ERROR: &str = "CLIENT_ERROR";
const RESPONSE_UNAUTHORIZED: &str = "UNAUTHORIZED";
const RESPONSE_RESOURCE_NOT_FOUND: &str = "RESOURCE_NOT_FOUND";
const RESPONSE_OPERATION_TIMEOUT: &str = "OPERATION_TIMEOUT";
const RESPONSE_SERVICE_UNAVAILABLE: &str = "SERVICE_UNAVAILABLE";
const RESPONSE_SERVER_ERROR: &str = "SERVER_ERROR";

const ERR_INVALID_REQUEST: &str = "INVALID_REQUEST";
const ERR_UNAUTHORIZED_USER: &str = "UNAUTHORIZED_USER";
const ERR_INVALID_NOTE_ID: &str = "INVALID_NOTE_ID";
const ERR_OPERATION_TIMEOUT: &str = "OPERATION_TIMEOUT";
const ERR_SERVICE_UNAVAILABLE: &str = "SERVICE_UNAVAILABLE";
const ERR_INTERNAL: &str = "INTERNAL_ERROR";

/// Generic id stamped on failures raised before an operation is known,
/// such as auth rejections.
const GENERIC_API_ID: &str = "api.note";

/// Correlation metadata carried by every response. `msgid` echoes the
/// request id; `resmsgid` is fresh per response.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseParams {
    pub resmsgid: String,
    pub msgid: String,
    pub status: String,
    pub err: Option<String>,
    pub errmsg: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub id: String,
    pub ver: String,
    pub ts: DateTime<Utc>,
    pub params: ResponseParams,
    pub response_code: String,
    pub result: Value,
}

impl ResponseEnvelope {
    pub fn success(operation: ActorOperation, msgid: &str, result: Value) -> Self {
        Self {
            id: operation.api_id().to_string(),
            ver: API_VERSION.to_string(),
            ts: Utc::now(),
            params: ResponseParams {
                resmsgid: Uuid::now_v7().to_string(),
                msgid: msgid.to_string(),
                status: STATUS_SUCCESS.to_string(),
                err: None,
                errmsg: None,
            },
            response_code: RESPONSE_OK.to_string(),
            result,
        }
    }

    fn failure(
        api_id: &str,
        msgid: &str,
        response_code: &str,
        err: &str,
        errmsg: String,
    ) -> Self {
        Self {
            id: api_id.to_string(),
            ver: API_VERSION.to_string(),
            ts: Utc::now(),
            params: ResponseParams {
                resmsgid: Uuid::now_v7().to_string(),
                msgid: msgid.to_string(),
                status: STATUS_FAILED.to_string(),
                err: Some(err.to_string()),
                errmsg: Some(errmsg),
            },
            response_code: response_code.to_string(),
            result: Value::Object(Default::default()),
        }
    }
}

/// An error ready to leave the API: an HTTP status plus the failure
/// envelope it renders to.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    response_code: &'static str,
    err: &'static str,
    errmsg: String,
    api_id: String,
    msgid: String,
}

impl ApiError {
    pub fn validation(operation: ActorOperation, msgid: &str, err: ValidationError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            response_code: RESPONSE_CLIENT_ERROR,
            err: ERR_INVALID_REQUEST,
            errmsg: err.to_string(),
            api_id: operation.api_id().to_string(),
            msgid: msgid.to_string(),
        }
    }

    pub fn malformed_body(operation: ActorOperation, msgid: &str, detail: String) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            response_code: RESPONSE_CLIENT_ERROR,
            err: ERR_INVALID_REQUEST,
            errmsg: detail,
            api_id: operation.api_id().to_string(),
            msgid: msgid.to_string(),
        }
    }

    pub fn missing_token(msgid: &str) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            response_code: RESPONSE_UNAUTHORIZED,
            err: ERR_UNAUTHORIZED_USER,
            errmsg: "a valid bearer token is required".to_string(),
            api_id: GENERIC_API_ID.to_string(),
            msgid: msgid.to_string(),
        }
    }

    pub fn from_note_error(operation: ActorOperation, msgid: &str, err: NoteError) -> Self {
        let (status, response_code, code) = match &err {
            NoteError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                RESPONSE_RESOURCE_NOT_FOUND,
                ERR_INVALID_NOTE_ID,
            ),
            NoteError::Unauthorized(_) => (
                StatusCode::UNAUTHORIZED,
                RESPONSE_UNAUTHORIZED,
                ERR_UNAUTHORIZED_USER,
            ),
            NoteError::ValidationError(_) => (
                StatusCode::BAD_REQUEST,
                RESPONSE_CLIENT_ERROR,
                ERR_INVALID_REQUEST,
            ),
            NoteError::Timeout(_) => (
                StatusCode::GATEWAY_TIMEOUT,
                RESPONSE_OPERATION_TIMEOUT,
                ERR_OPERATION_TIMEOUT,
            ),
            NoteError::ActorCommunicationError(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                RESPONSE_SERVICE_UNAVAILABLE,
                ERR_SERVICE_UNAVAILABLE,
            ),
            NoteError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                RESPONSE_SERVER_ERROR,
                ERR_INTERNAL,
            ),
        };
        Self {
            status,
            response_code,
            err: code,
            errmsg: err.to_string(),
            api_id: operation.api_id().to_string(),
            msgid: msgid.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status;
        let envelope = ResponseEnvelope::failure(
            &self.api_id,
            &self.msgid,
            self.response_code,
            self.err,
            self.errmsg,
        );
        (status, Json(envelope)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope_shape() {
        let envelope =
            ResponseEnvelope::success(ActorOperation::CreateNote, "req-1", json!({"id": "n1"}));
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(value["id"], "api.note.create");
        assert_eq!(value["ver"], "v1");
        assert_eq!(value["responseCode"], "OK");
        assert_eq!(value["params"]["msgid"], "req-1");
        assert_eq!(value["params"]["status"], "success");
        assert!(value["params"]["err"].is_null());
        assert!(value["params"]["errmsg"].is_null());
        assert_eq!(value["result"]["id"], "n1");
        assert!(Uuid::parse_str(value["params"]["resmsgid"].as_str().unwrap()).is_ok());
    }

    #[test]
    fn test_validation_error_maps_to_client_error() {
        let err = ApiError::validation(
            ActorOperation::CreateNote,
            "req-1",
            ValidationError::MissingField { field: "userId" },
        );
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let envelope = ResponseEnvelope::failure(
            &err.api_id,
            &err.msgid,
            err.response_code,
            err.err,
            err.errmsg,
        );
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["responseCode"], "CLIENT_ERROR");
        assert_eq!(value["params"]["status"], "failed");
        assert_eq!(value["params"]["err"], "INVALID_REQUEST");
        assert_eq!(value["params"]["errmsg"], "userId is required");
    }

    #[test]
    fn test_note_error_status_mapping() {
        let cases = [
            (NoteError::NotFound("n".into()), StatusCode::NOT_FOUND),
            (NoteError::Unauthorized("u".into()), StatusCode::UNAUTHORIZED),
            (NoteError::ValidationError("v".into()), StatusCode::BAD_REQUEST),
            (
                NoteError::Timeout(std::time::Duration::from_secs(10)),
                StatusCode::GATEWAY_TIMEOUT,
            ),
            (
                NoteError::ActorCommunicationError("a".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                NoteError::Internal("i".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            let api_err = ApiError::from_note_error(ActorOperation::GetNote, "req-1", err);
            assert_eq!(api_err.status, expected);
        }
    }
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Envelope used by the session endpoints.
#[derive(Serialize, Deserialize)]
pub struct JsonResponse {
    pub status: String,
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    fn build(code: StatusCode, msg: &str) -> impl IntoResponse {
        let success = code.is_success();
        (
            code,
            Json(JsonResponse {
                status: if success { "success" } else { "error" }.to_string(),
                success,
                message: msg.to_string(),
            }),
        )
    }

    pub fn success(msg: &str) -> impl IntoResponse {
        Self::build(StatusCode::OK, msg)
    }

    pub fn unauthorized(msg: &str) -> impl IntoResponse {
        Self::build(StatusCode::UNAUTHORIZED, msg)
    }

    pub fn bad_gateway(msg: &str) -> impl IntoResponse {
        Self::build(StatusCode::BAD_GATEWAY, msg)
    }

    pub fn redirect_to_login(next: &str) -> impl IntoResponse {
        let redirect_url = format!("/auth/login?next={}", urlencoding::encode(next));
        Redirect::to(&redirect_url).into_response()
    }
}

/// Body returned by the upload relay when the destination accepted the upload.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct RelaySuccess {
    pub success: bool,
    pub message: String,
    pub data: Value,
}

impl RelaySuccess {
    pub fn new(message: String, data: Value) -> Self {
        Self {
            success: true,
            message,
            data,
        }
    }
}

impl IntoResponse for RelaySuccess {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Body returned by the upload relay for every failure.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RelayFailure {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

use axum::{
    extract::{Json, State},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::state::AppState;

/// `GET /api/workflows`: the selectable workflows, without destinations or
/// credentials.
pub async fn list_workflows(State(app_state): State<AppState>) -> Response {
    let workflows = app_state.registry.list_public_workflows();
    Json(json!({ "success": true, "workflows": workflows })).into_response()
}

use axum::{
    extract::{rejection::QueryRejection, FromRequest, Multipart, Query, Request, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::Instrument;
use uuid::Uuid;

use crate::relay::{service, RelayError};
use crate::responses::RelaySuccess;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    #[serde(rename = "workflowId")]
    pub workflow_id: Option<String>,
}

/// `POST /api/upload?workflowId=...`
///
/// Relays a multipart body to the workflow's webhook with its bearer token.
/// The body is only read once the workflow has been resolved. An unparsable
/// query string (e.g. a repeated `workflowId`) counts as a missing id.
pub async fn handle_upload(
    State(app_state): State<AppState>,
    query: Result<Query<UploadQuery>, QueryRejection>,
    request: Request,
) -> Response {
    let workflow_id = match query {
        Ok(Query(query)) => query.workflow_id,
        Err(rejection) => {
            tracing::debug!(error = %rejection.body_text(), "unparsable upload query");
            None
        }
    };
    let span = tracing::info_span!(
        "upload",
        upload_id = %Uuid::new_v4(),
        workflow_id = workflow_id.as_deref().unwrap_or_default(),
    );

    async move {
        match relay(&app_state, workflow_id.as_deref(), request).await {
            Ok(success) => {
                tracing::info!("upload relayed");
                success.into_response()
            }
            Err(err) => {
                let detail = err.detail().unwrap_or_default();
                if err.is_client_error() {
                    tracing::info!(status = err.status().as_u16(), error = %err, detail, "upload rejected");
                } else {
                    tracing::error!(status = err.status().as_u16(), error = %err, detail, "upload failed");
                }
                err.into_response()
            }
        }
    }
    .instrument(span)
    .await
}

async fn relay(
    app_state: &AppState,
    workflow_id: Option<&str>,
    request: Request,
) -> Result<RelaySuccess, RelayError> {
    let workflow = service::resolve_workflow(app_state.registry.as_ref(), workflow_id)?;

    let multipart = Multipart::from_request(request, &())
        .await
        .map_err(|rejection| RelayError::upload_failed(rejection.body_text()))?;
    let payload = service::read_payload(multipart, app_state.config.upload_max_bytes).await?;

    service::forward_upload(app_state.forwarder.as_ref(), &workflow, payload).await
}

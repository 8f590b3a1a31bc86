use axum::extract::{multipart::MultipartError, Multipart};
use axum::http::StatusCode;
use serde_json::{json, Value};

use crate::models::workflow::WorkflowDescriptor;
use crate::registry::WorkflowRegistry;
use crate::relay::RelayError;
use crate::responses::RelaySuccess;
use crate::services::webhook_forwarder::{
    ForwardError, ForwardPart, ForwardPayload, ForwardResponse, WebhookForwarder,
};
use crate::utils::redact::redact_secrets;

/// Resolves the workflow named in the query string. A missing or blank id is
/// rejected before the registry is consulted.
pub fn resolve_workflow(
    registry: &dyn WorkflowRegistry,
    workflow_id: Option<&str>,
) -> Result<WorkflowDescriptor, RelayError> {
    let workflow_id = workflow_id
        .filter(|id| !id.is_empty())
        .ok_or(RelayError::MissingParameter)?;

    let workflow = registry
        .get_workflow_by_id(workflow_id)
        .ok_or(RelayError::NotFound)?;

    if !workflow.is_forwardable() {
        return Err(RelayError::Misconfigured);
    }

    Ok(workflow)
}

fn multipart_failure(err: MultipartError, limit: Option<u64>) -> RelayError {
    match limit {
        Some(limit) if err.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            RelayError::PayloadTooLarge { limit }
        }
        _ => RelayError::upload_failed(err.body_text()),
    }
}

/// Buffers every part of the inbound body. Part names, file names and content
/// types are kept; nothing is inspected.
pub async fn read_payload(
    mut multipart: Multipart,
    limit: Option<u64>,
) -> Result<ForwardPayload, RelayError> {
    let mut payload = ForwardPayload::default();
    let mut total: u64 = 0;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_failure(e, limit))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);

        let mut data = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| multipart_failure(e, limit))?
        {
            total += chunk.len() as u64;
            if let Some(limit) = limit.filter(|limit| total > *limit) {
                tracing::warn!(total, limit, "upload exceeds server-side ceiling");
                return Err(RelayError::PayloadTooLarge { limit });
            }
            data.extend_from_slice(&chunk);
        }

        tracing::debug!(part = %name, bytes = data.len(), "buffered multipart part");
        payload.parts.push(ForwardPart {
            name,
            file_name,
            content_type,
            data: data.into(),
        });
    }

    Ok(payload)
}

/// Maps the destination's answer onto the relay contract.
pub fn map_response(
    workflow: &WorkflowDescriptor,
    response: ForwardResponse,
) -> Result<RelaySuccess, RelayError> {
    if !response.status.is_success() {
        return Err(RelayError::Destination {
            status: response.status,
            status_text: response
                .status
                .canonical_reason()
                .unwrap_or_default()
                .to_string(),
            details: String::from_utf8_lossy(&response.body).into_owned(),
        });
    }

    let data = serde_json::from_slice::<Value>(&response.body).unwrap_or_else(|_| json!({}));
    Ok(RelaySuccess::new(
        format!("Successfully uploaded to {}", workflow.name),
        data,
    ))
}

/// Strips the workflow's credential and destination from any text that is
/// about to leave the relay.
pub fn redact_error(err: RelayError, workflow: &WorkflowDescriptor) -> RelayError {
    let secrets = [workflow.bearer_token.as_str(), workflow.webhook_url.as_str()];
    match err {
        RelayError::Destination {
            status,
            status_text,
            details,
        } => RelayError::Destination {
            status,
            status_text,
            details: redact_secrets(&details, &secrets),
        },
        RelayError::UploadFailed { message } => RelayError::UploadFailed {
            message: redact_secrets(&message, &secrets),
        },
        other => other,
    }
}

/// Forwards an already-read payload and maps the outcome.
pub async fn forward_upload(
    forwarder: &dyn WebhookForwarder,
    workflow: &WorkflowDescriptor,
    payload: ForwardPayload,
) -> Result<RelaySuccess, RelayError> {
    let result = match forwarder.forward(workflow, payload).await {
        Ok(response) => map_response(workflow, response),
        Err(ForwardError::InvalidDestination) => Err(RelayError::Misconfigured),
        Err(err) => Err(RelayError::upload_failed(err.to_string())),
    };
    result.map_err(|err| redact_error(err, workflow))
}

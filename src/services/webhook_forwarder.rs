use async_trait::async_trait;
use axum::body::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode, Url};
use thiserror::Error;

use crate::models::workflow::WorkflowDescriptor;

/// One buffered part of an inbound multipart body, forwarded as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardPart {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForwardPayload {
    pub parts: Vec<ForwardPart>,
}

impl ForwardPayload {
    pub fn total_bytes(&self) -> u64 {
        self.parts.iter().map(|p| p.data.len() as u64).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardResponse {
    pub status: StatusCode,
    /// Raw destination body. Empty when it could not be read.
    pub body: Bytes,
}

#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("webhook URL is not a valid absolute URL")]
    InvalidDestination,
    #[error("part `{part}` has an invalid content type: {reason}")]
    InvalidPart { part: String, reason: String },
    /// The URL is stripped so the destination never leaks into messages.
    #[error("{0}")]
    Http(reqwest::Error),
}

impl From<reqwest::Error> for ForwardError {
    fn from(err: reqwest::Error) -> Self {
        ForwardError::Http(err.without_url())
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WebhookForwarder: Send + Sync {
    /// POSTs the payload to the workflow's webhook with its bearer token.
    async fn forward(
        &self,
        workflow: &WorkflowDescriptor,
        payload: ForwardPayload,
    ) -> Result<ForwardResponse, ForwardError>;
}

pub struct ReqwestWebhookForwarder {
    pub client: Client,
}

impl ReqwestWebhookForwarder {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn build_form(payload: ForwardPayload) -> Result<Form, ForwardError> {
    let mut form = Form::new();
    for part in payload.parts {
        let mut body = Part::bytes(Vec::from(part.data));
        if let Some(file_name) = part.file_name {
            body = body.file_name(file_name);
        }
        if let Some(content_type) = part.content_type.as_deref() {
            body = body
                .mime_str(content_type)
                .map_err(|e| ForwardError::InvalidPart {
                    part: part.name.clone(),
                    reason: e.without_url().to_string(),
                })?;
        }
        form = form.part(part.name, body);
    }
    Ok(form)
}

#[async_trait]
impl WebhookForwarder for ReqwestWebhookForwarder {
    async fn forward(
        &self,
        workflow: &WorkflowDescriptor,
        payload: ForwardPayload,
    ) -> Result<ForwardResponse, ForwardError> {
        let url = Url::parse(&workflow.webhook_url).map_err(|_| ForwardError::InvalidDestination)?;
        let part_count = payload.parts.len();
        let total_bytes = payload.total_bytes();
        let form = build_form(payload)?;

        tracing::info!(
            workflow_id = %workflow.id,
            destination_host = url.host_str().unwrap_or_default(),
            part_count,
            total_bytes,
            "forwarding upload to webhook"
        );

        let res = self
            .client
            .post(url)
            .bearer_auth(&workflow.bearer_token)
            .multipart(form)
            .send()
            .await?;

        let status = res.status();
        let body = res.bytes().await.unwrap_or_default();

        tracing::info!(workflow_id = %workflow.id, status = status.as_u16(), "webhook responded");

        Ok(ForwardResponse { status, body })
    }
}

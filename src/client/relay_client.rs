use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::client::size_guard::SelectedFile;
use crate::models::workflow::PublicWorkflow;
use crate::responses::RelaySuccess;

#[derive(Debug, Error)]
pub enum RelayClientError {
    /// The relay answered with an error; `message` is its `error` field.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
    #[error("Upload failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Relay returned an invalid response: {0}")]
    InvalidResponse(String),
    /// Rejected locally before anything was sent.
    #[error("{name} cannot be uploaded: {reason}")]
    InvalidFile { name: String, reason: String },
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RelayClient: Send + Sync {
    async fn list_workflows(&self) -> Result<Vec<PublicWorkflow>, RelayClientError>;

    /// Sends every file as one multipart body, parts named `file0`, `file1`, ...
    async fn upload(
        &self,
        workflow_id: &str,
        files: &[SelectedFile],
    ) -> Result<RelaySuccess, RelayClientError>;
}

pub struct HttpRelayClient {
    pub client: Client,
    pub base_url: String,
}

#[derive(Deserialize)]
struct WorkflowList {
    workflows: Vec<PublicWorkflow>,
}

impl HttpRelayClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

fn upload_form(files: &[SelectedFile]) -> Result<Form, RelayClientError> {
    let mut form = Form::new();
    for (index, file) in files.iter().enumerate() {
        let mut part = Part::bytes(file.data.to_vec()).file_name(file.name.clone());
        if let Some(content_type) = file.content_type.as_deref() {
            part = part
                .mime_str(content_type)
                .map_err(|_| RelayClientError::InvalidFile {
                    name: file.name.clone(),
                    reason: format!("invalid content type `{content_type}`"),
                })?;
        }
        form = form.part(format!("file{index}"), part);
    }
    Ok(form)
}

#[async_trait]
impl RelayClient for HttpRelayClient {
    async fn list_workflows(&self) -> Result<Vec<PublicWorkflow>, RelayClientError> {
        let res = self
            .client
            .get(format!("{}/api/workflows", self.base_url))
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(RelayClientError::Rejected {
                status: res.status(),
                message: format!(
                    "Failed to load workflows: {}",
                    res.status().canonical_reason().unwrap_or_default()
                ),
            });
        }

        let list: WorkflowList = res
            .json()
            .await
            .map_err(|e| RelayClientError::InvalidResponse(e.to_string()))?;
        Ok(list.workflows)
    }

    async fn upload(
        &self,
        workflow_id: &str,
        files: &[SelectedFile],
    ) -> Result<RelaySuccess, RelayClientError> {
        let res = self
            .client
            .post(format!("{}/api/upload", self.base_url))
            .query(&[("workflowId", workflow_id)])
            .multipart(upload_form(files)?)
            .send()
            .await?;

        let status = res.status();
        let body: Value = res.json().await.unwrap_or(Value::Null);

        if !status.is_success() {
            let message = body
                .get("error")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| {
                    format!(
                        "Upload failed: {}",
                        status.canonical_reason().unwrap_or_default()
                    )
                });
            return Err(RelayClientError::Rejected { status, message });
        }

        serde_json::from_value(body).map_err(|e| RelayClientError::InvalidResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{
        Method::{GET, POST},
        MockServer,
    };
    use serde_json::json;

    fn files() -> Vec<SelectedFile> {
        vec![
            SelectedFile::new("a.txt", "alpha").with_content_type("text/plain"),
            SelectedFile::new("b.bin", vec![1u8, 2, 3]),
        ]
    }

    #[tokio::test]
    async fn lists_public_workflows() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/workflows");
                then.status(200).json_body(json!({
                    "success": true,
                    "workflows": [{"id": "workflow_1", "name": "Invoices", "description": ""}]
                }));
            })
            .await;

        let client = HttpRelayClient::new(Client::new(), server.base_url());
        let workflows = client.list_workflows().await.unwrap();
        assert_eq!(workflows.len(), 1);
        assert_eq!(workflows[0].name, "Invoices");
    }

    #[tokio::test]
    async fn upload_names_parts_positionally() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/upload")
                    .query_param("workflowId", "workflow_1")
                    .body_contains("name=\"file0\"; filename=\"a.txt\"")
                    .body_contains("name=\"file1\"; filename=\"b.bin\"");
                then.status(200).json_body(json!({
                    "success": true,
                    "message": "Successfully uploaded to Invoices",
                    "data": {}
                }));
            })
            .await;

        let client = HttpRelayClient::new(Client::new(), format!("{}/", server.base_url()));
        let result = client.upload("workflow_1", &files()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(result.message, "Successfully uploaded to Invoices");
    }

    #[tokio::test]
    async fn bad_content_type_fails_before_sending() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/upload");
                then.status(200);
            })
            .await;

        let client = HttpRelayClient::new(Client::new(), server.base_url());
        let files = vec![SelectedFile::new("a.txt", "alpha").with_content_type("not a mime")];
        let err = client.upload("workflow_1", &files).await.unwrap_err();

        mock.assert_hits_async(0).await;
        assert!(matches!(err, RelayClientError::InvalidFile { ref name, .. } if name == "a.txt"));
        assert_eq!(
            err.to_string(),
            "a.txt cannot be uploaded: invalid content type `not a mime`"
        );
    }

    #[tokio::test]
    async fn relay_error_field_becomes_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/upload");
                then.status(404).json_body(json!({"error": "Workflow not found"}));
            })
            .await;

        let client = HttpRelayClient::new(Client::new(), server.base_url());
        let err = client.upload("workflow_9", &files()).await.unwrap_err();
        assert_eq!(err.to_string(), "Workflow not found");
        assert!(matches!(err, RelayClientError::Rejected { status, .. } if status == StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn non_json_failure_falls_back_to_status_text() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/upload");
                then.status(502).body("<html>bad gateway</html>");
            })
            .await;

        let client = HttpRelayClient::new(Client::new(), server.base_url());
        let err = client.upload("workflow_1", &files()).await.unwrap_err();
        assert_eq!(err.to_string(), "Upload failed: Bad Gateway");
    }
}

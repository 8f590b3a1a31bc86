use thiserror::Error;

use crate::client::relay_client::{RelayClient, RelayClientError};
use crate::client::size_guard::{
    limit_label, megabytes, SelectedFile, SizeLimitExceeded, UploadBatch,
};
use crate::models::workflow::PublicWorkflow;
use crate::responses::RelaySuccess;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetPhase {
    Idle,
    Selecting,
    Submitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    fn success(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            text: text.into(),
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddFilesError {
    #[error("Select a workflow first")]
    NoWorkflow,
    #[error(transparent)]
    TooLarge(#[from] SizeLimitExceeded),
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Please select at least one file")]
    NoFiles,
    #[error("Please select a workflow")]
    NoWorkflow,
    #[error("Selected workflow not found")]
    UnknownWorkflow,
    #[error(
        "Upload cancelled: Total file size ({} MB) exceeds the {} MB limit.",
        megabytes(.total),
        limit_label(.limit)
    )]
    TooLarge { total: u64, limit: u64 },
    #[error(transparent)]
    Relay(#[from] RelayClientError),
}

#[derive(Debug)]
pub struct UploadReceipt {
    pub workflow_name: String,
    pub file_count: usize,
    pub response: RelaySuccess,
}

/// Workflow picker plus file batch in front of the relay.
///
/// No workflow is selected up front. A failed submission keeps the batch so
/// the user can retry without picking the files again.
pub struct UploadWidget<C: RelayClient> {
    client: C,
    workflows: Vec<PublicWorkflow>,
    selected: Option<String>,
    batch: UploadBatch,
    status: Option<StatusMessage>,
    submitting: bool,
}

impl<C: RelayClient> UploadWidget<C> {
    pub fn new(client: C, workflows: Vec<PublicWorkflow>) -> Self {
        Self {
            client,
            workflows,
            selected: None,
            batch: UploadBatch::default(),
            status: None,
            submitting: false,
        }
    }

    /// Builds the widget from the relay's public workflow listing.
    pub async fn load(client: C) -> Result<Self, RelayClientError> {
        let workflows = client.list_workflows().await?;
        tracing::debug!(count = workflows.len(), "loaded workflows");
        Ok(Self::new(client, workflows))
    }

    pub fn with_batch_limit(mut self, limit: u64) -> Self {
        self.batch.set_limit(limit);
        self
    }

    pub fn workflows(&self) -> &[PublicWorkflow] {
        &self.workflows
    }

    pub fn selected_workflow(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn select_workflow(&mut self, workflow_id: Option<String>) {
        self.selected = workflow_id.filter(|id| !id.is_empty());
    }

    pub fn batch(&self) -> &UploadBatch {
        &self.batch
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn phase(&self) -> WidgetPhase {
        if self.submitting {
            WidgetPhase::Submitting
        } else if self.batch.is_empty() {
            WidgetPhase::Idle
        } else {
            WidgetPhase::Selecting
        }
    }

    /// Adds a picked or dropped set of files. Either all of them are added or
    /// none are.
    pub fn add_files(&mut self, files: Vec<SelectedFile>) -> Result<(), AddFilesError> {
        self.status = None;
        if self.selected.is_none() {
            return Err(self.fail_add(AddFilesError::NoWorkflow));
        }
        self.batch
            .try_add(files)
            .map_err(|e| self.fail_add(AddFilesError::TooLarge(e)))
    }

    fn fail_add(&mut self, err: AddFilesError) -> AddFilesError {
        self.status = Some(StatusMessage::error(err.to_string()));
        err
    }

    pub fn remove_file(&mut self, index: usize) -> Option<SelectedFile> {
        self.batch.remove(index)
    }

    fn validate(&self) -> Result<&PublicWorkflow, SubmitError> {
        if self.batch.is_empty() {
            return Err(SubmitError::NoFiles);
        }
        let selected = self.selected.as_deref().ok_or(SubmitError::NoWorkflow)?;
        let workflow = self
            .workflows
            .iter()
            .find(|w| w.id == selected)
            .ok_or(SubmitError::UnknownWorkflow)?;
        if self.batch.exceeds_limit() {
            return Err(SubmitError::TooLarge {
                total: self.batch.total_bytes(),
                limit: self.batch.limit(),
            });
        }
        Ok(workflow)
    }

    /// Validates the selection and sends the batch to the relay.
    pub async fn submit(&mut self) -> Result<UploadReceipt, SubmitError> {
        self.status = None;
        let workflow = match self.validate() {
            Ok(workflow) => workflow.clone(),
            Err(err) => {
                self.status = Some(StatusMessage::error(err.to_string()));
                return Err(err);
            }
        };

        self.submitting = true;
        let result = self.client.upload(&workflow.id, self.batch.files()).await;
        self.submitting = false;

        match result {
            Ok(response) => {
                let file_count = self.batch.len();
                self.batch.clear();
                self.status = Some(StatusMessage::success(format!(
                    "Successfully uploaded {file_count} file(s) to {}!",
                    workflow.name
                )));
                Ok(UploadReceipt {
                    workflow_name: workflow.name,
                    file_count,
                    response,
                })
            }
            Err(err) => {
                tracing::warn!(workflow_id = %workflow.id, error = %err, "upload failed");
                let err = SubmitError::Relay(err);
                self.status = Some(StatusMessage::error(err.to_string()));
                Err(err)
            }
        }
    }
}

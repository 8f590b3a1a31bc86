use serde::{Deserialize, Serialize};

/// One configured forwarding target. Derived from configuration on every
/// registry read and never stored.
#[derive(Clone, PartialEq, Eq)]
pub struct WorkflowDescriptor {
    pub id: String,
    pub name: String,
    pub description: String,
    pub webhook_url: String,
    pub bearer_token: String,
}

impl WorkflowDescriptor {
    /// A descriptor can only be relayed to when both the destination and the
    /// credential are present.
    pub fn is_forwardable(&self) -> bool {
        !self.webhook_url.trim().is_empty() && !self.bearer_token.trim().is_empty()
    }

    pub fn to_public(&self) -> PublicWorkflow {
        PublicWorkflow {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }
}

impl std::fmt::Debug for WorkflowDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowDescriptor")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("description", &self.description)
            .field("webhook_url", &"[REDACTED]")
            .field("bearer_token", &"[REDACTED]")
            .finish()
    }
}

/// The part of a workflow that may leave the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicWorkflow {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl PublicWorkflow {
    /// Label used in selectors, e.g. `Invoices - Monthly supplier invoices`.
    pub fn label(&self) -> String {
        if self.description.is_empty() {
            self.name.clone()
        } else {
            format!("{} - {}", self.name, self.description)
        }
    }
}

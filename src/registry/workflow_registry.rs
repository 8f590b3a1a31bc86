use crate::models::workflow::{PublicWorkflow, WorkflowDescriptor};

pub trait WorkflowRegistry: Send + Sync {
    /// Every configured workflow, in slot order.
    fn list_workflows(&self) -> Vec<WorkflowDescriptor>;

    fn get_workflow_by_id(&self, id: &str) -> Option<WorkflowDescriptor> {
        self.list_workflows().into_iter().find(|w| w.id == id)
    }

    fn list_public_workflows(&self) -> Vec<PublicWorkflow> {
        self.list_workflows()
            .iter()
            .map(WorkflowDescriptor::to_public)
            .collect()
    }
}

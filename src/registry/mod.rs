pub mod config_workflow_registry;
pub mod workflow_registry;

pub use config_workflow_registry::ConfigWorkflowRegistry;
pub use workflow_registry::WorkflowRegistry;

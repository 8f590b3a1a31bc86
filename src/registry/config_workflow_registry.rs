use std::sync::Arc;

use crate::config::WorkflowSlot;
use crate::models::workflow::WorkflowDescriptor;
use crate::registry::WorkflowRegistry;

/// Registry backed by the `WORKFLOW_{n}_*` configuration slots captured at
/// startup. Descriptors are rebuilt from the slots on every call.
#[derive(Debug, Clone)]
pub struct ConfigWorkflowRegistry {
    slots: Arc<[WorkflowSlot]>,
}

impl ConfigWorkflowRegistry {
    pub fn new(slots: impl Into<Arc<[WorkflowSlot]>>) -> Self {
        Self {
            slots: slots.into(),
        }
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }
}

fn slot_id(position: usize) -> String {
    format!("workflow_{}", position + 1)
}

impl WorkflowRegistry for ConfigWorkflowRegistry {
    fn list_workflows(&self) -> Vec<WorkflowDescriptor> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(position, slot)| {
                let name = slot.name.as_deref().filter(|n| !n.is_empty())?;
                Some(WorkflowDescriptor {
                    id: slot_id(position),
                    name: name.to_string(),
                    description: slot.description.clone().unwrap_or_default(),
                    webhook_url: slot.webhook_url.clone().unwrap_or_default(),
                    bearer_token: slot.bearer_token.clone().unwrap_or_default(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> WorkflowSlot {
        WorkflowSlot {
            name: Some(name.to_string()),
            ..WorkflowSlot::default()
        }
    }

    fn registry() -> ConfigWorkflowRegistry {
        ConfigWorkflowRegistry::new(vec![
            WorkflowSlot {
                name: Some("Invoices".into()),
                description: Some("Supplier invoices".into()),
                webhook_url: Some("https://dest.example/hook".into()),
                bearer_token: Some("secret".into()),
            },
            WorkflowSlot::default(),
            named("Receipts"),
            WorkflowSlot {
                name: Some(String::new()),
                webhook_url: Some("https://dest.example/empty-name".into()),
                ..WorkflowSlot::default()
            },
            named("Contracts"),
        ])
    }

    #[test]
    fn only_named_slots_are_listed_in_slot_order() {
        let ids: Vec<String> = registry()
            .list_workflows()
            .into_iter()
            .map(|w| w.id)
            .collect();
        assert_eq!(ids, vec!["workflow_1", "workflow_3", "workflow_5"]);
    }

    #[test]
    fn unset_values_default_to_empty_strings() {
        let receipts = registry().get_workflow_by_id("workflow_3").unwrap();
        assert_eq!(receipts.name, "Receipts");
        assert_eq!(receipts.description, "");
        assert_eq!(receipts.webhook_url, "");
        assert_eq!(receipts.bearer_token, "");
        assert!(!receipts.is_forwardable());
    }

    #[test]
    fn lookup_returns_matching_descriptor() {
        let invoices = registry().get_workflow_by_id("workflow_1").unwrap();
        assert_eq!(invoices.name, "Invoices");
        assert_eq!(invoices.description, "Supplier invoices");
        assert_eq!(invoices.webhook_url, "https://dest.example/hook");
        assert_eq!(invoices.bearer_token, "secret");
    }

    #[test]
    fn unknown_or_unnamed_ids_are_absent() {
        let registry = registry();
        assert!(registry.get_workflow_by_id("workflow_2").is_none());
        assert!(registry.get_workflow_by_id("workflow_4").is_none());
        assert!(registry.get_workflow_by_id("workflow_99").is_none());
        assert!(registry.get_workflow_by_id("").is_none());
    }

    #[test]
    fn repeated_listing_is_element_wise_equal() {
        let registry = registry();
        assert_eq!(registry.list_workflows(), registry.list_workflows());
    }

    #[test]
    fn public_listing_carries_no_destination() {
        let public = registry().list_public_workflows();
        assert_eq!(public.len(), 3);
        assert_eq!(public[0].label(), "Invoices - Supplier invoices");
        let json = serde_json::to_string(&public).unwrap();
        assert!(!json.contains("secret"));
        assert!(!json.contains("dest.example"));
    }

    #[test]
    fn empty_configuration_lists_nothing() {
        let registry = ConfigWorkflowRegistry::new(Vec::<WorkflowSlot>::new());
        assert_eq!(registry.slot_count(), 0);
        assert!(registry.list_workflows().is_empty());
    }
}

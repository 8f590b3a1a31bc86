use crate::config::Config;
use crate::registry::WorkflowRegistry;
use crate::services::identity::service::IdentityService;
use crate::services::webhook_forwarder::WebhookForwarder;
use crate::utils::jwt::{JwtKeyProvider, JwtKeys};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<dyn WorkflowRegistry>,
    pub forwarder: Arc<dyn WebhookForwarder>,
    pub identity: Arc<dyn IdentityService>,
    pub jwt_keys: Arc<JwtKeys>,
    pub config: Arc<Config>,
}

impl JwtKeyProvider for AppState {
    fn jwt_keys(&self) -> &JwtKeys {
        &self.jwt_keys
    }

    fn jwt_audience(&self) -> &str {
        &self.config.identity.jwt_audience
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::config::{
        tests::{lookup_from, IDENTITY_VARS},
        WorkflowSlot,
    };
    use crate::registry::ConfigWorkflowRegistry;
    use crate::services::identity::mock_identity::MockIdentity;
    use crate::utils::jwt::tests::TEST_SECRET;

    pub(crate) fn test_config(slots: Vec<WorkflowSlot>) -> Config {
        let mut config = Config::from_lookup(lookup_from(&IDENTITY_VARS)).unwrap();
        config.workflow_slots = slots;
        config
    }

    pub(crate) fn test_state_with(
        config: Config,
        forwarder: Arc<dyn WebhookForwarder>,
        identity: Arc<dyn IdentityService>,
    ) -> AppState {
        AppState {
            registry: Arc::new(ConfigWorkflowRegistry::new(config.workflow_slots.clone())),
            forwarder,
            identity,
            jwt_keys: Arc::new(JwtKeys::from_secret(TEST_SECRET).unwrap()),
            config: Arc::new(config),
        }
    }

    pub(crate) fn test_state(
        slots: Vec<WorkflowSlot>,
        forwarder: Arc<dyn WebhookForwarder>,
    ) -> AppState {
        test_state_with(
            test_config(slots),
            forwarder,
            Arc::new(MockIdentity::default()),
        )
    }
}

use std::sync::Mutex;

use async_trait::async_trait;

use super::{
    errors::IdentityError,
    service::{IdentityService, IdentitySession},
};

#[derive(Default)]
pub struct MockIdentity {
    /// Token handed out on sign-in; `None` rejects every password.
    pub token: Option<String>,
    pub fail_sign_out: bool,
    pub signed_out: Mutex<Vec<String>>,
}

impl MockIdentity {
    pub fn accepting(token: &str) -> Self {
        Self {
            token: Some(token.to_string()),
            ..Self::default()
        }
    }
}

#[async_trait]
impl IdentityService for MockIdentity {
    async fn sign_in_with_password(
        &self,
        _email: &str,
        _password: &str,
    ) -> Result<IdentitySession, IdentityError> {
        match &self.token {
            Some(token) => Ok(IdentitySession {
                access_token: token.clone(),
                expires_in: 3600,
            }),
            None => Err(IdentityError::InvalidCredentials),
        }
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), IdentityError> {
        self.signed_out
            .lock()
            .unwrap()
            .push(access_token.to_string());
        if self.fail_sign_out {
            return Err(IdentityError::Rejected(reqwest::StatusCode::BAD_GATEWAY));
        }
        Ok(())
    }
}

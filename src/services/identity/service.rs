use async_trait::async_trait;

use crate::services::identity::errors::IdentityError;

/// A session issued by the identity provider after a password sign-in.
#[derive(Clone, PartialEq, Eq)]
pub struct IdentitySession {
    pub access_token: String,
    pub expires_in: i64,
}

impl std::fmt::Debug for IdentitySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentitySession")
            .field("expires_in", &self.expires_in)
            .finish_non_exhaustive()
    }
}

#[async_trait]
pub trait IdentityService: Send + Sync {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<IdentitySession, IdentityError>;

    async fn sign_out(&self, access_token: &str) -> Result<(), IdentityError>;
}

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;

use crate::config::IdentityConfig;
use crate::services::identity::{
    errors::IdentityError,
    service::{IdentityService, IdentitySession},
};

/// HTTP client for the external identity provider (GoTrue-compatible API).
pub struct IdentityClient {
    pub client: Client,
    pub base_url: String,
    pub api_key: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

const DEFAULT_SESSION_SECONDS: i64 = 3600;

impl IdentityClient {
    pub fn new(client: Client, config: &IdentityConfig) -> Self {
        Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }
}

#[async_trait]
impl IdentityService for IdentityClient {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<IdentitySession, IdentityError> {
        let res = self
            .client
            .post(self.endpoint("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.api_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        match res.status() {
            status if status.is_success() => {}
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => {
                return Err(IdentityError::InvalidCredentials)
            }
            status => return Err(IdentityError::Rejected(status)),
        }

        let token: TokenResponse = res
            .json()
            .await
            .map_err(|e| IdentityError::InvalidResponse(e.to_string()))?;

        if token.access_token.is_empty() {
            return Err(IdentityError::InvalidResponse(
                "missing access_token".to_string(),
            ));
        }

        Ok(IdentitySession {
            access_token: token.access_token,
            expires_in: token.expires_in.unwrap_or(DEFAULT_SESSION_SECONDS),
        })
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), IdentityError> {
        let res = self
            .client
            .post(self.endpoint("logout"))
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(IdentityError::Rejected(res.status()));
        }
        Ok(())
    }
}

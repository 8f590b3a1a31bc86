use std::env;
use std::net::SocketAddr;

use thiserror::Error;

/// Default ceiling for a single upload, in bytes (4.5 MB decimal).
pub const DEFAULT_UPLOAD_MAX_BYTES: u64 = 4_500_000;
pub const DEFAULT_WORKFLOW_SLOT_COUNT: usize = 5;
pub const DEFAULT_JWT_AUDIENCE: &str = "authenticated";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has an invalid value: {reason}")]
    Invalid { key: String, reason: String },
}

/// Raw values of one `WORKFLOW_{n}_*` slot. Nothing here is validated; the
/// registry decides which slots are usable.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct WorkflowSlot {
    pub name: Option<String>,
    pub description: Option<String>,
    pub webhook_url: Option<String>,
    pub bearer_token: Option<String>,
}

impl std::fmt::Debug for WorkflowSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowSlot")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("has_webhook_url", &self.webhook_url.is_some())
            .field("has_bearer_token", &self.bearer_token.is_some())
            .finish()
    }
}

#[derive(Clone)]
pub struct IdentityConfig {
    pub url: String,
    pub api_key: String,
    pub jwt_secret: String,
    pub jwt_audience: String,
}

impl std::fmt::Debug for IdentityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityConfig")
            .field("url", &self.url)
            .field("jwt_audience", &self.jwt_audience)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub frontend_origin: Option<String>,
    /// `None` disables the server-side ceiling.
    pub upload_max_bytes: Option<u64>,
    pub session_cookie_secure: bool,
    pub workflow_slots: Vec<WorkflowSlot>,
    pub identity: IdentityConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok(); // Load .env file

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Empty values are
    /// treated the same as absent ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let bind_addr = parse_value::<SocketAddr>(
            "BIND_ADDR",
            &get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
        )?;

        let upload_max_bytes = match get("UPLOAD_MAX_BYTES") {
            Some(raw) => match parse_value::<u64>("UPLOAD_MAX_BYTES", &raw)? {
                0 => None,
                limit => Some(limit),
            },
            None => Some(DEFAULT_UPLOAD_MAX_BYTES),
        };

        let session_cookie_secure = match get("SESSION_COOKIE_SECURE") {
            Some(raw) => parse_value::<bool>("SESSION_COOKIE_SECURE", &raw)?,
            None => true,
        };

        let slot_count = match get("WORKFLOW_SLOT_COUNT") {
            Some(raw) => parse_value::<usize>("WORKFLOW_SLOT_COUNT", &raw)?,
            None => DEFAULT_WORKFLOW_SLOT_COUNT,
        };

        let workflow_slots = (1..=slot_count)
            .map(|n| WorkflowSlot {
                name: get(&format!("WORKFLOW_{n}_NAME")),
                description: get(&format!("WORKFLOW_{n}_DESCRIPTION")),
                webhook_url: get(&format!("WORKFLOW_{n}_WEBHOOK_URL")),
                bearer_token: get(&format!("WORKFLOW_{n}_BEARER_TOKEN")),
            })
            .collect();

        let identity = IdentityConfig {
            url: required("IDENTITY_URL")?.trim_end_matches('/').to_string(),
            api_key: required("IDENTITY_API_KEY")?,
            jwt_secret: required("IDENTITY_JWT_SECRET")?,
            jwt_audience: get("IDENTITY_JWT_AUDIENCE")
                .unwrap_or_else(|| DEFAULT_JWT_AUDIENCE.to_string()),
        };

        Ok(Config {
            bind_addr,
            frontend_origin: get("FRONTEND_ORIGIN"),
            upload_max_bytes,
            session_cookie_secure,
            workflow_slots,
            identity,
        })
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Identity service responded with status {0}")]
    Rejected(StatusCode),
    #[error("Identity service request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Identity service returned an invalid response: {0}")]
    InvalidResponse(String),
}

use serde::{Deserialize, Serialize};

/// Claims of an access token issued by the identity provider.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Claims {
    pub sub: String, // user id
    #[serde(default)]
    pub email: Option<String>,
    pub exp: usize, // expiration (as UNIX timestamp)
    pub aud: String,
    #[serde(default)]
    pub role: Option<String>,
}

use std::collections::HashSet;

use crate::routes::auth::claims::Claims;
use jsonwebtoken::{
    decode, errors::Error, errors::ErrorKind, Algorithm, DecodingKey, TokenData, Validation,
};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Minimum acceptable size for the JWT secret in bytes.
pub const MIN_JWT_SECRET_LENGTH: usize = 32;
/// Minimum number of unique bytes expected for the JWT secret to avoid trivially guessable values.
const MIN_UNIQUE_JWT_BYTES: usize = 8;

#[derive(Debug, Error)]
pub enum JwtSecretError {
    #[error("IDENTITY_JWT_SECRET must be at least {required} bytes, but {actual} bytes were provided")]
    TooShort { actual: usize, required: usize },
    #[error(
        "IDENTITY_JWT_SECRET must contain sufficient entropy (at least {required} unique bytes); only {actual} unique bytes found"
    )]
    LowEntropy { actual: usize, required: usize },
}

#[derive(Clone)]
pub struct JwtKeys {
    decoding: DecodingKey,
}

impl std::fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtKeys").finish_non_exhaustive()
    }
}

impl JwtKeys {
    pub fn from_secret(secret: impl AsRef<[u8]>) -> Result<Self, JwtSecretError> {
        let bytes = secret.as_ref();
        validate_secret(bytes)?;

        Ok(Self {
            decoding: DecodingKey::from_secret(bytes),
        })
    }

    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding
    }
}

/// Implemented by router state so the session extractor can verify tokens
/// without knowing the concrete state type.
pub trait JwtKeyProvider {
    fn jwt_keys(&self) -> &JwtKeys;
    fn jwt_audience(&self) -> &str;
}

fn validate_secret(secret: &[u8]) -> Result<(), JwtSecretError> {
    if secret.len() < MIN_JWT_SECRET_LENGTH {
        return Err(JwtSecretError::TooShort {
            actual: secret.len(),
            required: MIN_JWT_SECRET_LENGTH,
        });
    }

    let unique = secret.iter().copied().collect::<HashSet<_>>().len();
    if unique < MIN_UNIQUE_JWT_BYTES {
        return Err(JwtSecretError::LowEntropy {
            actual: unique,
            required: MIN_UNIQUE_JWT_BYTES,
        });
    }

    Ok(())
}

pub fn decode_jwt(token: &str, keys: &JwtKeys, audience: &str) -> Result<TokenData<Claims>, Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[audience]);
    validation.validate_exp = true;
    validation.required_spec_claims.insert("exp".to_string());
    validation.required_spec_claims.insert("sub".to_string());
    let data = decode::<Claims>(token, keys.decoding_key(), &validation)?;

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| Error::from(ErrorKind::InvalidToken))?
        .as_secs();

    if (data.claims.exp as u64) <= now {
        return Err(Error::from(ErrorKind::ExpiredSignature));
    }

    Ok(data)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::routes::auth::claims::Claims;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    pub(crate) const TEST_SECRET: &str = "0123456789abcdef0123456789abcdef";
    pub(crate) const TEST_AUDIENCE: &str = "authenticated";

    pub(crate) fn claims_expiring_in(seconds: i64) -> Claims {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64;
        Claims {
            sub: "user-123".into(),
            email: Some("user@example.com".into()),
            exp: (now + seconds) as usize,
            aud: String::new(),
            role: Some("authenticated".into()),
        }
    }

    /// Stands in for the identity provider, which mints real session tokens.
    pub(crate) fn create_jwt(mut claims: Claims, secret: &str, audience: &str) -> String {
        claims.aud = audience.to_owned();
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    pub(crate) fn valid_token() -> String {
        create_jwt(claims_expiring_in(3600), TEST_SECRET, TEST_AUDIENCE)
    }

    #[test]
    fn rejects_short_secret() {
        let err = JwtKeys::from_secret("too-short").unwrap_err();
        assert!(matches!(
            err,
            JwtSecretError::TooShort {
                actual,
                required: MIN_JWT_SECRET_LENGTH
            } if actual < MIN_JWT_SECRET_LENGTH
        ));
    }

    #[test]
    fn rejects_low_entropy_secret() {
        let err = JwtKeys::from_secret("a".repeat(MIN_JWT_SECRET_LENGTH)).unwrap_err();
        assert!(matches!(
            err,
            JwtSecretError::LowEntropy {
                actual,
                required: _
            } if actual < MIN_UNIQUE_JWT_BYTES
        ));
    }

    #[test]
    fn accepts_token_for_expected_audience() {
        let keys = JwtKeys::from_secret(TEST_SECRET).expect("secret should be accepted");
        let decoded = decode_jwt(&valid_token(), &keys, TEST_AUDIENCE).expect("token should decode");
        assert_eq!(decoded.claims.sub, "user-123");
        assert_eq!(decoded.claims.email.as_deref(), Some("user@example.com"));
    }

    #[test]
    fn rejects_foreign_audience() {
        let keys = JwtKeys::from_secret(TEST_SECRET).unwrap();
        assert!(decode_jwt(&valid_token(), &keys, "someone-else").is_err());
    }

    #[test]
    fn rejects_expired_token() {
        let keys = JwtKeys::from_secret(TEST_SECRET).unwrap();
        let token = create_jwt(claims_expiring_in(-600), TEST_SECRET, TEST_AUDIENCE);
        assert!(decode_jwt(&token, &keys, TEST_AUDIENCE).is_err());
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let token = create_jwt(
            claims_expiring_in(3600),
            "fedcba9876543210fedcba9876543210",
            TEST_AUDIENCE,
        );
        let keys = JwtKeys::from_secret(TEST_SECRET).unwrap();
        assert!(decode_jwt(&token, &keys, TEST_AUDIENCE).is_err());
    }
}

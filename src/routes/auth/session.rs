use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use axum_extra::extract::cookie::CookieJar;

use crate::routes::auth::{claims::Claims, SESSION_COOKIE};
use crate::utils::jwt::{decode_jwt, JwtKeyProvider};

#[derive(Debug, PartialEq)]
pub struct AuthSession(pub Claims);

impl<S> FromRequestParts<S> for AuthSession
where
    S: JwtKeyProvider + Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar.get(SESSION_COOKIE).ok_or(StatusCode::UNAUTHORIZED)?;

        let claims = decode_jwt(token.value(), state.jwt_keys(), state.jwt_audience()).map_err(
            |e| {
                tracing::debug!(error = %e, "rejecting session token");
                StatusCode::UNAUTHORIZED
            },
        )?;

        Ok(AuthSession(claims.claims))
    }
}

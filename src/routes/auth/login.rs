use axum::{
    extract::{Json, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use serde_json::json;
use time::Duration as TimeDuration;

use crate::routes::auth::{session::AuthSession, SESSION_COOKIE};
use crate::{
    responses::JsonResponse, services::identity::errors::IdentityError, state::AppState,
};

#[derive(Deserialize, Serialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

pub(crate) fn session_cookie(token: String, max_age: TimeDuration, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(max_age)
        .build()
}

/// Forwards the credentials to the identity provider and keeps the returned
/// access token in an HttpOnly cookie.
pub async fn handle_login(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginPayload>,
) -> Response {
    let session = match app_state
        .identity
        .sign_in_with_password(&payload.email, &payload.password)
        .await
    {
        Ok(session) => session,
        Err(IdentityError::InvalidCredentials) => {
            return JsonResponse::unauthorized("Invalid credentials").into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "identity provider sign-in failed");
            return JsonResponse::bad_gateway("Sign-in is temporarily unavailable").into_response();
        }
    };

    let cookie = session_cookie(
        session.access_token,
        TimeDuration::seconds(session.expires_in),
        app_state.config.session_cookie_secure,
    );

    (jar.add(cookie), JsonResponse::success("Logged in")).into_response()
}

pub async fn handle_me(AuthSession(claims): AuthSession) -> Response {
    Json(json!({
        "success": true,
        "id": claims.sub,
        "email": claims.email,
    }))
    .into_response()
}

use axum::{extract::State, response::IntoResponse};
use axum_extra::extract::cookie::{Cookie, CookieJar};

use crate::routes::auth::SESSION_COOKIE;
use crate::{responses::JsonResponse, state::AppState};

/// Signs the token out at the identity provider (best effort) and clears the
/// session cookie regardless of the outcome.
pub async fn handle_logout(State(app_state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if let Some(token) = jar.get(SESSION_COOKIE) {
        if let Err(e) = app_state.identity.sign_out(token.value()).await {
            tracing::warn!(error = %e, "identity provider sign-out failed");
        }
    }

    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, JsonResponse::success("Logged out"))
}

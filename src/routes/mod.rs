pub mod auth;
pub mod dashboard;
pub mod pages;
pub mod upload;
pub mod workflows;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Room for multipart boundaries and part headers on top of the file bytes.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

fn upload_body_limit(app_state: &AppState) -> DefaultBodyLimit {
    match app_state.config.upload_max_bytes {
        Some(limit) => DefaultBodyLimit::max(
            usize::try_from(limit)
                .unwrap_or(usize::MAX)
                .saturating_add(MULTIPART_OVERHEAD_BYTES),
        ),
        None => DefaultBodyLimit::disable(),
    }
}

/// All routes, without transport layers (tracing, CORS) which the binary adds.
pub fn router(app_state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/login", post(auth::handle_login))
        .route("/logout", post(auth::handle_logout))
        .route("/me", get(auth::handle_me));

    let api_routes = Router::new()
        .route(
            "/upload",
            post(upload::handle_upload).layer(upload_body_limit(&app_state)),
        )
        .route("/workflows", get(workflows::list_workflows))
        .nest("/auth", auth_routes);

    Router::new()
        .route("/", get(pages::landing_page))
        .route("/auth/login", get(pages::login_page))
        .route("/dashboard", get(dashboard::dashboard_page))
        .nest("/api", api_routes)
        .with_state(app_state)
}

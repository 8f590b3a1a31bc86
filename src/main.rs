use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use reqwest::Client;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use upload_relay::config::Config;
use upload_relay::registry::{ConfigWorkflowRegistry, WorkflowRegistry};
use upload_relay::routes;
use upload_relay::services::identity::client::IdentityClient;
use upload_relay::services::webhook_forwarder::ReqwestWebhookForwarder;
use upload_relay::utils::{jwt::JwtKeys, logging};
use upload_relay::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_tracing();

    let config = Config::from_env().context("failed to load configuration")?;
    let jwt_keys = JwtKeys::from_secret(&config.identity.jwt_secret)
        .context("IDENTITY_JWT_SECRET is not usable")?;

    let http_client = Client::new();
    let registry = ConfigWorkflowRegistry::new(config.workflow_slots.clone());
    let forwardable = registry
        .list_workflows()
        .iter()
        .filter(|w| w.is_forwardable())
        .count();
    info!(
        slots = registry.slot_count(),
        workflows = registry.list_workflows().len(),
        forwardable,
        upload_max_bytes = config.upload_max_bytes.unwrap_or(0),
        "workflow registry loaded"
    );

    let bind_addr = config.bind_addr;
    let frontend_origin = config.frontend_origin.clone();

    let state = AppState {
        registry: Arc::new(registry),
        forwarder: Arc::new(ReqwestWebhookForwarder::new(http_client.clone())),
        identity: Arc::new(IdentityClient::new(http_client, &config.identity)),
        jwt_keys: Arc::new(jwt_keys),
        config: Arc::new(config),
    };

    let mut app = routes::router(state).layer(TraceLayer::new_for_http());

    if let Some(origin) = frontend_origin {
        let origin = origin
            .parse::<HeaderValue>()
            .with_context(|| format!("FRONTEND_ORIGIN `{origin}` is not a valid header value"))?;
        app = app.layer(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([AUTHORIZATION, CONTENT_TYPE])
                .allow_credentials(true),
        );
    }

    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    info!(addr = %bind_addr, "upload relay listening");
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

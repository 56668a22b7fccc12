//! Axum-based HTTP gateway for the Telegram webhook.
//!
//! - Body size limit (64KB) and request timeout (30s) via tower-http layers
//! - `POST /webhook` is the only processing route; everything else answers a
//!   fixed plain-text `OK` so platform health checks pass without touching
//!   bot logic

mod handlers;
mod secret;

use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::telegram::{BotApi, TelegramClient};
use anyhow::Result;
use axum::{
    Router,
    http::StatusCode,
    routing::post,
};
use handlers::{handle_probe, handle_webhook};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

/// Maximum request body size (64KB) — prevents memory exhaustion
pub const MAX_BODY_SIZE: usize = 65_536;
/// Request timeout (30s) — prevents slow-loris attacks
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Shared state for all axum handlers
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub webhook_secret: Option<Arc<str>>,
}

/// Run the HTTP gateway on the configured bind address.
pub async fn run_gateway(config: Config) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.gateway.host, config.gateway.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    run_gateway_with_listener(listener, config).await
}

/// Run the HTTP gateway from a pre-bound listener.
pub async fn run_gateway_with_listener(
    listener: tokio::net::TcpListener,
    config: Config,
) -> Result<()> {
    let api: Arc<dyn BotApi> = Arc::new(TelegramClient::new(config.bot_token.clone()));
    run_gateway_with_api(listener, config, api).await
}

/// Run the gateway against an explicit `BotApi`. Test entry point — lets
/// integration tests aim the outbound side at a mock server.
pub async fn run_gateway_with_api(
    listener: tokio::net::TcpListener,
    config: Config,
    api: Arc<dyn BotApi>,
) -> Result<()> {
    let display_addr = listener.local_addr()?;

    let webhook_secret: Option<Arc<str>> = config.webhook_secret().map(Arc::from);
    let dispatcher = Arc::new(Dispatcher::new(api, Arc::new(config)));
    let state = AppState {
        dispatcher,
        webhook_secret,
    };

    tracing::info!("gateway listening on {display_addr}");
    tracing::info!("  POST /webhook → Telegram updates");
    tracing::info!("  anything else → 200 OK (liveness)");
    if state.webhook_secret.is_some() {
        tracing::info!("  webhook secret check enabled");
    }

    // The method-router fallback keeps non-POST verbs on /webhook answering
    // the liveness reply instead of 405.
    let app = Router::new()
        .route("/webhook", post(handle_webhook).fallback(handle_probe))
        .fallback(handle_probe)
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        ));

    axum::serve(listener, app).await?;

    Ok(())
}

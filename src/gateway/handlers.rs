use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
};

use super::AppState;
use super::secret::constant_time_eq;
use crate::telegram::update::Update;

/// Header Telegram attaches when a secret token is registered with
/// `setWebhook`.
pub(super) const SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

/// Any verb/path outside `POST /webhook` — fixed liveness reply, body never
/// inspected.
pub(super) async fn handle_probe() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}

/// POST /webhook — the single processing endpoint.
///
/// The transport is always answered immediately; dispatch runs on a background
/// task whose outcome never affects this response.
pub(super) async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, &'static str) {
    // Secret check first — a rejected request never has its body parsed.
    if let Some(ref secret) = state.webhook_secret {
        let provided = headers
            .get(SECRET_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        if !constant_time_eq(provided, secret.as_ref()) {
            tracing::warn!(
                "webhook request rejected — secret token {}",
                if provided.is_empty() { "missing" } else { "mismatched" }
            );
            return (StatusCode::UNAUTHORIZED, "Unauthorized");
        }
    }

    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            tracing::warn!("webhook body rejected: {e}");
            return (StatusCode::BAD_REQUEST, "Bad JSON");
        }
    };

    let event = update.classify();
    let dispatcher = state.dispatcher.clone();
    tokio::spawn(async move {
        dispatcher.handle(event).await;
    });

    (StatusCode::OK, "OK")
}

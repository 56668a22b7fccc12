pub mod update;


use async_trait::async_trait;
use serde::Deserialize;

/// Typed result of one outbound Bot API call.
///
/// Delivery failure is a normal value, never an error: the dispatcher reports
/// it to the requesting user once and moves on. `status` is absent when the
/// request never reached the API (network error).
#[derive(Debug, Clone, Default)]
pub struct SendOutcome {
    pub delivered: bool,
    pub status: Option<u16>,
    pub description: Option<String>,
}

/// Outbound messaging seam — the two Bot API methods this bot uses.
#[async_trait]
pub trait BotApi: Send + Sync {
    /// Post a text message to a chat.
    async fn send_message(&self, chat_id: &str, text: &str) -> SendOutcome;

    /// Acknowledge a callback query so the client stops showing a pending
    /// indicator.
    async fn answer_callback(&self, callback_query_id: &str) -> SendOutcome;
}

/// Bot API response envelope. Unparseable bodies fall back to the default,
/// which reads as not-ok.
#[derive(Debug, Default, Deserialize)]
struct ApiEnvelope {
    #[serde(default)]
    ok: bool,
    description: Option<String>,
}

/// Stateless Telegram Bot API client.
pub struct TelegramClient {
    bot_token: String,
    api_base: String,
    client: reqwest::Client,
}

impl TelegramClient {
    pub fn new(bot_token: String) -> Self {
        Self::with_api_base(bot_token, "https://api.telegram.org".to_string())
    }

    /// Point the client at a different API host. Used by tests to target a
    /// mock server.
    pub fn with_api_base(bot_token: String, api_base: String) -> Self {
        Self {
            bot_token,
            api_base,
            client: reqwest::Client::new(),
        }
    }

    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.api_base, self.bot_token)
    }

    async fn call(&self, method: &str, payload: serde_json::Value) -> SendOutcome {
        let resp = match self
            .client
            .post(self.api_url(method))
            .json(&payload)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!("Telegram {method} request failed: {e}");
                return SendOutcome::default();
            }
        };

        let status = resp.status();
        let envelope: ApiEnvelope = resp.json().await.unwrap_or_default();
        if !envelope.ok {
            tracing::warn!(
                "Telegram {method} not delivered (HTTP {status}): {}",
                envelope.description.as_deref().unwrap_or("no description")
            );
        }

        SendOutcome {
            delivered: status.is_success() && envelope.ok,
            status: Some(status.as_u16()),
            description: envelope.description,
        }
    }
}

#[async_trait]
impl BotApi for TelegramClient {
    async fn send_message(&self, chat_id: &str, text: &str) -> SendOutcome {
        self.call(
            "sendMessage",
            serde_json::json!({
                "chat_id": chat_id,
                "text": text,
                "parse_mode": "HTML",
                "disable_web_page_preview": true,
            }),
        )
        .await
    }

    async fn answer_callback(&self, callback_query_id: &str) -> SendOutcome {
        self.call(
            "answerCallbackQuery",
            serde_json::json!({
                "callback_query_id": callback_query_id,
                "text": "OK",
            }),
        )
        .await
    }
}

//! Update dispatch and authorization.
//!
//! One inbound event is handled in full isolation using only the event's own
//! payload and the static config. The admin check always runs before any
//! privileged send, and short-circuits with a user-visible denial.

mod replies;

#[cfg(test)]
mod tests;

use crate::config::Config;
use crate::telegram::BotApi;
use crate::telegram::update::InboundEvent;
use std::sync::Arc;

pub struct Dispatcher {
    api: Arc<dyn BotApi>,
    config: Arc<Config>,
}

impl Dispatcher {
    pub fn new(api: Arc<dyn BotApi>, config: Arc<Config>) -> Self {
        Self { api, config }
    }

    pub async fn handle(&self, event: InboundEvent) {
        match event {
            InboundEvent::Text {
                chat_id,
                sender_id,
                text,
            } => self.handle_text(chat_id, sender_id, text.trim()).await,
            InboundEvent::Callback {
                callback_id,
                chat_id,
            } => self.handle_callback(&callback_id, chat_id).await,
            InboundEvent::Other => {}
        }
    }

    async fn handle_text(&self, chat_id: i64, sender_id: Option<i64>, text: &str) {
        if text.is_empty() {
            return;
        }
        let chat = chat_id.to_string();

        let Some(command) = command_token(text) else {
            self.api.send_message(&chat, replies::FALLBACK).await;
            return;
        };

        match command.as_str() {
            "/start" => {
                self.api
                    .send_message(&chat, &replies::start_help(&self.config.templates))
                    .await;
            }
            "/ping" => {
                self.api.send_message(&chat, replies::PONG).await;
            }
            "/id" => {
                self.api
                    .send_message(&chat, &replies::id_reply(sender_id, chat_id))
                    .await;
            }
            "/signal" => {
                if !self.is_admin(sender_id) {
                    tracing::warn!("denied /signal from sender {sender_id:?} in chat {chat_id}");
                    self.api.send_message(&chat, replies::ADMIN_ONLY).await;
                    return;
                }
                self.api
                    .send_message(&chat, &replies::signal_example())
                    .await;
            }
            "/post" => self.handle_post(&chat, sender_id, text).await,
            _ => {
                self.api.send_message(&chat, replies::FALLBACK).await;
            }
        }
    }

    async fn handle_post(&self, chat: &str, sender_id: Option<i64>, text: &str) {
        if !self.is_admin(sender_id) {
            tracing::warn!("denied /post from sender {sender_id:?} in chat {chat}");
            self.api.send_message(chat, replies::ADMIN_ONLY).await;
            return;
        }

        let Some(destination) = self.config.broadcast_chat_id.as_deref() else {
            self.api
                .send_message(chat, replies::NO_BROADCAST_DESTINATION)
                .await;
            return;
        };

        let body = argument_after_command(text);
        if body.is_empty() {
            self.api.send_message(chat, replies::POST_USAGE).await;
            return;
        }

        // Sequential on purpose: the confirmation reports the broadcast's
        // outcome.
        let outcome = self.api.send_message(destination, body).await;
        if outcome.delivered {
            tracing::info!("broadcast relayed to {destination}");
            self.api.send_message(chat, replies::POST_DELIVERED).await;
        } else {
            tracing::error!(
                "broadcast to {destination} failed (status {:?})",
                outcome.status
            );
            self.api
                .send_message(chat, &replies::post_failed(&outcome))
                .await;
        }
    }

    async fn handle_callback(&self, callback_id: &str, chat_id: Option<i64>) {
        self.api.answer_callback(callback_id).await;
        if let Some(chat_id) = chat_id {
            self.api
                .send_message(&chat_id.to_string(), replies::CALLBACK_RECEIVED)
                .await;
        }
    }

    /// Single-principal allowlist: string equality after coercing both sides.
    fn is_admin(&self, sender_id: Option<i64>) -> bool {
        sender_id.is_some_and(|id| id.to_string() == self.config.admin_id)
    }
}

/// First whitespace-delimited token, lower-cased, when it starts with `/`.
fn command_token(text: &str) -> Option<String> {
    let first = text.split_whitespace().next()?;
    first.starts_with('/').then(|| first.to_lowercase())
}

/// Text after the command token, leading whitespace stripped.
fn argument_after_command(text: &str) -> &str {
    let token_len = text
        .split_whitespace()
        .next()
        .map_or(0, |token| token.len());
    text[token_len..].trim()
}

//! Inbound update schema and event classification.
//!
//! The raw update is deserialized once at the webhook boundary and immediately
//! collapsed into an [`InboundEvent`], so the rest of the bot never inspects
//! optional-field presence to decide what kind of update it is handling.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Update {
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    pub chat: Option<Chat>,
    pub from: Option<User>,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct User {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub message: Option<Message>,
}

/// One inbound update, classified. Scoped to a single webhook call — nothing
/// here outlives the handling of the event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// A direct text message with a known chat.
    Text {
        chat_id: i64,
        sender_id: Option<i64>,
        text: String,
    },
    /// A button press that must be acknowledged.
    Callback {
        callback_id: String,
        chat_id: Option<i64>,
    },
    /// Anything else (edited messages, channel posts, messages without a
    /// chat id). Ignored.
    Other,
}

impl Update {
    pub fn classify(self) -> InboundEvent {
        if let Some(msg) = self.message {
            let Some(chat) = msg.chat else {
                return InboundEvent::Other;
            };
            return InboundEvent::Text {
                chat_id: chat.id,
                sender_id: msg.from.map(|u| u.id),
                text: msg.text.unwrap_or_default(),
            };
        }

        if let Some(cb) = self.callback_query {
            let chat_id = cb.message.and_then(|m| m.chat).map(|c| c.id);
            return InboundEvent::Callback {
                callback_id: cb.id,
                chat_id,
            };
        }

        InboundEvent::Other
    }
}

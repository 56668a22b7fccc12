//! Fixed reply texts. HTML parse mode, so literal angle brackets are escaped.

use crate::config::TemplatesConfig;
use crate::telegram::SendOutcome;

pub(super) const PONG: &str = "🏓 pong";

pub(super) const ADMIN_ONLY: &str = "⛔️ This command is restricted to the admin.";

pub(super) const NO_BROADCAST_DESTINATION: &str =
    "⚠️ No broadcast channel is configured (broadcast_chat_id).";

pub(super) const POST_USAGE: &str = "Usage: /post &lt;your message&gt;";

pub(super) const POST_DELIVERED: &str = "✅ Message posted to the broadcast channel.";

pub(super) const CALLBACK_RECEIVED: &str = "✅ Callback received.";

pub(super) const FALLBACK: &str = "✅ Received. Send /start to see the available commands.";

pub(super) fn start_help(templates: &TemplatesConfig) -> String {
    let mut lines = vec![
        "✅ Bot connected.".to_string(),
        String::new(),
        "Commands:".to_string(),
        "• /ping".to_string(),
        "• /signal (admin)".to_string(),
        "• /post &lt;message&gt; (admin, relays to the broadcast channel)".to_string(),
        "• /id (shows your id and this chat's id)".to_string(),
    ];
    if let Some(price) = &templates.price {
        lines.push(String::new());
        lines.push(format!("💰 {price}"));
    }
    if let Some(contact) = &templates.contact {
        lines.push(format!("📬 {contact}"));
    }
    lines.join("\n")
}

pub(super) fn id_reply(sender_id: Option<i64>, chat_id: i64) -> String {
    let sender = sender_id.map_or_else(|| "unknown".to_string(), |id| id.to_string());
    format!("👤 <b>Your ID</b>: <code>{sender}</code>\n💬 <b>Chat ID</b>: <code>{chat_id}</code>")
}

pub(super) fn signal_example() -> String {
    [
        "<b>XAUUSD BUY @ 5084 – 5087</b>",
        "",
        "<b>SL</b>: 5078",
        "<b>TP1</b>: 5093",
        "<b>TP2</b>: 5100",
        "",
        "ℹ️ <i>Strict risk management.</i>",
    ]
    .join("\n")
}

pub(super) fn post_failed(outcome: &SendOutcome) -> String {
    match outcome.status {
        Some(status) => format!("❌ Broadcast failed (HTTP {status})."),
        None => "❌ Broadcast failed (network error).".to_string(),
    }
}

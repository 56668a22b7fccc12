use super::{Dispatcher, argument_after_command, command_token};
use crate::config::Config;
use crate::telegram::update::InboundEvent;
use crate::telegram::{BotApi, SendOutcome};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Records every outbound call instead of hitting the network.
struct RecordingApi {
    sends: Mutex<Vec<(String, String)>>,
    callbacks: Mutex<Vec<String>>,
    deliver: bool,
    status: Option<u16>,
}

impl RecordingApi {
    fn delivering() -> Arc<Self> {
        Arc::new(Self {
            sends: Mutex::new(Vec::new()),
            callbacks: Mutex::new(Vec::new()),
            deliver: true,
            status: Some(200),
        })
    }

    fn failing(status: Option<u16>) -> Arc<Self> {
        Arc::new(Self {
            sends: Mutex::new(Vec::new()),
            callbacks: Mutex::new(Vec::new()),
            deliver: false,
            status,
        })
    }

    fn sends(&self) -> Vec<(String, String)> {
        self.sends.lock().unwrap().clone()
    }

    fn callbacks(&self) -> Vec<String> {
        self.callbacks.lock().unwrap().clone()
    }
}

#[async_trait]
impl BotApi for RecordingApi {
    async fn send_message(&self, chat_id: &str, text: &str) -> SendOutcome {
        self.sends
            .lock()
            .unwrap()
            .push((chat_id.to_string(), text.to_string()));
        SendOutcome {
            delivered: self.deliver,
            status: self.status,
            description: None,
        }
    }

    async fn answer_callback(&self, callback_query_id: &str) -> SendOutcome {
        self.callbacks
            .lock()
            .unwrap()
            .push(callback_query_id.to_string());
        SendOutcome {
            delivered: self.deliver,
            status: self.status,
            description: None,
        }
    }
}

const ADMIN: i64 = 42;

fn dispatcher(api: Arc<RecordingApi>, broadcast: Option<&str>) -> Dispatcher {
    let config = Config {
        bot_token: "123:ABC".to_string(),
        admin_id: ADMIN.to_string(),
        broadcast_chat_id: broadcast.map(String::from),
        ..Config::default()
    };
    Dispatcher::new(api, Arc::new(config))
}

fn text_event(sender_id: Option<i64>, text: &str) -> InboundEvent {
    InboundEvent::Text {
        chat_id: 7,
        sender_id,
        text: text.to_string(),
    }
}

// ── Command parsing ─────────────────────────────────────────────

#[test]
fn command_token_is_first_token_lowercased() {
    assert_eq!(command_token("/POST hello"), Some("/post".to_string()));
    assert_eq!(command_token("/ping"), Some("/ping".to_string()));
    assert_eq!(command_token("  /id  "), Some("/id".to_string()));
}

#[test]
fn command_token_absent_for_plain_text() {
    assert_eq!(command_token("hello there"), None);
    assert_eq!(command_token(""), None);
}

#[test]
fn argument_strips_command_and_whitespace() {
    assert_eq!(argument_after_command("/post   Buy EURUSD now"), "Buy EURUSD now");
    assert_eq!(argument_after_command("/post"), "");
    assert_eq!(argument_after_command("/post    "), "");
}

// ── Public commands ─────────────────────────────────────────────

#[tokio::test]
async fn ping_replies_pong() {
    let api = RecordingApi::delivering();
    dispatcher(api.clone(), None)
        .handle(text_event(Some(1), "/ping"))
        .await;

    assert_eq!(api.sends(), vec![("7".to_string(), "🏓 pong".to_string())]);
}

#[tokio::test]
async fn id_reports_sender_and_chat() {
    let api = RecordingApi::delivering();
    dispatcher(api.clone(), None)
        .handle(text_event(Some(99), "/id"))
        .await;

    let sends = api.sends();
    assert_eq!(sends.len(), 1);
    assert!(sends[0].1.contains("<code>99</code>"));
    assert!(sends[0].1.contains("<code>7</code>"));
}

#[tokio::test]
async fn start_lists_commands() {
    let api = RecordingApi::delivering();
    dispatcher(api.clone(), None)
        .handle(text_event(Some(1), "/start"))
        .await;

    let sends = api.sends();
    assert_eq!(sends.len(), 1);
    assert!(sends[0].1.contains("/ping"));
    assert!(sends[0].1.contains("/post"));
    assert!(sends[0].1.contains("/signal"));
}

#[tokio::test]
async fn start_appends_configured_template_lines() {
    let api = RecordingApi::delivering();
    let config = Config {
        bot_token: "t".to_string(),
        admin_id: "42".to_string(),
        templates: crate::config::TemplatesConfig {
            price: Some("29 USD / month".to_string()),
            contact: Some("@support".to_string()),
        },
        ..Config::default()
    };
    Dispatcher::new(api.clone(), Arc::new(config))
        .handle(text_event(Some(1), "/start"))
        .await;

    let sends = api.sends();
    assert!(sends[0].1.contains("29 USD / month"));
    assert!(sends[0].1.contains("@support"));
}

#[tokio::test]
async fn unrecognized_text_gets_fallback() {
    let api = RecordingApi::delivering();
    dispatcher(api.clone(), None)
        .handle(text_event(Some(1), "hello bot"))
        .await;

    let sends = api.sends();
    assert_eq!(sends.len(), 1);
    assert!(sends[0].1.contains("/start"));
}

#[tokio::test]
async fn unknown_command_gets_fallback() {
    let api = RecordingApi::delivering();
    dispatcher(api.clone(), None)
        .handle(text_event(Some(1), "/unknown"))
        .await;

    assert_eq!(api.sends().len(), 1);
    assert!(api.sends()[0].1.contains("/start"));
}

#[tokio::test]
async fn empty_text_is_ignored() {
    let api = RecordingApi::delivering();
    dispatcher(api.clone(), None)
        .handle(text_event(Some(1), "   "))
        .await;

    assert!(api.sends().is_empty());
}

#[tokio::test]
async fn other_events_produce_no_send() {
    let api = RecordingApi::delivering();
    dispatcher(api.clone(), None).handle(InboundEvent::Other).await;

    assert!(api.sends().is_empty());
    assert!(api.callbacks().is_empty());
}

// ── Authorization ───────────────────────────────────────────────

#[tokio::test]
async fn non_admin_post_gets_exactly_one_denial() {
    let api = RecordingApi::delivering();
    dispatcher(api.clone(), Some("-100999"))
        .handle(text_event(Some(1), "/post Buy EURUSD now"))
        .await;

    let sends = api.sends();
    assert_eq!(sends.len(), 1);
    assert_eq!(sends[0].0, "7");
    assert!(sends[0].1.contains("admin"));
}

#[tokio::test]
async fn non_admin_signal_gets_denial() {
    let api = RecordingApi::delivering();
    dispatcher(api.clone(), None)
        .handle(text_event(Some(1), "/signal"))
        .await;

    let sends = api.sends();
    assert_eq!(sends.len(), 1);
    assert!(sends[0].1.contains("admin"));
}

#[tokio::test]
async fn sender_without_id_is_not_admin() {
    let api = RecordingApi::delivering();
    dispatcher(api.clone(), Some("-100999"))
        .handle(text_event(None, "/post hello"))
        .await;

    let sends = api.sends();
    assert_eq!(sends.len(), 1);
    assert!(sends[0].1.contains("admin"));
}

#[tokio::test]
async fn admin_signal_gets_template() {
    let api = RecordingApi::delivering();
    dispatcher(api.clone(), None)
        .handle(text_event(Some(ADMIN), "/signal"))
        .await;

    let sends = api.sends();
    assert_eq!(sends.len(), 1);
    assert!(sends[0].1.contains("XAUUSD"));
    assert!(sends[0].1.contains("SL"));
}

// ── Broadcast ───────────────────────────────────────────────────

#[tokio::test]
async fn admin_post_relays_verbatim_then_confirms() {
    let api = RecordingApi::delivering();
    dispatcher(api.clone(), Some("-100999"))
        .handle(text_event(Some(ADMIN), "/post Buy EURUSD now"))
        .await;

    let sends = api.sends();
    assert_eq!(sends.len(), 2);
    assert_eq!(sends[0], ("-100999".to_string(), "Buy EURUSD now".to_string()));
    assert_eq!(sends[1].0, "7");
    assert!(sends[1].1.contains("✅"));
}

#[tokio::test]
async fn post_command_token_is_case_insensitive() {
    let api = RecordingApi::delivering();
    dispatcher(api.clone(), Some("-100999"))
        .handle(text_event(Some(ADMIN), "/POST hello"))
        .await;

    assert_eq!(api.sends()[0], ("-100999".to_string(), "hello".to_string()));
}

#[tokio::test]
async fn post_requires_exact_command_token() {
    // "/posthello" is not the broadcast command.
    let api = RecordingApi::delivering();
    dispatcher(api.clone(), Some("-100999"))
        .handle(text_event(Some(ADMIN), "/posthello"))
        .await;

    let sends = api.sends();
    assert_eq!(sends.len(), 1);
    assert_eq!(sends[0].0, "7");
    assert!(sends[0].1.contains("/start"));
}

#[tokio::test]
async fn admin_post_without_destination_gets_config_error() {
    let api = RecordingApi::delivering();
    dispatcher(api.clone(), None)
        .handle(text_event(Some(ADMIN), "/post hello"))
        .await;

    let sends = api.sends();
    assert_eq!(sends.len(), 1);
    assert!(sends[0].1.contains("broadcast_chat_id"));
}

#[tokio::test]
async fn admin_post_with_whitespace_argument_gets_usage() {
    let api = RecordingApi::delivering();
    dispatcher(api.clone(), Some("-100999"))
        .handle(text_event(Some(ADMIN), "/post    "))
        .await;

    let sends = api.sends();
    assert_eq!(sends.len(), 1);
    assert!(sends[0].1.contains("Usage"));
}

#[tokio::test]
async fn failed_broadcast_confirmation_includes_status_code() {
    let api = RecordingApi::failing(Some(502));
    dispatcher(api.clone(), Some("-100999"))
        .handle(text_event(Some(ADMIN), "/post hello"))
        .await;

    let sends = api.sends();
    assert_eq!(sends.len(), 2);
    assert!(sends[1].1.contains("502"));
}

#[tokio::test]
async fn failed_broadcast_without_status_reports_network_error() {
    let api = RecordingApi::failing(None);
    dispatcher(api.clone(), Some("-100999"))
        .handle(text_event(Some(ADMIN), "/post hello"))
        .await;

    let sends = api.sends();
    assert_eq!(sends.len(), 2);
    assert!(sends[1].1.contains("network"));
}

// ── Callbacks ───────────────────────────────────────────────────

#[tokio::test]
async fn callback_is_acknowledged_then_chat_notified() {
    let api = RecordingApi::delivering();
    dispatcher(api.clone(), None)
        .handle(InboundEvent::Callback {
            callback_id: "cb-1".to_string(),
            chat_id: Some(7),
        })
        .await;

    assert_eq!(api.callbacks(), vec!["cb-1".to_string()]);
    let sends = api.sends();
    assert_eq!(sends.len(), 1);
    assert_eq!(sends[0].0, "7");
}

#[tokio::test]
async fn callback_without_chat_only_acknowledges() {
    let api = RecordingApi::delivering();
    dispatcher(api.clone(), None)
        .handle(InboundEvent::Callback {
            callback_id: "cb-2".to_string(),
            chat_id: None,
        })
        .await;

    assert_eq!(api.callbacks(), vec!["cb-2".to_string()]);
    assert!(api.sends().is_empty());
}

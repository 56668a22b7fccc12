use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Immutable bot configuration, threaded into the dispatcher at construction.
///
/// Loaded from a TOML file, then overridden by `SIGNALPOST_*` environment
/// variables. Required fields are validated once at startup so a misconfigured
/// process refuses to boot instead of failing per request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// BotFather token. Required.
    #[serde(default)]
    pub bot_token: String,
    /// Telegram user id of the single privileged principal. Required.
    /// Compared by string equality against the sender id of each update.
    #[serde(default)]
    pub admin_id: String,
    /// Chat/channel id that `/post` relays to (e.g. "-1001234567890").
    pub broadcast_chat_id: Option<String>,
    /// Shared secret expected in `X-Telegram-Bot-Api-Secret-Token` on webhook
    /// POSTs. Absent or empty disables the check.
    pub webhook_secret: Option<String>,
    #[serde(default)]
    pub templates: TemplatesConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Optional strings interpolated into message templates only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplatesConfig {
    pub price: Option<String>,
    pub contact: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Config {
    /// Load from `path` (missing file is treated as an empty config), apply
    /// environment overrides, then validate.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides to config
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(token) = get("SIGNALPOST_BOT_TOKEN").filter(|v| !v.is_empty()) {
            self.bot_token = token;
        }
        if let Some(admin) = get("SIGNALPOST_ADMIN_ID").filter(|v| !v.is_empty()) {
            self.admin_id = admin;
        }
        if let Some(chat) = get("SIGNALPOST_BROADCAST_CHAT_ID").filter(|v| !v.is_empty()) {
            self.broadcast_chat_id = Some(chat);
        }
        if let Some(secret) = get("SIGNALPOST_WEBHOOK_SECRET").filter(|v| !v.is_empty()) {
            self.webhook_secret = Some(secret);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.bot_token.trim().is_empty() {
            anyhow::bail!(
                "bot_token is not set — add it to the config file or set SIGNALPOST_BOT_TOKEN"
            );
        }
        if self.admin_id.trim().is_empty() {
            anyhow::bail!(
                "admin_id is not set — add it to the config file or set SIGNALPOST_ADMIN_ID"
            );
        }
        Ok(())
    }

    /// Webhook secret with empty values treated as disabled.
    pub fn webhook_secret(&self) -> Option<&str> {
        self.webhook_secret
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

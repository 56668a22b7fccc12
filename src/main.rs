use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use signalpost::config::Config;
use signalpost::gateway;

#[derive(Parser)]
#[command(
    name = "signalpost",
    version,
    about = "Telegram webhook bot that relays trading signals and gates admin commands"
)]
struct Cli {
    /// Path to the TOML config file
    #[arg(long, default_value = "signalpost.toml")]
    config: PathBuf,

    /// Bind host (overrides [gateway] host)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides [gateway] port)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install default crypto provider for Rustls TLS.
    // This prevents the error: "could not automatically determine the process-level CryptoProvider"
    // when both aws-lc-rs and ring features are available (or neither is explicitly selected).
    if let Err(e) = rustls::crypto::ring::default_provider().install_default() {
        eprintln!("Warning: Failed to install default crypto provider: {e:?}");
    }

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let cli = Cli::parse();
    let mut config = Config::load(&cli.config)?;
    if let Some(host) = cli.host {
        config.gateway.host = host;
    }
    if let Some(port) = cli.port {
        config.gateway.port = port;
    }

    gateway::run_gateway(config).await
}

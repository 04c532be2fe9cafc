//! restvault server CLI.

use anyhow::Context;
use clap::Parser;
use restvault_client::VaultClient;
use restvault_core::config::{ClientConfig, Protocol, DEFAULT_PORT, DEFAULT_TIMEOUT};
use restvault_tools::ToolRegistry;
use restvault::McpServer;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// MCP server for an Obsidian vault over its Local REST API
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// API key for the Obsidian Local REST API plugin
    #[arg(long, env = "OBSIDIAN_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Host the vault API listens on [default: 127.0.0.1]
    #[arg(long, env = "OBSIDIAN_HOST")]
    host: Option<String>,

    /// Port the vault API listens on [default: 27124]
    #[arg(long, env = "OBSIDIAN_PORT")]
    port: Option<u16>,

    /// URL scheme (http or https) [default: https]
    #[arg(long, env = "OBSIDIAN_PROTOCOL")]
    protocol: Option<String>,

    /// Verify the vault API's TLS certificate (the plugin's certificate is
    /// self-signed, so this is off by default)
    #[arg(long, env = "OBSIDIAN_VERIFY_SSL", action = clap::ArgAction::SetTrue)]
    verify_ssl: bool,

    /// Per-request timeout in seconds [default: 6]
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Optional settings file; flags and OBSIDIAN_* variables take
    /// precedence over it
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl Args {
    fn into_config(self) -> anyhow::Result<ClientConfig> {
        // The settings file is the bottom layer: explicit flags and
        // OBSIDIAN_* variables (picked up by clap) override it per field.
        if let Some(path) = &self.config {
            let base = ClientConfig::load(Some(path.as_path())).context("loading settings file")?;
            let protocol = match &self.protocol {
                Some(p) => p.parse()?,
                None => base.protocol,
            };
            let config = ClientConfig::builder(self.api_key.unwrap_or(base.api_key))
                .protocol(protocol)
                .host(self.host.unwrap_or(base.host))
                .port(self.port.unwrap_or(base.port))
                .verify_ssl(self.verify_ssl || base.verify_ssl)
                .timeout(
                    self.timeout_secs
                        .map(Duration::from_secs)
                        .unwrap_or(base.timeout),
                )
                .build()?;
            return Ok(config);
        }

        let api_key = self.api_key.context(
            "no API key: pass --api-key or set OBSIDIAN_API_KEY",
        )?;
        let protocol: Protocol = self.protocol.as_deref().unwrap_or("https").parse()?;
        let config = ClientConfig::builder(api_key)
            .protocol(protocol)
            .host(self.host.unwrap_or_else(|| "127.0.0.1".to_string()))
            .port(self.port.unwrap_or(DEFAULT_PORT))
            .verify_ssl(self.verify_ssl)
            .timeout(
                self.timeout_secs
                    .map(Duration::from_secs)
                    .unwrap_or(DEFAULT_TIMEOUT),
            )
            .build()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout belongs to the protocol; all diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = args.into_config()?;

    tracing::info!(
        endpoint = %config.base_url(),
        "connecting to vault API"
    );

    let client = Arc::new(VaultClient::new(config)?);
    let registry = ToolRegistry::with_default_tools(client)?;

    McpServer::new(registry).run_stdio().await
}

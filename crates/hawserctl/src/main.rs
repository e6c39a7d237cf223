//! hawserctl: command-line client for the pinning network.
//!
//! # Usage
//!
//! ```text
//! hawserctl --config hawser.toml put ./photo.jpg
//! hawserctl --config hawser.toml get bafy-abc123 --output photo.jpg
//! hawserctl --config hawser.toml pin bafy-abc123
//! hawserctl --config hawser.toml unpin bafy-abc123 --local
//! hawserctl --config hawser.toml pins --scope remote
//! ```
//!
//! Identifiers and payloads print on stdout; logs go to stderr.

mod config;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use bytes::Bytes;
use clap::{Parser, Subcommand};
use hawser_client::HawserClient;
use hawser_net::HttpPinningService;
use hawser_registry::PinRegistry;
use hawser_types::{ContentId, PinScope};
use url::Url;

use crate::config::CliConfig;

#[derive(Parser)]
#[command(name = "hawserctl", version, about = "Content-addressed storage client")]
struct Cli {
    /// Path to a TOML config file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level filter override.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a file and print its content identifier.
    Put {
        /// File to upload.
        path: PathBuf,
    },
    /// Retrieve content by identifier.
    Get {
        /// Content identifier to fetch.
        id: String,
        /// Write the payload to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Pin content on the remote service and record it.
    Pin {
        /// Content identifier to pin.
        id: String,
        /// Record under the local scope instead of remote.
        #[arg(long)]
        local: bool,
    },
    /// Release a pin.
    Unpin {
        /// Content identifier to unpin.
        id: String,
        /// Record under the local scope instead of remote.
        #[arg(long)]
        local: bool,
    },
    /// List pinned content identifiers.
    Pins {
        /// Scope to list: "local" or "remote".
        #[arg(long, default_value = "remote")]
        scope: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = CliConfig::load(cli.config.as_deref()).context("failed to load config")?;
    let level = cli.log_level.as_deref().unwrap_or(&config.log.level);
    setup_tracing(level);

    let client = build_client(&config)?;

    match cli.command {
        Commands::Put { path } => cmd_put(&client, &config, path).await,
        Commands::Get { id, output } => cmd_get(&client, id, output).await,
        Commands::Pin { id, local } => cmd_pin(&client, id, scope_for(local)).await,
        Commands::Unpin { id, local } => cmd_unpin(&client, id, scope_for(local)).await,
        Commands::Pins { scope } => cmd_pins(&client, &scope),
    }
}

fn setup_tracing(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn scope_for(local: bool) -> PinScope {
    if local { PinScope::Local } else { PinScope::Remote }
}

fn parse_scope(raw: &str) -> anyhow::Result<PinScope> {
    match raw {
        "local" => Ok(PinScope::Local),
        "remote" => Ok(PinScope::Remote),
        other => anyhow::bail!("unknown scope {other:?}, expected \"local\" or \"remote\""),
    }
}

fn build_client(config: &CliConfig) -> anyhow::Result<HawserClient> {
    let endpoint = config
        .api
        .endpoint
        .as_deref()
        .context("no pinning endpoint configured; set [api] endpoint")?;
    let endpoint =
        Url::parse(endpoint).with_context(|| format!("invalid pinning endpoint {endpoint:?}"))?;
    let token = config
        .api
        .token
        .clone()
        .context("no credential configured; set [api] token")?;

    let registry_path = config.registry_path();
    std::fs::create_dir_all(&registry_path)
        .with_context(|| format!("failed to create registry dir {}", registry_path.display()))?;
    let registry = PinRegistry::open(&registry_path)
        .with_context(|| format!("failed to open pin registry at {}", registry_path.display()))?;

    let pinning = Arc::new(HttpPinningService::new(endpoint, token));
    Ok(HawserClient::new(config.to_client_config()?, pinning, registry)?)
}

async fn cmd_put(client: &HawserClient, config: &CliConfig, path: PathBuf) -> anyhow::Result<()> {
    let credential = config
        .api
        .token
        .clone()
        .context("no credential configured; set [api] token")?;
    let payload =
        std::fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;

    let receipt = client
        .upload(Bytes::from(payload), &credential)
        .await
        .with_context(|| format!("failed to upload {}", path.display()))?;

    println!("{}", receipt.content_id);
    if receipt.is_chunked() {
        for (i, part) in receipt.part_ids.iter().enumerate() {
            println!("  part {i}: {part}");
        }
    }
    Ok(())
}

async fn cmd_get(
    client: &HawserClient,
    id: String,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let id = ContentId::from(id);
    let payload = client
        .retrieve(&id)
        .await
        .with_context(|| format!("failed to retrieve {id}"))?;

    match output {
        Some(path) => {
            std::fs::write(&path, &payload)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("wrote {} bytes to {}", payload.len(), path.display());
        }
        None => {
            std::io::stdout()
                .write_all(&payload)
                .context("failed to write payload to stdout")?;
        }
    }
    Ok(())
}

async fn cmd_pin(client: &HawserClient, id: String, scope: PinScope) -> anyhow::Result<()> {
    let id = ContentId::from(id);
    client
        .pin(&id, scope)
        .await
        .with_context(|| format!("failed to pin {id}"))?;
    println!("pinned {id} ({scope})");
    Ok(())
}

async fn cmd_unpin(client: &HawserClient, id: String, scope: PinScope) -> anyhow::Result<()> {
    let id = ContentId::from(id);
    client
        .unpin(&id, scope)
        .await
        .with_context(|| format!("failed to unpin {id}"))?;
    println!("unpinned {id} ({scope})");
    Ok(())
}

fn cmd_pins(client: &HawserClient, scope: &str) -> anyhow::Result<()> {
    let scope = parse_scope(scope)?;
    let records = client
        .list_pinned(scope)
        .with_context(|| format!("failed to list {scope} pins"))?;

    if records.is_empty() {
        println!("no pinned content ({scope})");
        return Ok(());
    }
    for record in records {
        println!("{}\tupdated_at={}", record.content_id, record.updated_at);
    }
    Ok(())
}

//! CraftBridge launcher
//!
//! Wires the bridge to a console chat transport: lines typed on stdin
//! that start with the command prefix are dispatched, replies and relayed
//! server output appear on stdout. Ctrl-C triggers the two-phase
//! shutdown of the managed server before exiting.

mod console;

use anyhow::Result;
use clap::Parser;
use craftbridge::{Bridge, BridgeConfig};
use craftbridge_core::{CMD_PREFIX, ChatTransport, MemoryRange, ServerFlavor};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "craftbridge", about = "Chat bridge for a managed Minecraft server")]
struct Args {
    /// Token used to authenticate against the chat backend
    #[arg(short = 't', long, env = "CHAT_TOKEN", default_value = "")]
    chat_token: String,

    /// Chat channel the bridge listens on and relays to
    #[arg(short = 'c', long, env = "CHAT_CHANNEL_ID", default_value = "")]
    chat_channel_id: String,

    /// Directory the server executable is in
    #[arg(short = 'd', long, env = "SERVER_INSTALL_DIRECTORY")]
    server_install_directory: PathBuf,

    /// Type of server to run
    #[arg(short = 'y', long, env = "SERVER_FLAVOR", default_value = "bedrock")]
    server_flavor: ServerFlavor,

    /// (Java only) minimum server memory to allocate, in MB
    #[arg(short = 'm', long, env = "JAVA_MEMORY_MIN", default_value_t = 1024)]
    java_memory_min: u32,

    /// (Java only) maximum server memory to allocate, in MB
    #[arg(short = 'x', long, env = "JAVA_MEMORY_MAX", default_value_t = 1024)]
    java_memory_max: u32,
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    info!(
        flavor = %args.server_flavor,
        channel = %args.chat_channel_id,
        authenticated = !args.chat_token.is_empty(),
        "starting craftbridge"
    );

    let mut config = BridgeConfig::new(args.server_install_directory, args.server_flavor);
    config.memory = MemoryRange {
        min_mb: args.java_memory_min,
        max_mb: args.java_memory_max,
    };

    let mut bridge = Bridge::new(config)?;
    let transport: Arc<dyn ChatTransport> = Arc::new(console::ConsoleTransport::new());
    bridge.start_loops(transport.clone());

    run_console(&bridge, transport.as_ref()).await;

    // Mandatory even when the inbound loop ends abnormally
    bridge.shutdown().await;
    info!("processes exited successfully, quitting");
    Ok(())
}

/// Inbound command loop: read chat-originated lines from stdin until
/// EOF or Ctrl-C.
async fn run_console(bridge: &Bridge, transport: &dyn ChatTransport) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("interrupt received, shutting down");
                break;
            }
            line = lines.next_line() => {
                match line {
                    Ok(Some(text)) => {
                        let Some(command) = text.trim().strip_prefix(CMD_PREFIX) else {
                            continue;
                        };
                        if let Some(reply) = bridge.dispatch(command, "console").await {
                            if let Err(e) = transport.send(&reply).await {
                                warn!(error = %e, "failed to deliver reply");
                            }
                        }
                    }
                    Ok(None) => {
                        info!("input closed (EOF)");
                        break;
                    }
                    Err(e) => {
                        warn!(error = %e, "failed to read input");
                        break;
                    }
                }
            }
        }
    }
}

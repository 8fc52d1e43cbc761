//! edge-mcp — entry point.

use std::time::Duration;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use edge_mcp::config::{resolve_endpoint, ClientConfig, ENDPOINT_ENV};
use edge_mcp::tools::register_builtin;
use edge_mcp::types::{InitializeResult, ToolDefinition};
use edge_mcp::{McpClient, ToolRegistry};

#[derive(Parser)]
#[command(
    name = "edge-mcp",
    about = "MCP client over WebSocket — exposes local tools to a remote MCP server",
    version
)]
struct Cli {
    /// MCP endpoint (ws://host[:port][/path] or wss://...).
    /// Also reads from the MCP_ENDPOINT env var.
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect and serve tools until interrupted (default).
    Connect {
        /// MCP endpoint URL.
        #[arg(short, long)]
        endpoint: Option<String>,

        /// Interval between client ticks, in milliseconds.
        #[arg(long, default_value_t = 10)]
        tick_ms: u64,

        /// Initial reconnection wait, in milliseconds.
        #[arg(long)]
        initial_backoff_ms: Option<u64>,

        /// Maximum reconnection wait, in milliseconds.
        #[arg(long)]
        max_backoff_ms: Option<u64>,

        /// WebSocket ping interval, in seconds.
        #[arg(long)]
        ping_interval_secs: Option<u64>,

        /// Reset the connection when no MCP ping arrived for this many seconds.
        #[arg(long)]
        heartbeat_window_secs: Option<u64>,

        /// Do not register the built-in tools.
        #[arg(long)]
        no_builtin_tools: bool,
    },

    /// Print client capabilities and built-in tools as JSON.
    Info,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   edge-mcp completions bash > ~/.local/share/bash-completion/completions/edge-mcp
    ///   edge-mcp completions zsh > ~/.zfunc/_edge-mcp
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command.unwrap_or(Commands::Connect {
        endpoint: None,
        tick_ms: 10,
        initial_backoff_ms: None,
        max_backoff_ms: None,
        ping_interval_secs: None,
        heartbeat_window_secs: None,
        no_builtin_tools: false,
    }) {
        Commands::Connect {
            endpoint,
            tick_ms,
            initial_backoff_ms,
            max_backoff_ms,
            ping_interval_secs,
            heartbeat_window_secs,
            no_builtin_tools,
        } => {
            let effective_endpoint = endpoint.or(cli.endpoint);
            let Some(endpoint) = resolve_endpoint(effective_endpoint.as_deref()) else {
                anyhow::bail!("No endpoint given; pass --endpoint or set {ENDPOINT_ENV}");
            };

            let mut config = ClientConfig::default();
            if let Some(ms) = initial_backoff_ms {
                config.connection.initial_backoff = Duration::from_millis(ms);
            }
            if let Some(ms) = max_backoff_ms {
                config.connection.max_backoff = Duration::from_millis(ms);
            }
            if let Some(secs) = ping_interval_secs {
                config.heartbeat.ping_interval = Duration::from_secs(secs);
            }
            if let Some(secs) = heartbeat_window_secs {
                config.connection.heartbeat_window = Duration::from_secs(secs);
            }

            run(endpoint, config, Duration::from_millis(tick_ms.max(1)), !no_builtin_tools).await?;
        }

        Commands::Info => {
            let capabilities = InitializeResult::default_result();
            let mut tools = ToolRegistry::new();
            register_builtin(&mut tools)?;
            let definitions: Vec<ToolDefinition> = tools.iter().map(ToolDefinition::from).collect();
            let info = serde_json::json!({
                "server": capabilities.server_info,
                "protocol_version": capabilities.protocol_version,
                "capabilities": capabilities.capabilities,
                "tools": definitions,
                "tool_count": definitions.len(),
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "edge-mcp", &mut std::io::stdout());
        }
    }

    Ok(())
}

async fn run(
    endpoint: String,
    config: ClientConfig,
    tick: Duration,
    builtin_tools: bool,
) -> anyhow::Result<()> {
    let mut client = McpClient::websocket(config, tokio::runtime::Handle::current());
    if builtin_tools {
        register_builtin(client.tools_mut())?;
    }
    tracing::info!("Serving {} tools", client.tool_count());

    client.begin(&endpoint, |connected| {
        if connected {
            tracing::info!("Status: connected");
        } else {
            tracing::info!("Status: disconnected");
        }
    })?;

    let mut interval = tokio::time::interval(tick);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = interval.tick() => client.tick(),
            _ = &mut shutdown => {
                tracing::info!("Interrupted, shutting down");
                break;
            }
        }
    }

    client.shutdown();
    Ok(())
}

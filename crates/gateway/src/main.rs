use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use lg_catalog::OperationRegistry;
use lg_gateway::cli::{Cli, Command};
use lg_gateway::http::HttpState;
use lg_gateway::mcp::McpConnection;
use lg_gateway::sessions::CredentialStore;
use lg_gateway::{cli, http, stdio};
use lg_gitlab::RestGitLabClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let parsed = Cli::parse();

    match parsed.command {
        // Default to stdio serve when no subcommand is given.
        None => run_stdio(None).await,
        Some(Command::Serve { config }) => run_stdio(config.as_deref()).await,
        Some(Command::ServeHttp { config, listen }) => {
            run_http(config.as_deref(), listen.as_deref()).await
        }
        Some(Command::Version) => {
            println!("labgate {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Single-tenant stdio mode: one static credential for the process.
/// A missing credential is fatal at startup.
async fn run_stdio(config_path: Option<&std::path::Path>) -> anyhow::Result<()> {
    // stdout carries protocol frames; logs must go to stderr.
    init_tracing(true);

    let config = cli::load_config(config_path)?;
    let Some(token) = config.gitlab.token.clone().filter(|t| !t.is_empty()) else {
        anyhow::bail!(
            "no GitLab credential configured: set gitlab.token in config.toml \
             or the GITLAB_TOKEN environment variable"
        );
    };

    let registry = Arc::new(OperationRegistry::new());
    let client = Arc::new(RestGitLabClient::new(&config.gitlab, token)?);
    tracing::info!(
        base_url = %config.gitlab.base_url,
        operations = registry.len(),
        "LabGate ready"
    );

    stdio::serve(McpConnection::new(registry, client)).await
}

/// Multi-tenant HTTP mode: credentials are bound per session at
/// `initialize` time; no process-wide token is required.
async fn run_http(
    config_path: Option<&std::path::Path>,
    listen: Option<&str>,
) -> anyhow::Result<()> {
    init_tracing(false);

    let config = cli::load_config(config_path)?;
    let addr: std::net::SocketAddr = match listen {
        Some(listen) => listen.parse()?,
        None => format!("{}:{}", config.server.host, config.server.port).parse()?,
    };

    let state = HttpState {
        registry: Arc::new(OperationRegistry::new()),
        credentials: Arc::new(CredentialStore::new()),
        template: RestGitLabClient::new(&config.gitlab, "")?,
    };
    tracing::info!(
        base_url = %config.gitlab.base_url,
        operations = state.registry.len(),
        "LabGate ready"
    );

    http::serve(addr, state).await
}

fn init_tracing(to_stderr: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,lg_gateway=debug"));

    if to_stderr {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    }
}

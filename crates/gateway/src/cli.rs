//! CLI definition and configuration loading.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use lg_domain::config::Config;

#[derive(Parser)]
#[command(name = "labgate", version, about = "GitLab MCP bridge for automated agents")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Serve MCP over stdio with one static credential (default).
    Serve {
        /// Path to config.toml (defaults to ./config.toml when present).
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Serve MCP over HTTP, binding one credential per session.
    ServeHttp {
        #[arg(long)]
        config: Option<PathBuf>,
        /// Listen address, overriding `server.host`/`server.port`.
        #[arg(long)]
        listen: Option<String>,
    },
    /// Print the version.
    Version,
}

/// Load configuration: optional TOML file, then environment overrides.
///
/// `GITLAB_TOKEN` and `GITLAB_API_URL` take precedence over the file so
/// containerized deployments can run config-less.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = match path {
        Some(path) => read_config(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => {
            let default = Path::new("config.toml");
            if default.exists() {
                read_config(default).context("loading config from ./config.toml")?
            } else {
                Config::default()
            }
        }
    };

    if let Ok(token) = std::env::var("GITLAB_TOKEN") {
        if !token.is_empty() {
            config.gitlab.token = Some(token);
        }
    }
    if let Ok(base_url) = std::env::var("GITLAB_API_URL") {
        if !base_url.is_empty() {
            config.gitlab.base_url = base_url;
        }
    }

    Ok(config)
}

fn read_config(path: &Path) -> anyhow::Result<Config> {
    let raw = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&raw)?)
}

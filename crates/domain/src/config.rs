use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub gitlab: GitLabConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

// ── GitLab connection ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitLabConfig {
    /// Base URL of the GitLab v4 REST API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Access token sent verbatim in the `PRIVATE-TOKEN` header.
    /// Overridden by the `GITLAB_TOKEN` environment variable.
    #[serde(default)]
    pub token: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GitLabConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

// ── HTTP server (multi-tenant mode) ────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

// ── Defaults ───────────────────────────────────────────────────────

fn default_base_url() -> String {
    "https://gitlab.com/api/v4".into()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    3340
}

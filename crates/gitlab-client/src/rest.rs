//! REST implementation of [`GitLabProvider`].
//!
//! `RestGitLabClient` wraps a `reqwest::Client` and translates every trait
//! method into the corresponding HTTP call against the real GitLab API.
//! Failures are classified at this boundary: transport errors become
//! `Error::Connectivity`, non-2xx replies become `Error::Remote` with a
//! message extracted from the response body.  Nothing is retried.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::{Map, Value};
use url::Url;

use lg_domain::config::GitLabConfig;
use lg_domain::error::{Error, Result};

use crate::provider::GitLabProvider;

/// Header carrying the access token, verbatim, on every request.
const TOKEN_HEADER: &str = "PRIVATE-TOKEN";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Client
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A REST-based client for the GitLab v4 API.
///
/// Created once and reused; the underlying `reqwest::Client` maintains a
/// connection pool.  [`RestGitLabClient::with_token`] produces a sibling
/// bound to a different credential that shares the same pool.  This is how
/// the multi-tenant gateway binds per-session tokens.
#[derive(Debug, Clone)]
pub struct RestGitLabClient {
    http: Client,
    base_url: String,
    token: String,
}

impl RestGitLabClient {
    /// Build a new client from the shared [`GitLabConfig`].
    pub fn new(cfg: &GitLabConfig, token: impl Into<String>) -> Result<Self> {
        let base_url = cfg.base_url.trim_end_matches('/').to_owned();
        Url::parse(&base_url)
            .map_err(|e| Error::Config(format!("invalid GitLab base URL '{base_url}': {e}")))?;

        let http = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("building HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url,
            token: token.into(),
        })
    }

    /// A sibling client bound to `token`, sharing the connection pool.
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            token: token.into(),
        }
    }

    /// Build the full URL for a path like `/projects/42/hooks`.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a decorated request and classify the outcome.
    ///
    /// Returns the raw response on 2xx; otherwise raises `Connectivity`
    /// (no response obtained) or `Remote` (non-success status).
    async fn execute(&self, rb: RequestBuilder, endpoint: &str) -> Result<Response> {
        let resp = rb
            .header(TOKEN_HEADER, self.token.as_str())
            .send()
            .await
            .map_err(|e| Error::Connectivity(e.to_string()))?;

        let status = resp.status();
        tracing::debug!(endpoint = %endpoint, status = status.as_u16(), "GitLab API call");

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Remote {
                status: status.as_u16(),
                message: remote_message(&body),
            });
        }
        Ok(resp)
    }

    async fn parse_json(resp: Response) -> Result<Value> {
        let body = resp
            .text()
            .await
            .map_err(|e| Error::Connectivity(e.to_string()))?;
        Ok(serde_json::from_str(&body)?)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Trait implementation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[async_trait]
impl GitLabProvider for RestGitLabClient {
    async fn get(&self, path: &str, query: &[(String, String)]) -> Result<Value> {
        let mut rb = self.http.get(self.url(path));
        if !query.is_empty() {
            rb = rb.query(query);
        }
        let resp = self.execute(rb, path).await?;
        Self::parse_json(resp).await
    }

    async fn post(&self, path: &str, body: &Map<String, Value>) -> Result<Value> {
        let rb = self.http.post(self.url(path)).json(body);
        let resp = self.execute(rb, path).await?;
        Self::parse_json(resp).await
    }

    async fn put(&self, path: &str, body: &Map<String, Value>) -> Result<Value> {
        let rb = self.http.put(self.url(path)).json(body);
        let resp = self.execute(rb, path).await?;
        Self::parse_json(resp).await
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let rb = self.http.delete(self.url(path));
        self.execute(rb, path).await?;
        Ok(())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Error-body message extraction
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Extract a human message from a GitLab error body.
///
/// Precedence: the body's `message` field, then its `error` field, then
/// the whole structure serialized, then the raw text when the body is not
/// JSON at all.  Never fails.
fn remote_message(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(parsed) => {
            if let Some(m) = parsed.get("message") {
                field_text(m)
            } else if let Some(m) = parsed.get("error") {
                field_text(m)
            } else {
                parsed.to_string()
            }
        }
        Err(_) => body.to_owned(),
    }
}

/// GitLab sometimes nests structured detail under `message`; keep strings
/// bare and serialize anything else.
fn field_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> RestGitLabClient {
        let cfg = GitLabConfig {
            base_url: base_url.into(),
            token: None,
            timeout_secs: 5,
        };
        RestGitLabClient::new(&cfg, "secret").unwrap()
    }

    #[test]
    fn url_joins_base_and_path() {
        let client = test_client("https://gitlab.example.com/api/v4");
        assert_eq!(
            client.url("/projects/42/hooks"),
            "https://gitlab.example.com/api/v4/projects/42/hooks"
        );
    }

    #[test]
    fn trailing_slash_on_base_url_is_trimmed() {
        let client = test_client("https://gitlab.example.com/api/v4/");
        assert_eq!(
            client.url("/groups"),
            "https://gitlab.example.com/api/v4/groups"
        );
    }

    #[test]
    fn invalid_base_url_is_a_config_error() {
        let cfg = GitLabConfig {
            base_url: "not a url".into(),
            token: None,
            timeout_secs: 5,
        };
        assert!(matches!(
            RestGitLabClient::new(&cfg, ""),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn with_token_rebinds_credential_only() {
        let client = test_client("https://gitlab.example.com/api/v4");
        let other = client.with_token("rotated");
        assert_eq!(other.token, "rotated");
        assert_eq!(other.base_url, client.base_url);
    }

    #[test]
    fn remote_message_prefers_message_field() {
        let body = r#"{"message":"404 Project Not Found","error":"ignored"}"#;
        assert_eq!(remote_message(body), "404 Project Not Found");
    }

    #[test]
    fn remote_message_falls_back_to_error_field() {
        let body = r#"{"error":"insufficient_scope"}"#;
        assert_eq!(remote_message(body), "insufficient_scope");
    }

    #[test]
    fn remote_message_serializes_structured_message() {
        let body = r#"{"message":{"name":["has already been taken"]}}"#;
        assert_eq!(remote_message(body), r#"{"name":["has already been taken"]}"#);
    }

    #[test]
    fn remote_message_serializes_whole_body_without_known_fields() {
        let body = r#"{"detail":"weird"}"#;
        assert_eq!(remote_message(body), r#"{"detail":"weird"}"#);
    }

    #[test]
    fn remote_message_passes_non_json_through() {
        assert_eq!(remote_message("502 Bad Gateway"), "502 Bad Gateway");
    }
}

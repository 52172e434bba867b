//! The `GitLabProvider` trait defines the interface for all GitLab
//! backends (REST, mock/test).

use async_trait::async_trait;
use serde_json::{Map, Value};

use lg_domain::error::Result;

/// Abstraction over the GitLab v4 API transport.
///
/// One method per HTTP verb the catalog emits.  `path` is always relative
/// to the configured base URL, with every placeholder segment already
/// percent-encoded by the caller.  Responses are passed through as opaque
/// JSON; failures are classified into the shared error taxonomy.
#[async_trait]
pub trait GitLabProvider: Send + Sync {
    /// Fetch a resource.  A non-empty `query` is appended URL-encoded;
    /// an empty one appends nothing.
    async fn get(&self, path: &str, query: &[(String, String)]) -> Result<Value>;

    /// Create a resource with a JSON body.
    async fn post(&self, path: &str, body: &Map<String, Value>) -> Result<Value>;

    /// Replace fields of a resource with a JSON body.
    async fn put(&self, path: &str, body: &Map<String, Value>) -> Result<Value>;

    /// Remove a resource.  The response body, if any, is never parsed;
    /// success statuses like 204 carry none.
    async fn delete(&self, path: &str) -> Result<()>;
}

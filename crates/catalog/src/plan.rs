//! Request-plan types shared by every catalog entry.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::{Map, Value};

use lg_domain::error::Result;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Types
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// HTTP method of an outbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

/// A fully-resolved outbound request, ready for the remote client.
///
/// `path` is relative to the configured base URL with every placeholder
/// segment already percent-encoded.  `query` is only ever non-empty for
/// GET; `body` only ever present for POST/PUT.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestPlan {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Map<String, Value>>,
}

impl RequestPlan {
    pub fn get(path: String) -> Self {
        Self {
            method: Method::Get,
            path,
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get_with_query(path: String, query: Vec<(String, String)>) -> Self {
        Self {
            method: Method::Get,
            path,
            query,
            body: None,
        }
    }

    pub fn post(path: String, body: Map<String, Value>) -> Self {
        Self {
            method: Method::Post,
            path,
            query: Vec::new(),
            body: Some(body),
        }
    }

    pub fn put(path: String, body: Map<String, Value>) -> Self {
        Self {
            method: Method::Put,
            path,
            query: Vec::new(),
            body: Some(body),
        }
    }

    pub fn delete(path: String) -> Self {
        Self {
            method: Method::Delete,
            path,
            query: Vec::new(),
            body: None,
        }
    }
}

/// One exposed operation: the schema shown to the protocol layer plus the
/// pure mapping from a raw input map to a request plan.
///
/// `build` validates and maps in one pass: a validation failure means no
/// plan, so no partially-validated call can ever reach the remote client.
pub struct OperationSpec {
    pub name: &'static str,
    pub description: &'static str,
    /// JSON Schema for the operation's input fields.
    pub schema: fn() -> Value,
    /// Validate `input` and produce the outbound request plan.
    pub build: fn(&Map<String, Value>) -> Result<RequestPlan>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Path / body / query helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Everything outside the unreserved set is escaped when a value becomes a
/// path segment, so identifiers like `group/project` survive as a single
/// `%2F`-joined segment instead of splitting the path.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode one path segment.
pub fn encode_path_segment(raw: &str) -> String {
    utf8_percent_encode(raw, SEGMENT).to_string()
}

/// Insert `key` into a body map only when the caller actually supplied a
/// value.  Omitted optional fields stay entirely absent from the JSON;
/// the remote treats "absent" and "explicitly null" differently.
pub fn insert_opt(body: &mut Map<String, Value>, key: &str, value: Option<impl Into<Value>>) {
    if let Some(v) = value {
        body.insert(key.to_owned(), v.into());
    }
}

/// Append a query pair when the caller supplied a value.  Values arrive
/// already coerced to their string form (`true` → `"true"`, `30` → `"30"`).
pub fn query_opt(query: &mut Vec<(String, String)>, key: &str, value: Option<String>) {
    if let Some(v) = value {
        query.push((key.to_owned(), v));
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

//! The uniform wrapper every operation invocation passes through.
//!
//! Validate, build, send, normalize: a validation failure short-circuits
//! before any request exists, and every failure kind is rendered with a
//! fixed prefix so automated callers can classify errors from the message
//! alone.  No failure escapes this boundary un-normalized.

use serde_json::Value;

use lg_domain::error::Error;
use lg_gitlab::GitLabProvider;

use crate::plan::Method;
use crate::registry::OperationRegistry;

/// Dispatch a single tool call. Returns `(result_content, is_error)`.
///
/// At most one outbound request per invocation; deletions render a fixed
/// `{"status": "success"}` marker instead of the remote's empty body.
pub async fn dispatch(
    provider: &dyn GitLabProvider,
    registry: &OperationRegistry,
    name: &str,
    arguments: &Value,
) -> (String, bool) {
    let Some(spec) = registry.get(name) else {
        return (format!("unknown operation: '{name}'"), true);
    };

    let empty = serde_json::Map::new();
    let input = match arguments {
        Value::Object(map) => map,
        Value::Null => &empty,
        _ => {
            return (
                "invalid arguments: expected an object".to_owned(),
                true,
            )
        }
    };

    let plan = match (spec.build)(input) {
        Ok(plan) => plan,
        Err(e) => return (render_error(e), true),
    };

    tracing::debug!(
        tool = name,
        method = ?plan.method,
        path = %plan.path,
        "dispatching GitLab call"
    );

    let result = match plan.method {
        Method::Get => provider.get(&plan.path, &plan.query).await,
        Method::Post => {
            provider
                .post(&plan.path, plan.body.as_ref().unwrap_or(&empty))
                .await
        }
        Method::Put => {
            provider
                .put(&plan.path, plan.body.as_ref().unwrap_or(&empty))
                .await
        }
        Method::Delete => provider
            .delete(&plan.path)
            .await
            .map(|()| serde_json::json!({ "status": "success" })),
    };

    match result {
        Ok(payload) => match serde_json::to_string_pretty(&payload) {
            Ok(text) => (text, false),
            Err(e) => (render_error(Error::Json(e)), true),
        },
        Err(e) => (render_error(e), true),
    }
}

/// Render a failure with its fixed, parseable kind prefix.
fn render_error(error: Error) -> String {
    match error {
        Error::Validation { field, message } => {
            format!("validation error: {field}: {message}")
        }
        Error::Remote { status, message } => {
            format!("GitLab API error: {status}: {message}")
        }
        Error::Connectivity(cause) => format!("connection error: {cause}"),
        other => format!("unexpected error: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_identify_the_failure_kind() {
        assert_eq!(
            render_error(Error::validation("value", "is required")),
            "validation error: value: is required"
        );
        assert_eq!(
            render_error(Error::Remote {
                status: 404,
                message: "404 Project Not Found".into()
            }),
            "GitLab API error: 404: 404 Project Not Found"
        );
        assert_eq!(
            render_error(Error::Connectivity("connection refused".into())),
            "connection error: connection refused"
        );
        assert_eq!(
            render_error(Error::Config("boom".into())),
            "unexpected error: config: boom"
        );
    }
}

//! CI/CD variable operations (`/projects/:id/variables`).

use serde_json::{json, Map, Value};

use lg_domain::error::Result;

use crate::plan::{encode_path_segment, insert_opt, OperationSpec, RequestPlan};
use crate::validate::{optional_bool, optional_enum, optional_str, require_str, Input};

/// The two storage kinds a variable can have on the remote.
const VARIABLE_TYPES: &[&str] = &["env_var", "file"];

pub fn specs() -> Vec<OperationSpec> {
    vec![
        OperationSpec {
            name: "create_ci_variable",
            description: "Create a CI/CD variable on a GitLab project.",
            schema: create_schema,
            build: build_create,
        },
        OperationSpec {
            name: "list_ci_variables",
            description: "List the CI/CD variables of a GitLab project.",
            schema: list_schema,
            build: build_list,
        },
        OperationSpec {
            name: "update_ci_variable",
            description: "Update the value or settings of a project CI/CD variable.",
            schema: update_schema,
            build: build_update,
        },
        OperationSpec {
            name: "delete_ci_variable",
            description: "Delete a CI/CD variable from a GitLab project.",
            schema: delete_schema,
            build: build_delete,
        },
    ]
}

fn variables_path(project_id: &str) -> String {
    format!("/projects/{}/variables", encode_path_segment(project_id))
}

// ── Builders ───────────────────────────────────────────────────────

/// Optional settings shared by create and update.
fn variable_settings(input: &Input, body: &mut Map<String, Value>) -> Result<()> {
    insert_opt(
        body,
        "variable_type",
        optional_enum(input, "variable_type", VARIABLE_TYPES)?,
    );
    insert_opt(body, "protected", optional_bool(input, "protected")?);
    insert_opt(body, "masked", optional_bool(input, "masked")?);
    insert_opt(body, "raw", optional_bool(input, "raw")?);
    insert_opt(
        body,
        "environment_scope",
        optional_str(input, "environment_scope")?,
    );
    Ok(())
}

fn build_create(input: &Input) -> Result<RequestPlan> {
    let project_id = require_str(input, "project_id")?;
    let key = require_str(input, "key")?;
    let value = require_str(input, "value")?;

    let mut body = Map::new();
    body.insert("key".to_owned(), Value::from(key));
    body.insert("value".to_owned(), Value::from(value));
    variable_settings(input, &mut body)?;
    Ok(RequestPlan::post(variables_path(project_id), body))
}

fn build_list(input: &Input) -> Result<RequestPlan> {
    let project_id = require_str(input, "project_id")?;
    Ok(RequestPlan::get(variables_path(project_id)))
}

fn build_update(input: &Input) -> Result<RequestPlan> {
    let project_id = require_str(input, "project_id")?;
    let key = require_str(input, "key")?;
    let value = require_str(input, "value")?;

    let mut body = Map::new();
    body.insert("value".to_owned(), Value::from(value));
    variable_settings(input, &mut body)?;
    let path = format!("{}/{}", variables_path(project_id), encode_path_segment(key));
    Ok(RequestPlan::put(path, body))
}

fn build_delete(input: &Input) -> Result<RequestPlan> {
    let project_id = require_str(input, "project_id")?;
    let key = require_str(input, "key")?;
    let path = format!("{}/{}", variables_path(project_id), encode_path_segment(key));
    Ok(RequestPlan::delete(path))
}

// ── Schemas ────────────────────────────────────────────────────────

fn settings_properties() -> Value {
    json!({
        "variable_type": { "type": "string", "enum": ["env_var", "file"], "description": "How the runner exposes the variable" },
        "protected": { "type": "boolean", "description": "Only expose on protected refs" },
        "masked": { "type": "boolean", "description": "Hide the value in job logs" },
        "raw": { "type": "boolean", "description": "Disable variable reference expansion" },
        "environment_scope": { "type": "string", "description": "Environment scope the variable applies to" }
    })
}

fn create_schema() -> Value {
    let mut properties = json!({
        "project_id": { "type": "string", "description": "Project ID or URL-encoded path" },
        "key": { "type": "string", "description": "Variable name" },
        "value": { "type": "string", "description": "Variable value" }
    });
    merge(&mut properties, settings_properties());
    json!({
        "type": "object",
        "properties": properties,
        "required": ["project_id", "key", "value"]
    })
}

fn list_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "project_id": { "type": "string", "description": "Project ID or URL-encoded path" }
        },
        "required": ["project_id"]
    })
}

fn update_schema() -> Value {
    let mut properties = json!({
        "project_id": { "type": "string", "description": "Project ID or URL-encoded path" },
        "key": { "type": "string", "description": "Variable name" },
        "value": { "type": "string", "description": "New variable value" }
    });
    merge(&mut properties, settings_properties());
    json!({
        "type": "object",
        "properties": properties,
        "required": ["project_id", "key", "value"]
    })
}

fn delete_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "project_id": { "type": "string", "description": "Project ID or URL-encoded path" },
            "key": { "type": "string", "description": "Variable name" }
        },
        "required": ["project_id", "key"]
    })
}

fn merge(target: &mut Value, extra: Value) {
    if let (Some(target), Some(extra)) = (target.as_object_mut(), extra.as_object()) {
        for (k, v) in extra {
            target.insert(k.clone(), v.clone());
        }
    }
}

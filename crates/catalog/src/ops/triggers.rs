//! Pipeline-trigger operations (`/projects/:id/triggers`).

use serde_json::{json, Map, Value};

use lg_domain::error::Result;

use crate::plan::{encode_path_segment, OperationSpec, RequestPlan};
use crate::validate::{require_number, require_str, Input};

pub fn specs() -> Vec<OperationSpec> {
    vec![
        OperationSpec {
            name: "create_pipeline_trigger",
            description: "Create a pipeline trigger token on a GitLab project.",
            schema: create_schema,
            build: build_create,
        },
        OperationSpec {
            name: "list_pipeline_triggers",
            description: "List the pipeline triggers of a GitLab project.",
            schema: list_schema,
            build: build_list,
        },
        OperationSpec {
            name: "delete_pipeline_trigger",
            description: "Delete a pipeline trigger from a GitLab project.",
            schema: delete_schema,
            build: build_delete,
        },
    ]
}

fn triggers_path(project_id: &str) -> String {
    format!("/projects/{}/triggers", encode_path_segment(project_id))
}

// ── Builders ───────────────────────────────────────────────────────

fn build_create(input: &Input) -> Result<RequestPlan> {
    let project_id = require_str(input, "project_id")?;
    let description = require_str(input, "description")?;

    let mut body = Map::new();
    body.insert("description".to_owned(), Value::from(description));
    Ok(RequestPlan::post(triggers_path(project_id), body))
}

fn build_list(input: &Input) -> Result<RequestPlan> {
    let project_id = require_str(input, "project_id")?;
    Ok(RequestPlan::get(triggers_path(project_id)))
}

fn build_delete(input: &Input) -> Result<RequestPlan> {
    let project_id = require_str(input, "project_id")?;
    let trigger_id = require_number(input, "trigger_id")?;
    let path = format!("{}/{trigger_id}", triggers_path(project_id));
    Ok(RequestPlan::delete(path))
}

// ── Schemas ────────────────────────────────────────────────────────

fn create_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "project_id": { "type": "string", "description": "Project ID or URL-encoded path" },
            "description": { "type": "string", "description": "What the trigger is for" }
        },
        "required": ["project_id", "description"]
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

fn delete_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "project_id": { "type": "string", "description": "Project ID or URL-encoded path" },
            "trigger_id": { "type": "number", "description": "ID of the trigger" }
        },
        "required": ["project_id", "trigger_id"]
    })
}

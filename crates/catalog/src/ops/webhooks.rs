//! Project webhook operations (`/projects/:id/hooks`).

use serde_json::{json, Map, Value};

use lg_domain::error::Result;

use crate::plan::{encode_path_segment, insert_opt, OperationSpec, RequestPlan};
use crate::validate::{optional_bool, optional_str, require_number, require_str, Input};

/// Boolean trigger flags shared by create and update.
const EVENT_FLAGS: &[&str] = &[
    "push_events",
    "issues_events",
    "merge_requests_events",
    "tag_push_events",
    "pipeline_events",
    "wiki_page_events",
    "enable_ssl_verification",
];

pub fn specs() -> Vec<OperationSpec> {
    vec![
        OperationSpec {
            name: "create_webhook",
            description: "Add a webhook to a GitLab project.",
            schema: create_schema,
            build: build_create,
        },
        OperationSpec {
            name: "list_webhooks",
            description: "List the webhooks of a GitLab project.",
            schema: list_schema,
            build: build_list,
        },
        OperationSpec {
            name: "update_webhook",
            description: "Update an existing webhook of a GitLab project.",
            schema: update_schema,
            build: build_update,
        },
        OperationSpec {
            name: "delete_webhook",
            description: "Delete a webhook from a GitLab project.",
            schema: delete_schema,
            build: build_delete,
        },
    ]
}

fn hooks_path(project_id: &str) -> String {
    format!("/projects/{}/hooks", encode_path_segment(project_id))
}

// ── Builders ───────────────────────────────────────────────────────

fn hook_body(input: &Input, url: &str) -> Result<Map<String, Value>> {
    let mut body = Map::new();
    body.insert("url".to_owned(), Value::from(url));
    for &flag in EVENT_FLAGS {
        insert_opt(&mut body, flag, optional_bool(input, flag)?);
    }
    insert_opt(&mut body, "token", optional_str(input, "token")?);
    Ok(body)
}

fn build_create(input: &Input) -> Result<RequestPlan> {
    let project_id = require_str(input, "project_id")?;
    let url = require_str(input, "url")?;
    Ok(RequestPlan::post(hooks_path(project_id), hook_body(input, url)?))
}

fn build_list(input: &Input) -> Result<RequestPlan> {
    let project_id = require_str(input, "project_id")?;
    Ok(RequestPlan::get(hooks_path(project_id)))
}

fn build_update(input: &Input) -> Result<RequestPlan> {
    let project_id = require_str(input, "project_id")?;
    let hook_id = require_number(input, "hook_id")?;
    let url = require_str(input, "url")?;
    let path = format!("{}/{hook_id}", hooks_path(project_id));
    Ok(RequestPlan::put(path, hook_body(input, url)?))
}

fn build_delete(input: &Input) -> Result<RequestPlan> {
    let project_id = require_str(input, "project_id")?;
    let hook_id = require_number(input, "hook_id")?;
    let path = format!("{}/{hook_id}", hooks_path(project_id));
    Ok(RequestPlan::delete(path))
}

// ── Schemas ────────────────────────────────────────────────────────

fn flag_properties() -> Value {
    json!({
        "push_events": { "type": "boolean", "description": "Trigger on push events" },
        "issues_events": { "type": "boolean", "description": "Trigger on issue events" },
        "merge_requests_events": { "type": "boolean", "description": "Trigger on merge request events" },
        "tag_push_events": { "type": "boolean", "description": "Trigger on tag push events" },
        "pipeline_events": { "type": "boolean", "description": "Trigger on pipeline status changes" },
        "wiki_page_events": { "type": "boolean", "description": "Trigger on wiki page events" },
        "enable_ssl_verification": { "type": "boolean", "description": "Verify TLS when delivering" }
    })
}

fn create_schema() -> Value {
    let mut properties = json!({
        "project_id": { "type": "string", "description": "Project ID or URL-encoded path" },
        "url": { "type": "string", "description": "URL the hook is delivered to" },
        "token": { "type": "string", "description": "Secret token sent with each delivery" }
    });
    merge_objects(&mut properties, flag_properties());
    json!({
        "type": "object",
        "properties": properties,
        "required": ["project_id", "url"]
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
        "hook_id": { "type": "number", "description": "ID of the webhook" },
        "url": { "type": "string", "description": "URL the hook is delivered to" },
        "token": { "type": "string", "description": "Secret token sent with each delivery" }
    });
    merge_objects(&mut properties, flag_properties());
    json!({
        "type": "object",
        "properties": properties,
        "required": ["project_id", "hook_id", "url"]
    })
}

fn delete_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "project_id": { "type": "string", "description": "Project ID or URL-encoded path" },
            "hook_id": { "type": "number", "description": "ID of the webhook" }
        },
        "required": ["project_id", "hook_id"]
    })
}

fn merge_objects(target: &mut Value, extra: Value) {
    if let (Some(target), Some(extra)) = (target.as_object_mut(), extra.as_object()) {
        for (k, v) in extra {
            target.insert(k.clone(), v.clone());
        }
    }
}

//! Project access-token operations (`/projects/:id/access_tokens`).
//!
//! `access_level` is passed through as a plain number; `scopes` is left
//! to the remote to enforce when omitted.

use serde_json::{json, Map, Value};

use lg_domain::error::Result;

use crate::plan::{encode_path_segment, insert_opt, OperationSpec, RequestPlan};
use crate::validate::{
    optional_number, optional_str, optional_str_array, require_number, require_str, Input,
};

pub fn specs() -> Vec<OperationSpec> {
    vec![
        OperationSpec {
            name: "create_access_token",
            description: "Create a project access token.",
            schema: create_schema,
            build: build_create,
        },
        OperationSpec {
            name: "list_access_tokens",
            description: "List the access tokens of a GitLab project.",
            schema: list_schema,
            build: build_list,
        },
        OperationSpec {
            name: "revoke_access_token",
            description: "Revoke a project access token.",
            schema: revoke_schema,
            build: build_revoke,
        },
    ]
}

fn access_tokens_path(project_id: &str) -> String {
    format!("/projects/{}/access_tokens", encode_path_segment(project_id))
}

// ── Builders ───────────────────────────────────────────────────────

fn build_create(input: &Input) -> Result<RequestPlan> {
    let project_id = require_str(input, "project_id")?;
    let name = require_str(input, "name")?;

    let mut body = Map::new();
    body.insert("name".to_owned(), Value::from(name));
    insert_opt(&mut body, "scopes", optional_str_array(input, "scopes")?);
    insert_opt(
        &mut body,
        "access_level",
        optional_number(input, "access_level")?,
    );
    insert_opt(&mut body, "expires_at", optional_str(input, "expires_at")?);
    Ok(RequestPlan::post(access_tokens_path(project_id), body))
}

fn build_list(input: &Input) -> Result<RequestPlan> {
    let project_id = require_str(input, "project_id")?;
    Ok(RequestPlan::get(access_tokens_path(project_id)))
}

fn build_revoke(input: &Input) -> Result<RequestPlan> {
    let project_id = require_str(input, "project_id")?;
    let token_id = require_number(input, "token_id")?;
    let path = format!("{}/{token_id}", access_tokens_path(project_id));
    Ok(RequestPlan::delete(path))
}

// ── Schemas ────────────────────────────────────────────────────────

fn create_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "project_id": { "type": "string", "description": "Project ID or URL-encoded path" },
            "name": { "type": "string", "description": "Token name" },
            "scopes": { "type": "array", "items": { "type": "string" }, "description": "Scopes granted to the token (e.g. api, read_repository)" },
            "access_level": { "type": "number", "description": "Role of the token (e.g. 10, 20, 30, 40)" },
            "expires_at": { "type": "string", "description": "Expiry date (YYYY-MM-DD)" }
        },
        "required": ["project_id", "name"]
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

fn revoke_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "project_id": { "type": "string", "description": "Project ID or URL-encoded path" },
            "token_id": { "type": "number", "description": "ID of the token to revoke" }
        },
        "required": ["project_id", "token_id"]
    })
}

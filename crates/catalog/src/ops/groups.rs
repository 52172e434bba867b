//! Group operations (`/groups`).

use serde_json::{json, Map, Value};

use lg_domain::error::Result;

use crate::ops::VISIBILITY_LEVELS;
use crate::plan::{encode_path_segment, insert_opt, query_opt, OperationSpec, RequestPlan};
use crate::validate::{
    optional_bool, optional_enum, optional_number, optional_str, require_str, Input,
};

pub fn specs() -> Vec<OperationSpec> {
    vec![
        OperationSpec {
            name: "create_group",
            description: "Create a new GitLab group.",
            schema: create_schema,
            build: build_create,
        },
        OperationSpec {
            name: "list_groups",
            description: "List GitLab groups visible to the caller.",
            schema: list_schema,
            build: build_list,
        },
        OperationSpec {
            name: "update_group",
            description: "Update name, path, description or visibility of a GitLab group.",
            schema: update_schema,
            build: build_update,
        },
    ]
}

// ── Builders ───────────────────────────────────────────────────────

fn build_create(input: &Input) -> Result<RequestPlan> {
    let name = require_str(input, "name")?;
    let path = require_str(input, "path")?;

    let mut body = Map::new();
    body.insert("name".to_owned(), Value::from(name));
    body.insert("path".to_owned(), Value::from(path));
    insert_opt(&mut body, "description", optional_str(input, "description")?);
    insert_opt(
        &mut body,
        "visibility",
        optional_enum(input, "visibility", VISIBILITY_LEVELS)?,
    );
    insert_opt(&mut body, "parent_id", optional_number(input, "parent_id")?);
    insert_opt(
        &mut body,
        "request_access_enabled",
        optional_bool(input, "request_access_enabled")?,
    );
    Ok(RequestPlan::post("/groups".to_owned(), body))
}

fn build_list(input: &Input) -> Result<RequestPlan> {
    let mut query = Vec::new();
    query_opt(
        &mut query,
        "search",
        optional_str(input, "search")?.map(str::to_owned),
    );
    query_opt(
        &mut query,
        "owned",
        optional_bool(input, "owned")?.map(|b| b.to_string()),
    );
    query_opt(
        &mut query,
        "top_level_only",
        optional_bool(input, "top_level_only")?.map(|b| b.to_string()),
    );
    query_opt(
        &mut query,
        "min_access_level",
        optional_number(input, "min_access_level")?.map(|n| n.to_string()),
    );
    Ok(RequestPlan::get_with_query("/groups".to_owned(), query))
}

fn build_update(input: &Input) -> Result<RequestPlan> {
    let group_id = require_str(input, "group_id")?;

    let mut body = Map::new();
    insert_opt(&mut body, "name", optional_str(input, "name")?);
    insert_opt(&mut body, "path", optional_str(input, "path")?);
    insert_opt(&mut body, "description", optional_str(input, "description")?);
    insert_opt(
        &mut body,
        "visibility",
        optional_enum(input, "visibility", VISIBILITY_LEVELS)?,
    );

    let path = format!("/groups/{}", encode_path_segment(group_id));
    Ok(RequestPlan::put(path, body))
}

// ── Schemas ────────────────────────────────────────────────────────

fn create_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "name": { "type": "string", "description": "Display name of the group" },
            "path": { "type": "string", "description": "URL path slug of the group" },
            "description": { "type": "string", "description": "Group description" },
            "visibility": { "type": "string", "enum": ["private", "internal", "public"], "description": "Group visibility level" },
            "parent_id": { "type": "number", "description": "Parent group ID for subgroups" },
            "request_access_enabled": { "type": "boolean", "description": "Allow users to request access" }
        },
        "required": ["name", "path"]
    })
}

fn list_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "search": { "type": "string", "description": "Filter groups by name" },
            "owned": { "type": "boolean", "description": "Only groups owned by the caller" },
            "top_level_only": { "type": "boolean", "description": "Exclude subgroups" },
            "min_access_level": { "type": "number", "description": "Minimum access level of the caller" }
        },
        "required": []
    })
}

fn update_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "group_id": { "type": "string", "description": "Group ID or URL-encoded path" },
            "name": { "type": "string", "description": "Display name of the group" },
            "path": { "type": "string", "description": "URL path slug of the group" },
            "description": { "type": "string", "description": "Group description" },
            "visibility": { "type": "string", "enum": ["private", "internal", "public"], "description": "Group visibility level" }
        },
        "required": ["group_id"]
    })
}

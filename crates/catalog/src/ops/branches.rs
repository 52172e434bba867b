//! Protected-branch operations (`/projects/:id/protected_branches`).
//!
//! Access levels are accepted as plain numbers rather than being checked
//! against the documented discrete levels, so new levels added upstream
//! keep working without a catalog change.

use serde_json::{json, Map, Value};

use lg_domain::error::Result;

use crate::plan::{encode_path_segment, insert_opt, query_opt, OperationSpec, RequestPlan};
use crate::validate::{optional_bool, optional_number, optional_str, require_str, Input};

pub fn specs() -> Vec<OperationSpec> {
    vec![
        OperationSpec {
            name: "protect_branch",
            description: "Protect a branch (or wildcard) of a GitLab project.",
            schema: protect_schema,
            build: build_protect,
        },
        OperationSpec {
            name: "list_protected_branches",
            description: "List the protected branches of a GitLab project.",
            schema: list_schema,
            build: build_list,
        },
        OperationSpec {
            name: "unprotect_branch",
            description: "Remove protection from a branch of a GitLab project.",
            schema: unprotect_schema,
            build: build_unprotect,
        },
    ]
}

fn protected_branches_path(project_id: &str) -> String {
    format!(
        "/projects/{}/protected_branches",
        encode_path_segment(project_id)
    )
}

// ── Builders ───────────────────────────────────────────────────────

fn build_protect(input: &Input) -> Result<RequestPlan> {
    let project_id = require_str(input, "project_id")?;
    let name = require_str(input, "name")?;

    let mut body = Map::new();
    body.insert("name".to_owned(), Value::from(name));
    insert_opt(
        &mut body,
        "push_access_level",
        optional_number(input, "push_access_level")?,
    );
    insert_opt(
        &mut body,
        "merge_access_level",
        optional_number(input, "merge_access_level")?,
    );
    insert_opt(
        &mut body,
        "allow_force_push",
        optional_bool(input, "allow_force_push")?,
    );
    Ok(RequestPlan::post(protected_branches_path(project_id), body))
}

fn build_list(input: &Input) -> Result<RequestPlan> {
    let project_id = require_str(input, "project_id")?;
    let mut query = Vec::new();
    query_opt(
        &mut query,
        "search",
        optional_str(input, "search")?.map(str::to_owned),
    );
    Ok(RequestPlan::get_with_query(
        protected_branches_path(project_id),
        query,
    ))
}

fn build_unprotect(input: &Input) -> Result<RequestPlan> {
    let project_id = require_str(input, "project_id")?;
    let name = require_str(input, "name")?;
    // Branch names may contain `/`; keep them one encoded segment.
    let path = format!(
        "{}/{}",
        protected_branches_path(project_id),
        encode_path_segment(name)
    );
    Ok(RequestPlan::delete(path))
}

// ── Schemas ────────────────────────────────────────────────────────

fn protect_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "project_id": { "type": "string", "description": "Project ID or URL-encoded path" },
            "name": { "type": "string", "description": "Branch name or wildcard (e.g. release/*)" },
            "push_access_level": { "type": "number", "description": "Access level allowed to push" },
            "merge_access_level": { "type": "number", "description": "Access level allowed to merge" },
            "allow_force_push": { "type": "boolean", "description": "Allow force pushes for users who can push" }
        },
        "required": ["project_id", "name"]
    })
}

fn list_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "project_id": { "type": "string", "description": "Project ID or URL-encoded path" },
            "search": { "type": "string", "description": "Filter by branch name" }
        },
        "required": ["project_id"]
    })
}

fn unprotect_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "project_id": { "type": "string", "description": "Project ID or URL-encoded path" },
            "name": { "type": "string", "description": "Branch name or wildcard" }
        },
        "required": ["project_id", "name"]
    })
}

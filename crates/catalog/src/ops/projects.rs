//! Project-settings operations (`/projects/:id`).

use serde_json::{json, Map, Value};

use lg_domain::error::Result;

use crate::ops::VISIBILITY_LEVELS;
use crate::plan::{encode_path_segment, insert_opt, OperationSpec, RequestPlan};
use crate::validate::{optional_bool, optional_enum, optional_str, require_str, Input};

/// Merge strategies a project can enforce.
const MERGE_METHODS: &[&str] = &["merge", "rebase_merge", "ff"];

/// Squash policies a project can enforce.
const SQUASH_OPTIONS: &[&str] = &["default_off", "default_on", "always", "never"];

pub fn specs() -> Vec<OperationSpec> {
    vec![OperationSpec {
        name: "update_project_settings",
        description: "Update settings of a GitLab project (visibility, merge behaviour, defaults).",
        schema: update_schema,
        build: build_update,
    }]
}

// ── Builder ────────────────────────────────────────────────────────

fn build_update(input: &Input) -> Result<RequestPlan> {
    let project_id = require_str(input, "project_id")?;

    let mut body = Map::new();
    insert_opt(&mut body, "description", optional_str(input, "description")?);
    insert_opt(
        &mut body,
        "default_branch",
        optional_str(input, "default_branch")?,
    );
    insert_opt(
        &mut body,
        "visibility",
        optional_enum(input, "visibility", VISIBILITY_LEVELS)?,
    );
    insert_opt(
        &mut body,
        "merge_method",
        optional_enum(input, "merge_method", MERGE_METHODS)?,
    );
    insert_opt(
        &mut body,
        "squash_option",
        optional_enum(input, "squash_option", SQUASH_OPTIONS)?,
    );
    insert_opt(
        &mut body,
        "only_allow_merge_if_pipeline_succeeds",
        optional_bool(input, "only_allow_merge_if_pipeline_succeeds")?,
    );
    insert_opt(
        &mut body,
        "remove_source_branch_after_merge",
        optional_bool(input, "remove_source_branch_after_merge")?,
    );

    let path = format!("/projects/{}", encode_path_segment(project_id));
    Ok(RequestPlan::put(path, body))
}

// ── Schema ─────────────────────────────────────────────────────────

fn update_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "project_id": { "type": "string", "description": "Project ID or URL-encoded path" },
            "description": { "type": "string", "description": "Project description" },
            "default_branch": { "type": "string", "description": "Default branch name" },
            "visibility": { "type": "string", "enum": ["private", "internal", "public"], "description": "Project visibility level" },
            "merge_method": { "type": "string", "enum": ["merge", "rebase_merge", "ff"], "description": "Merge strategy" },
            "squash_option": { "type": "string", "enum": ["default_off", "default_on", "always", "never"], "description": "Squash policy for merge requests" },
            "only_allow_merge_if_pipeline_succeeds": { "type": "boolean", "description": "Require a green pipeline before merging" },
            "remove_source_branch_after_merge": { "type": "boolean", "description": "Delete source branches after merge by default" }
        },
        "required": ["project_id"]
    })
}

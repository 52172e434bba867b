//! The declarative catalog of every exposed operation.
//!
//! Each family module contributes its `OperationSpec`s; `catalog()` is the
//! single table the registry and the tests walk.  Sibling operations share
//! their base-path derivation inside the family module so the mapping
//! cannot drift between e.g. the four webhook mutations.

mod branches;
mod groups;
mod projects;
mod tokens;
mod triggers;
mod variables;
mod webhooks;

use crate::plan::OperationSpec;

/// Visibility levels accepted by group and project mutations.
pub(crate) const VISIBILITY_LEVELS: &[&str] = &["private", "internal", "public"];

/// All 21 operations in one table, grouped by resource family.
pub fn catalog() -> Vec<OperationSpec> {
    let mut specs = Vec::with_capacity(21);
    specs.extend(webhooks::specs());
    specs.extend(variables::specs());
    specs.extend(branches::specs());
    specs.extend(projects::specs());
    specs.extend(groups::specs());
    specs.extend(tokens::specs());
    specs.extend(triggers::specs());
    specs
}

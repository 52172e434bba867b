//! Aggregates the catalog for exposure through the protocol layer.

use std::collections::HashMap;

use lg_domain::tool::ToolDefinition;

use crate::ops;
use crate::plan::OperationSpec;

/// Name-indexed view of the operation catalog.
///
/// Built once at startup and shared read-only for the process lifetime.
/// Insertion order is preserved so `tools/list` output is stable.
pub struct OperationRegistry {
    by_name: HashMap<&'static str, OperationSpec>,
    order: Vec<&'static str>,
}

impl OperationRegistry {
    pub fn new() -> Self {
        let specs = ops::catalog();
        let order: Vec<&'static str> = specs.iter().map(|s| s.name).collect();
        let by_name = specs.into_iter().map(|s| (s.name, s)).collect();
        Self { by_name, order }
    }

    pub fn get(&self, name: &str) -> Option<&OperationSpec> {
        self.by_name.get(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Tool definitions for the protocol layer, in catalog order.
    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.order
            .iter()
            .filter_map(|name| self.by_name.get(name))
            .map(|spec| ToolDefinition {
                name: spec.name.to_owned(),
                description: spec.description.to_owned(),
                parameters: (spec.schema)(),
            })
            .collect()
    }
}

impl Default for OperationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

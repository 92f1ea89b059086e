//! Workflow unit descriptor stored in the registry.

use serde::{Deserialize, Serialize};

/// Opaque named workflow exposed by an extension module.
///
/// The core stores and returns workflow descriptors by name; how a workflow
/// executes is outside this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowType {
    name: String,
    qualified_path: String,
}

impl WorkflowType {
    pub fn new(name: &str, qualified_path: &str) -> Self {
        Self {
            name: name.to_string(),
            qualified_path: qualified_path.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn qualified_path(&self) -> &str {
        &self.qualified_path
    }
}

//! Settings source contracts for defaults and user overrides.
//!
//! A source exposes a fixed, fully enumerable set of named values. Stores
//! consume sources once, by full enumeration; there are no partial reads.

use crate::settings::store::{StoreError, StoreResult};
use serde_json::Value;
use std::collections::BTreeMap;

/// Enumerable bag of named setting values.
pub trait SettingsSource: std::fmt::Debug {
    /// Stable source name used in diagnostics, e.g. `plugboard.defaults`.
    fn name(&self) -> &str;

    /// Returns every exported `(name, value)` pair.
    fn settings(&self) -> Vec<(String, Value)>;
}

/// Capability to locate a settings source by dotted path.
///
/// The path typically arrives through an environment variable at process
/// start; the loader is how the host environment turns it into a source.
pub trait SettingsSourceLoader {
    fn load_source(&self, path: &str) -> StoreResult<Box<dyn SettingsSource>>;
}

/// In-memory settings source built from explicit declarations.
#[derive(Debug, Clone, Default)]
pub struct StaticSettingsSource {
    name: String,
    entries: Vec<(String, Value)>,
}

impl StaticSettingsSource {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            entries: Vec::new(),
        }
    }

    /// Declares one exported setting; later declarations win on re-export.
    pub fn set(mut self, name: &str, value: Value) -> Self {
        self.entries.push((name.to_string(), value));
        self
    }
}

impl SettingsSource for StaticSettingsSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn settings(&self) -> Vec<(String, Value)> {
        self.entries.clone()
    }
}

/// Data-driven source loader assembled from explicit declarations.
#[derive(Debug, Default)]
pub struct StaticSourceLoader {
    sources: BTreeMap<String, StaticSettingsSource>,
}

impl StaticSourceLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, path: &str, source: StaticSettingsSource) {
        self.sources.insert(path.to_string(), source);
    }
}

impl SettingsSourceLoader for StaticSourceLoader {
    fn load_source(&self, path: &str) -> StoreResult<Box<dyn SettingsSource>> {
        match self.sources.get(path) {
            Some(source) => Ok(Box::new(source.clone())),
            None => Err(StoreError::SourceNotFound {
                path: path.to_string(),
                reason: "source is not declared".to_string(),
            }),
        }
    }
}

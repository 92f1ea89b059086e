//! Overridable settings store with gated direct mutation.
//!
//! # Responsibility
//! - Copy every name a defaults source exports, then let an optional user
//!   source overwrite or extend them, last writer wins.
//! - Reject direct assignment of names the store has never seen; `update`
//!   is the only path that admits new names after construction.
//!
//! # Invariants
//! - `overridden` records post-construction changes only; construction-time
//!   user-over-default shadowing is not tracked.

use crate::settings::source::SettingsSource;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Settings store errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    UnknownSetting { store: String, name: String },
    SourceNotFound { path: String, reason: String },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownSetting { store, name } => write!(
                f,
                "store {store} has no setting named {name}; set it through \
                 update() instead of direct assignment"
            ),
            Self::SourceNotFound { path, reason } => {
                write!(f, "settings source {path} could not be loaded: {reason}")
            }
        }
    }
}

impl Error for StoreError {}

/// Named bag of settings loaded from a defaults source plus an optional
/// user-supplied override source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsStore {
    store_name: String,
    user_source: Option<String>,
    values: BTreeMap<String, Value>,
    overridden: BTreeSet<String>,
}

impl SettingsStore {
    /// Builds the store by full enumeration: defaults first, then every name
    /// the user source exports overwrites or extends, unconditionally.
    pub fn new(defaults: &dyn SettingsSource, user: Option<&dyn SettingsSource>) -> Self {
        let mut values = BTreeMap::new();
        for (name, value) in defaults.settings() {
            values.insert(name, value);
        }
        let mut user_source = None;
        if let Some(user) = user {
            for (name, value) in user.settings() {
                values.insert(name, value);
            }
            user_source = Some(user.name().to_string());
        }
        Self {
            store_name: defaults.name().to_string(),
            user_source,
            values,
            overridden: BTreeSet::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Returns every known setting name in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Direct assignment of one already-known setting.
    ///
    /// Fails for a name the store has never seen (default, user-supplied, or
    /// previously update()-d); this stops silently typo'd settings.
    pub fn set(&mut self, name: &str, value: Value) -> StoreResult<()> {
        if !self.values.contains_key(name) {
            return Err(StoreError::UnknownSetting {
                store: self.to_string(),
                name: name.to_string(),
            });
        }
        self.values.insert(name.to_string(), value);
        Ok(())
    }

    /// The sanctioned mutation path: admits unknown names and records
    /// already-known names in the overridden set.
    pub fn update(&mut self, changes: impl IntoIterator<Item = (String, Value)>) {
        for (name, value) in changes {
            if self.values.contains_key(&name) {
                self.overridden.insert(name.clone());
            }
            self.values.insert(name, value);
        }
    }

    /// Returns true when `name` was changed through `update` after the store
    /// already knew it.
    pub fn is_overridden(&self, name: &str) -> bool {
        self.overridden.contains(name)
    }

    /// Returns the names changed through `update`, in sorted order.
    pub fn overridden(&self) -> impl Iterator<Item = &str> {
        self.overridden.iter().map(String::as_str)
    }

    /// Name of the user override source, when one was applied.
    pub fn user_source(&self) -> Option<&str> {
        self.user_source.as_deref()
    }
}

impl Display for SettingsStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.user_source {
            Some(user_source) => write!(f, "SettingsStore({user_source:?})"),
            None => write!(f, "SettingsStore({:?})", self.store_name),
        }
    }
}

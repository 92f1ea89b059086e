//! Factory default settings for the framework.
//!
//! These values apply unless a user-supplied source overrides them.

use crate::settings::source::StaticSettingsSource;
use serde_json::Value;

/// Name the defaults source reports in diagnostics.
pub const DEFAULTS_SOURCE_NAME: &str = "plugboard.defaults";

/// Setting name: verbose diagnostics toggle.
pub const SETTING_DEBUG: &str = "debug";
/// Setting name: ordered list of component hook strings to load at bootstrap.
pub const SETTING_COMPONENTS_REGISTRY: &str = "components_registry";

/// Returns the built-in defaults source.
pub fn framework_defaults() -> StaticSettingsSource {
    StaticSettingsSource::new(DEFAULTS_SOURCE_NAME)
        .set(SETTING_DEBUG, Value::Bool(true))
        .set(SETTING_COMPONENTS_REGISTRY, Value::Array(Vec::new()))
}

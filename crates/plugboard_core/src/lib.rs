//! Core runtime for Plugboard: deferred settings stores, hook resolution,
//! and the extension registry.
//! This crate is the single source of truth for load-order invariants.

pub mod lazy;
pub mod logging;
pub mod plugin;
pub mod settings;

pub use lazy::DeferredProxy;
pub use logging::{default_log_level, init_logging, logging_status};
pub use plugin::host::{
    Domain, ImportFailure, ManagerClass, ModuleHandle, ModuleHost, ModuleSpec, StaticModuleHost,
    WorkflowExport,
};
pub use plugin::manager::ExtensionManager;
pub use plugin::registry::{PopulateError, Registry, RegistryError, RegistryResult};
pub use plugin::resolver::{resolve, ResolveError, ResolveResult};
pub use plugin::workflow::WorkflowType;
pub use settings::context::{RuntimeContext, CONFIG_SOURCE_VAR, ENVIRONMENT_SOURCE_VAR};
pub use settings::defaults::{
    framework_defaults, SETTING_COMPONENTS_REGISTRY, SETTING_DEBUG,
};
pub use settings::source::{
    SettingsSource, SettingsSourceLoader, StaticSettingsSource, StaticSourceLoader,
};
pub use settings::store::{SettingsStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}

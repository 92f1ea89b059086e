//! Runtime context owning the lazily materialized stores.
//!
//! The context replaces process-wide singletons: bootstrap creates it once
//! and passes it to whichever subsystems need settings. Both stores stay
//! unloaded until first access.

use crate::lazy::DeferredProxy;
use crate::settings::defaults::framework_defaults;
use crate::settings::source::{SettingsSource, SettingsSourceLoader};
use crate::settings::store::{SettingsStore, StoreResult};
use std::rc::Rc;

/// Environment variable naming the user configuration source path.
pub const CONFIG_SOURCE_VAR: &str = "PLUGBOARD_CONFIG_MODULE";
/// Environment variable naming the user environment source path.
pub const ENVIRONMENT_SOURCE_VAR: &str = "PLUGBOARD_ENVIRONMENT_MODULE";

/// One configuration store and one environment store, each behind a
/// deferred proxy.
pub struct RuntimeContext {
    configuration: DeferredProxy<SettingsStore>,
    environment: DeferredProxy<SettingsStore>,
}

impl RuntimeContext {
    /// Builds a context whose user sources are named by the standard
    /// environment variables and located through `loader`.
    ///
    /// The source paths are resolved eagerly so a bad path fails here, at
    /// bootstrap; enumeration and store construction stay deferred.
    pub fn from_env(loader: &dyn SettingsSourceLoader) -> StoreResult<Self> {
        let configuration = user_source_from_env(loader, CONFIG_SOURCE_VAR)?;
        let environment = user_source_from_env(loader, ENVIRONMENT_SOURCE_VAR)?;
        Ok(Self::with_user_sources(configuration, environment))
    }

    /// Builds a context with explicit user sources, bypassing the
    /// environment variables.
    pub fn with_user_sources(
        configuration: Option<Rc<dyn SettingsSource>>,
        environment: Option<Rc<dyn SettingsSource>>,
    ) -> Self {
        Self {
            configuration: store_proxy(configuration),
            environment: store_proxy(environment),
        }
    }

    /// Builds a defaults-only context with no user overrides.
    pub fn with_defaults() -> Self {
        Self::with_user_sources(None, None)
    }

    /// Returns the configuration store, materializing it on first access.
    pub fn configuration(&self) -> &SettingsStore {
        self.configuration.get()
    }

    pub fn configuration_mut(&mut self) -> &mut SettingsStore {
        self.configuration.get_mut()
    }

    /// Returns the environment store, materializing it on first access.
    pub fn environment(&self) -> &SettingsStore {
        self.environment.get()
    }

    pub fn environment_mut(&mut self) -> &mut SettingsStore {
        self.environment.get_mut()
    }

    /// Returns true once the configuration store has materialized.
    pub fn is_configured(&self) -> bool {
        self.configuration.is_loaded()
    }

    /// Returns true once the environment store has materialized.
    pub fn is_environment_loaded(&self) -> bool {
        self.environment.is_loaded()
    }
}

impl Default for RuntimeContext {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn store_proxy(user: Option<Rc<dyn SettingsSource>>) -> DeferredProxy<SettingsStore> {
    DeferredProxy::new(move || {
        let defaults = framework_defaults();
        SettingsStore::new(&defaults, user.as_deref())
    })
}

fn user_source_from_env(
    loader: &dyn SettingsSourceLoader,
    var: &str,
) -> StoreResult<Option<Rc<dyn SettingsSource>>> {
    match std::env::var(var) {
        Ok(path) if !path.trim().is_empty() => {
            let source = loader.load_source(path.trim())?;
            Ok(Some(Rc::from(source)))
        }
        _ => Ok(None),
    }
}

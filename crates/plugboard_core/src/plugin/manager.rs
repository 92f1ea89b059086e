//! Extension manager: one resolved plugin and its workflow slice.

use crate::plugin::host::{split_hook, ManagerClass, ModuleHandle, ModuleHost};
use crate::plugin::registry::{RegistryCore, RegistryError, RegistryResult};
use crate::plugin::resolver::ResolveError;
use crate::plugin::workflow::WorkflowType;
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// Name of the sibling submodule imported for its workflow registrations.
const WORKFLOWS_MODULE: &str = "workflows";

static IDENTIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex"));

/// One resolved extension.
///
/// Created by the resolver, handed to the registry, which wires the
/// back-reference exactly once. The workflow map stays empty until
/// `load_workflows` runs.
#[derive(Debug)]
pub struct ExtensionManager {
    canonical_name: String,
    class: ManagerClass,
    module: ModuleHandle,
    workflow_map: Option<BTreeMap<String, WorkflowType>>,
    registry: Option<Rc<RegistryCore>>,
}

impl ExtensionManager {
    /// Constructs a manager for `name`, keeping its rightmost dotted
    /// segment as the canonical name.
    ///
    /// Fails when that segment is not a legal bare identifier.
    pub(crate) fn new(
        class: ManagerClass,
        name: &str,
        module: ModuleHandle,
    ) -> Result<Self, ResolveError> {
        let canonical = split_hook(name).1;
        if !IDENTIFIER_RE.is_match(canonical) {
            return Err(ResolveError::InvalidIdentifier {
                name: name.to_string(),
            });
        }
        Ok(Self {
            canonical_name: canonical.to_string(),
            class,
            module,
            workflow_map: None,
            registry: None,
        })
    }

    /// Canonical name; fixed at construction, never changes.
    pub fn canonical_name(&self) -> &str {
        &self.canonical_name
    }

    /// The manager class this instance was resolved from.
    pub fn class(&self) -> &ManagerClass {
        &self.class
    }

    /// The imported root module for the canonical name.
    pub fn module(&self) -> &ModuleHandle {
        &self.module
    }

    /// Returns true once `load_workflows` has run.
    pub fn workflows_loaded(&self) -> bool {
        self.workflow_map.is_some()
    }

    /// Wires the registry back-reference; rejected on re-attachment.
    pub(crate) fn attach_registry(&mut self, core: Rc<RegistryCore>) -> RegistryResult<()> {
        if self.registry.is_some() {
            return Err(RegistryError::ManagerAlreadyAttached(
                self.canonical_name.clone(),
            ));
        }
        self.registry = Some(core);
        Ok(())
    }

    /// Pulls this manager's slice from the registry's workflow map, then
    /// imports the sibling `workflows` submodule when the root module has
    /// one, applying its exports back into the registry.
    ///
    /// The order is load-bearing: the pull reads whatever was already
    /// registered, and the import lets further registration reach managers
    /// loaded after this one. Runs once; later calls are no-ops.
    pub fn load_workflows(&mut self, host: &dyn ModuleHost) -> RegistryResult<()> {
        let core = Rc::clone(self.registry()?);
        if self.workflow_map.is_some() {
            return Ok(());
        }
        self.workflow_map = Some(core.workflow_slice(&self.canonical_name));
        if host.module_has_submodule(&self.module, WORKFLOWS_MODULE) {
            let path = format!("{}.{WORKFLOWS_MODULE}", self.module.path());
            let module =
                host.import_module(&path)
                    .map_err(|source| RegistryError::WorkflowModuleImport {
                        module: path.clone(),
                        source,
                    })?;
            for export in module.workflow_exports() {
                core.add_workflow(export.owner(), export.workflow().clone());
            }
            info!(
                "event=workflows_imported module=plugin status=ok manager={} path={path} exports={}",
                self.canonical_name,
                module.workflow_exports().len()
            );
        }
        Ok(())
    }

    /// Retrieves a workflow by case-insensitive name after asserting the
    /// requested readiness flag (workflows when `require_workflows_loaded`,
    /// components otherwise) through the registry.
    pub fn get_workflow(
        &self,
        workflow: &str,
        require_workflows_loaded: bool,
    ) -> RegistryResult<WorkflowType> {
        let core = self.registry()?;
        if require_workflows_loaded {
            core.assert_workflows_loaded()?;
        } else {
            core.assert_components_loaded()?;
        }
        self.workflow_map
            .as_ref()
            .and_then(|map| map.get(&workflow.to_lowercase()))
            .cloned()
            .ok_or_else(|| RegistryError::WorkflowLookup {
                workflow: workflow.to_string(),
                manager: self.canonical_name.clone(),
            })
    }

    fn registry(&self) -> RegistryResult<&Rc<RegistryCore>> {
        self.registry
            .as_ref()
            .ok_or_else(|| RegistryError::ManagerNotRegistered(self.canonical_name.clone()))
    }
}

impl Display for ExtensionManager {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ExtensionManager({:?})", self.canonical_name)
    }
}

#[cfg(test)]
mod tests {
    use super::ExtensionManager;
    use crate::plugin::host::{Domain, ManagerClass, ModuleHost, ModuleSpec, StaticModuleHost};
    use crate::plugin::registry::RegistryError;
    use crate::plugin::resolver::ResolveError;

    fn host_with(path: &str) -> StaticModuleHost {
        let mut host = StaticModuleHost::new();
        host.declare(ModuleSpec::new(path));
        host
    }

    #[test]
    fn keeps_the_trailing_segment_as_canonical_name() {
        let host = host_with("pkg.sub");
        let module = host.import_module("pkg.sub").expect("declared module");
        let manager = ExtensionManager::new(ManagerClass::base(Domain::Component), "pkg.sub", module)
            .expect("valid trailing identifier");
        assert_eq!(manager.canonical_name(), "sub");
        assert_eq!(manager.to_string(), "ExtensionManager(\"sub\")");
    }

    #[test]
    fn rejects_non_identifier_trailing_segment() {
        let host = host_with("pkg.9bad");
        let module = host.import_module("pkg.9bad").expect("declared module");
        let err = ExtensionManager::new(ManagerClass::base(Domain::Component), "pkg.9bad", module)
            .expect_err("leading digit must be rejected");
        assert!(matches!(err, ResolveError::InvalidIdentifier { .. }));
    }

    #[test]
    fn unregistered_manager_cannot_serve_workflows() {
        let host = host_with("solo");
        let module = host.import_module("solo").expect("declared module");
        let manager = ExtensionManager::new(ManagerClass::base(Domain::Component), "solo", module)
            .expect("valid identifier");
        let err = manager
            .get_workflow("build", true)
            .expect_err("detached manager must fail");
        assert!(matches!(err, RegistryError::ManagerNotRegistered(_)));
    }
}

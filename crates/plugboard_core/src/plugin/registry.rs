//! Canonical-name registry and two-phase readiness gating.
//!
//! # Responsibility
//! - Own the canonical name -> manager map and the canonical name ->
//!   workflow map.
//! - Gate workflow visibility behind explicit readiness: components load
//!   first, then workflows; lookups before readiness are caller errors.
//!
//! # Invariants
//! - A canonical name is registered at most once.
//! - Both maps are mutated during single-threaded bootstrap only and read
//!   afterward; concurrent bootstrap needs external mutual exclusion.

use crate::plugin::host::{Domain, ImportFailure, ModuleHost};
use crate::plugin::manager::ExtensionManager;
use crate::plugin::resolver::{resolve, ResolveError};
use crate::plugin::workflow::WorkflowType;
use log::info;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Registry and manager lifecycle errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    DuplicateManager(String),
    ManagerAlreadyAttached(String),
    ManagerNotRegistered(String),
    ComponentsNotReady,
    WorkflowsNotReady,
    WorkflowLookup { workflow: String, manager: String },
    WorkflowModuleImport { module: String, source: ImportFailure },
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateManager(name) => write!(f, "manager already registered: {name}"),
            Self::ManagerAlreadyAttached(name) => {
                write!(f, "manager is already attached to a registry: {name}")
            }
            Self::ManagerNotRegistered(name) => write!(f, "manager is not registered: {name}"),
            Self::ComponentsNotReady => write!(f, "components are not loaded yet"),
            Self::WorkflowsNotReady => write!(f, "workflows are not loaded yet"),
            Self::WorkflowLookup { workflow, manager } => write!(
                f,
                "workflow {workflow} not found in manager {manager}; ensure it \
                 is registered and the name is spelled correctly"
            ),
            Self::WorkflowModuleImport { module, source } => {
                write!(f, "cannot import workflow module {module}: {}", source.reason())
            }
        }
    }
}

impl Error for RegistryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::WorkflowModuleImport { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Shared registry state reachable from managers via their back-reference.
#[derive(Debug, Default)]
pub(crate) struct RegistryCore {
    workflows: RefCell<BTreeMap<String, BTreeMap<String, WorkflowType>>>,
    components_ready: Cell<bool>,
    workflows_ready: Cell<bool>,
}

impl RegistryCore {
    pub(crate) fn assert_components_loaded(&self) -> RegistryResult<()> {
        if self.components_ready.get() {
            Ok(())
        } else {
            Err(RegistryError::ComponentsNotReady)
        }
    }

    pub(crate) fn assert_workflows_loaded(&self) -> RegistryResult<()> {
        if self.workflows_ready.get() {
            Ok(())
        } else {
            Err(RegistryError::WorkflowsNotReady)
        }
    }

    pub(crate) fn add_workflow(&self, owner: &str, workflow: WorkflowType) {
        self.workflows
            .borrow_mut()
            .entry(owner.to_string())
            .or_default()
            .insert(workflow.name().to_lowercase(), workflow);
    }

    /// Clones the owner's workflow slice, creating an empty one when absent.
    pub(crate) fn workflow_slice(&self, owner: &str) -> BTreeMap<String, WorkflowType> {
        self.workflows
            .borrow_mut()
            .entry(owner.to_string())
            .or_default()
            .clone()
    }
}

/// Aggregate of resolved managers and the workflows they expose.
#[derive(Debug, Default)]
pub struct Registry {
    core: Rc<RegistryCore>,
    managers: BTreeMap<String, Rc<RefCell<ExtensionManager>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one resolved manager under its canonical name, wiring the
    /// back-reference exactly once.
    pub fn register(
        &mut self,
        mut manager: ExtensionManager,
    ) -> RegistryResult<Rc<RefCell<ExtensionManager>>> {
        let name = manager.canonical_name().to_string();
        if self.managers.contains_key(&name) {
            return Err(RegistryError::DuplicateManager(name));
        }
        manager.attach_registry(Rc::clone(&self.core))?;
        let handle = Rc::new(RefCell::new(manager));
        self.managers.insert(name.clone(), Rc::clone(&handle));
        info!("event=manager_registered module=plugin status=ok manager={name}");
        Ok(handle)
    }

    /// Returns the registered manager for a canonical name.
    pub fn get_manager(&self, name: &str) -> Option<Rc<RefCell<ExtensionManager>>> {
        self.managers.get(name).cloned()
    }

    /// Returns every registered canonical name in sorted order.
    pub fn manager_names(&self) -> Vec<String> {
        self.managers.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.managers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.managers.is_empty()
    }

    /// Registers one workflow for `owner`; the entry point workflow modules
    /// use while they are being imported.
    pub fn add_workflow(&self, owner: &str, workflow: WorkflowType) {
        info!(
            "event=workflow_registered module=plugin status=ok owner={owner} workflow={}",
            workflow.name()
        );
        self.core.add_workflow(owner, workflow);
    }

    /// Readiness assertion: errors until the component phase has finished.
    pub fn are_components_loaded(&self) -> RegistryResult<()> {
        self.core.assert_components_loaded()
    }

    /// Readiness assertion: errors until the workflow phase has finished.
    pub fn are_workflows_loaded(&self) -> RegistryResult<()> {
        self.core.assert_workflows_loaded()
    }

    /// Marks the component phase finished; normally called by `populate`,
    /// exposed for bootstrap code that drives the phases itself.
    pub fn mark_components_loaded(&self) {
        self.core.components_ready.set(true);
    }

    /// Marks the workflow phase finished.
    pub fn mark_workflows_loaded(&self) {
        self.core.workflows_ready.set(true);
    }

    /// Single-pass bootstrap: resolve and register every hook, mark
    /// components ready, load each manager's workflows in canonical-name
    /// order, mark workflows ready.
    pub fn populate<H: AsRef<str>>(
        &mut self,
        host: &dyn ModuleHost,
        domain: Domain,
        hooks: &[H],
    ) -> Result<(), PopulateError> {
        for hook in hooks {
            let manager = resolve(host, domain, hook.as_ref())?;
            self.register(manager)?;
        }
        self.mark_components_loaded();
        for handle in self.managers.values() {
            handle.borrow_mut().load_workflows(host)?;
        }
        self.mark_workflows_loaded();
        info!(
            "event=registry_populated module=plugin status=ok domain={domain} managers={}",
            self.managers.len()
        );
        Ok(())
    }
}

/// Bootstrap error: either a hook failed to resolve or the registry
/// rejected a lifecycle step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopulateError {
    Resolve(ResolveError),
    Registry(RegistryError),
}

impl Display for PopulateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Resolve(err) => write!(f, "{err}"),
            Self::Registry(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PopulateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Resolve(err) => Some(err),
            Self::Registry(err) => Some(err),
        }
    }
}

impl From<ResolveError> for PopulateError {
    fn from(err: ResolveError) -> Self {
        Self::Resolve(err)
    }
}

impl From<RegistryError> for PopulateError {
    fn from(err: RegistryError) -> Self {
        Self::Registry(err)
    }
}

#[cfg(test)]
mod tests {
    use super::{RegistryCore, RegistryError};
    use crate::plugin::workflow::WorkflowType;

    #[test]
    fn readiness_assertions_follow_the_flags() {
        let core = RegistryCore::default();
        assert!(matches!(
            core.assert_components_loaded(),
            Err(RegistryError::ComponentsNotReady)
        ));
        assert!(matches!(
            core.assert_workflows_loaded(),
            Err(RegistryError::WorkflowsNotReady)
        ));

        core.components_ready.set(true);
        core.assert_components_loaded()
            .expect("components flag should satisfy the assertion");
        assert!(matches!(
            core.assert_workflows_loaded(),
            Err(RegistryError::WorkflowsNotReady)
        ));
    }

    #[test]
    fn workflow_slice_creates_empty_entries_and_keys_lowercase() {
        let core = RegistryCore::default();
        assert!(core.workflow_slice("shop").is_empty());

        core.add_workflow("shop", WorkflowType::new("Build", "shop.workflows.Build"));
        let slice = core.workflow_slice("shop");
        assert_eq!(slice.len(), 1);
        assert!(slice.contains_key("build"));
    }
}

//! Module host capability: imports, submodule checks, attribute lookup.
//!
//! The host replaces reflective class scanning with explicit declaration
//! records: every importable module is described by a [`ModuleSpec`], and
//! manager classes are plain data carrying the primary flag and alias the
//! resolver tie-breaks on. The resolution algorithm itself stays pure data
//! over these records.

use crate::plugin::workflow::WorkflowType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// Extension domain; components and agents share one resolution design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Domain {
    Component,
    Agent,
}

impl Domain {
    /// Name of the per-package submodule scanned for manager classes.
    pub fn plugin_submodule(self) -> &'static str {
        match self {
            Self::Component => "components",
            Self::Agent => "agents",
        }
    }

    /// Class name the base manager reports for this domain.
    pub fn base_class_name(self) -> &'static str {
        match self {
            Self::Component => "ComponentManager",
            Self::Agent => "AgentManager",
        }
    }
}

impl Display for Domain {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Component => write!(f, "component"),
            Self::Agent => write!(f, "agent"),
        }
    }
}

/// Declared manager class record.
///
/// `primary` is tri-state: `None` means the class never declared the flag,
/// which the resolver treats as true on the first pass and false on the
/// explicit tie-break pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerClass {
    class_name: String,
    domain: Domain,
    is_base: bool,
    primary: Option<bool>,
    alias: Option<String>,
}

impl ManagerClass {
    /// Declares a concrete manager class for `domain`.
    pub fn new(domain: Domain, class_name: &str) -> Self {
        Self {
            class_name: class_name.to_string(),
            domain,
            is_base: false,
            primary: None,
            alias: None,
        }
    }

    /// The domain's base manager class; used when a plain module wraps
    /// itself with no specialized subclass.
    pub fn base(domain: Domain) -> Self {
        Self {
            class_name: domain.base_class_name().to_string(),
            domain,
            is_base: true,
            primary: None,
            alias: None,
        }
    }

    /// Declares the primary flag explicitly.
    pub fn primary(mut self, primary: bool) -> Self {
        self.primary = Some(primary);
        self
    }

    /// Declares the canonical name this class resolves to.
    pub fn alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.to_string());
        self
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn is_base(&self) -> bool {
        self.is_base
    }

    pub fn declared_primary(&self) -> Option<bool> {
        self.primary
    }

    pub fn declared_alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Subclass test for the domain; the base class counts as its own
    /// subclass.
    pub fn is_manager_for(&self, domain: Domain) -> bool {
        self.domain == domain
    }
}

/// Import failure reported by a module host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportFailure {
    path: String,
    reason: String,
}

impl ImportFailure {
    pub fn new(path: &str, reason: &str) -> Self {
        Self {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl Display for ImportFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "cannot import module {}: {}", self.path, self.reason)
    }
}

impl Error for ImportFailure {}

/// Workflow declaration exported by a workflows submodule for one owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowExport {
    owner: String,
    workflow: WorkflowType,
}

impl WorkflowExport {
    pub fn new(owner: &str, workflow: WorkflowType) -> Self {
        Self {
            owner: owner.to_string(),
            workflow,
        }
    }

    /// Canonical name of the manager this workflow belongs to.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn workflow(&self) -> &WorkflowType {
        &self.workflow
    }
}

#[derive(Debug)]
struct ModuleRecord {
    path: String,
    manager_classes: Vec<ManagerClass>,
    attributes: BTreeMap<String, ManagerClass>,
    workflow_exports: Vec<WorkflowExport>,
}

/// Opaque handle to an imported module.
///
/// A host returns the same handle for repeated imports of one path, so
/// handle identity doubles as module identity.
#[derive(Debug, Clone)]
pub struct ModuleHandle(Rc<ModuleRecord>);

impl ModuleHandle {
    pub fn path(&self) -> &str {
        &self.0.path
    }

    /// Classes declared in this module, in declaration order.
    pub fn manager_classes(&self) -> &[ManagerClass] {
        &self.0.manager_classes
    }

    /// Looks up one module attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&ManagerClass> {
        self.0.attributes.get(name)
    }

    /// Workflow declarations this module exports when imported.
    pub fn workflow_exports(&self) -> &[WorkflowExport] {
        &self.0.workflow_exports
    }

    /// Identity check: both handles reference the same imported module.
    pub fn same_module(&self, other: &ModuleHandle) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Capability the resolver needs from the host runtime: import a module by
/// dotted path, probe for a submodule, and read a module attribute.
pub trait ModuleHost {
    fn import_module(&self, path: &str) -> Result<ModuleHandle, ImportFailure>;

    /// Returns true when `module` has a direct submodule called `name`,
    /// without importing it.
    fn module_has_submodule(&self, module: &ModuleHandle, name: &str) -> bool;

    /// Resolves `<module path>.<attribute>`, swallowing every failure into
    /// `None`.
    fn get_attribute(&self, dotted: &str) -> Option<ManagerClass> {
        let (path, attribute) = split_hook(dotted);
        if path.is_empty() {
            return None;
        }
        let module = self.import_module(path).ok()?;
        module.attribute(attribute).cloned()
    }
}

/// Splits a dotted hook into (leading path, trailing segment).
///
/// A hook without a dot yields an empty path.
pub(crate) fn split_hook(hook: &str) -> (&str, &str) {
    match hook.rfind('.') {
        Some(idx) => (&hook[..idx], &hook[idx + 1..]),
        None => ("", hook),
    }
}

/// Declaration record for one importable module.
#[derive(Debug, Clone, Default)]
pub struct ModuleSpec {
    path: String,
    manager_classes: Vec<ManagerClass>,
    attributes: BTreeMap<String, ManagerClass>,
    workflow_exports: Vec<WorkflowExport>,
}

impl ModuleSpec {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            ..Self::default()
        }
    }

    /// Declares one manager class; the class is also readable as a module
    /// attribute under its class name.
    pub fn manager_class(mut self, class: ManagerClass) -> Self {
        self.attributes
            .insert(class.class_name().to_string(), class.clone());
        self.manager_classes.push(class);
        self
    }

    /// Declares an extra attribute, e.g. a re-exported class.
    pub fn attribute(mut self, name: &str, class: ManagerClass) -> Self {
        self.attributes.insert(name.to_string(), class);
        self
    }

    /// Declares a workflow this module registers for `owner` on import.
    pub fn workflow(mut self, owner: &str, workflow: WorkflowType) -> Self {
        self.workflow_exports
            .push(WorkflowExport::new(owner, workflow));
        self
    }
}

/// Data-driven module host assembled from explicit declarations.
///
/// This is the static-list rendering of the import capability: bootstrap
/// (or a test) declares every module up front and resolution stays fully
/// deterministic.
#[derive(Debug, Default)]
pub struct StaticModuleHost {
    modules: BTreeMap<String, ModuleHandle>,
}

impl StaticModuleHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares one importable module; a later declaration for the same
    /// path replaces the earlier one.
    pub fn declare(&mut self, spec: ModuleSpec) {
        let handle = ModuleHandle(Rc::new(ModuleRecord {
            path: spec.path.clone(),
            manager_classes: spec.manager_classes,
            attributes: spec.attributes,
            workflow_exports: spec.workflow_exports,
        }));
        self.modules.insert(spec.path, handle);
    }
}

impl ModuleHost for StaticModuleHost {
    fn import_module(&self, path: &str) -> Result<ModuleHandle, ImportFailure> {
        match self.modules.get(path) {
            Some(handle) => Ok(handle.clone()),
            None => Err(ImportFailure::new(path, "module is not declared")),
        }
    }

    fn module_has_submodule(&self, module: &ModuleHandle, name: &str) -> bool {
        self.modules
            .contains_key(&format!("{}.{name}", module.path()))
    }
}

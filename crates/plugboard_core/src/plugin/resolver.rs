//! Hook resolution: dotted path in, validated extension manager out.
//!
//! # Responsibility
//! - Turn an opaque hook string into exactly one constructed manager or
//!   exactly one typed error; never a silent partial state.
//!
//! The layered fallbacks let a hook be as loose as a package following
//! convention, as specific as `module.Attribute`, or as implicit as a bare
//! module wrapped verbatim:
//! 1. package-style: scan the domain submodule for a primary manager class,
//!    falling back to self-wrap when nothing qualifies;
//! 2. direct attribute: read the hook as `<module path>.<attribute>`,
//!    swallowing failures;
//! 3. class-literal heuristic: an upper-case-initial trailing segment is
//!    reported as a missing class, anything else surfaces the import error.

use crate::plugin::host::{split_hook, Domain, ImportFailure, ManagerClass, ModuleHost};
use crate::plugin::manager::ExtensionManager;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ResolveResult<T> = Result<T, ResolveError>;

/// Hook resolution errors; each names the offending hook or module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    AmbiguousPlugin {
        hook: String,
        domain: Domain,
    },
    UnresolvedReference {
        hook: String,
        class_name: String,
        available: Vec<String>,
    },
    InvalidManager {
        hook: String,
        domain: Domain,
    },
    MissingName {
        hook: String,
    },
    ModuleImport {
        name: String,
        source: ImportFailure,
    },
    InvalidIdentifier {
        name: String,
    },
}

impl Display for ResolveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AmbiguousPlugin { hook, domain } => write!(
                f,
                "multiple primary {domain} managers declared for hook {hook}; \
                 mark exactly one class as primary"
            ),
            Self::UnresolvedReference {
                hook,
                class_name,
                available,
            } => {
                write!(f, "cannot find class {class_name} for hook {hook}")?;
                if !available.is_empty() {
                    write!(f, "; available managers are: {}", available.join(", "))?;
                }
                Ok(())
            }
            Self::InvalidManager { hook, domain } => write!(
                f,
                "hook {hook} does not resolve to a {domain} manager subclass"
            ),
            Self::MissingName { hook } => write!(
                f,
                "manager resolved for hook {hook} declares no canonical name"
            ),
            Self::ModuleImport { name, source } => {
                write!(f, "cannot import extension module {name}: {}", source.reason())
            }
            Self::InvalidIdentifier { name } => write!(
                f,
                "canonical name {name} does not end in a valid bare identifier"
            ),
        }
    }
}

impl Error for ResolveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ModuleImport { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Resolves one hook into a constructed manager for `domain`.
pub fn resolve(
    host: &dyn ModuleHost,
    domain: Domain,
    hook: &str,
) -> ResolveResult<ExtensionManager> {
    let mut manager_class: Option<ManagerClass> = None;
    let mut canonical_name: Option<String> = None;

    // Step 1: package-style resolution.
    if let Ok(root) = host.import_module(hook) {
        if host.module_has_submodule(&root, domain.plugin_submodule()) {
            let submodule_path = format!("{hook}.{}", domain.plugin_submodule());
            let submodule = host.import_module(&submodule_path).map_err(|source| {
                ResolveError::ModuleImport {
                    name: submodule_path.clone(),
                    source,
                }
            })?;
            manager_class = select_manager_class(submodule.manager_classes(), domain, hook)?;
        }
        if manager_class.is_none() {
            // No specialized subclass: the module wraps itself verbatim
            // under the hook as canonical name.
            manager_class = Some(ManagerClass::base(domain));
            canonical_name = Some(hook.to_string());
        }
    }

    // Step 2: direct attribute resolution; every failure is swallowed.
    if manager_class.is_none() {
        manager_class = host.get_attribute(hook);
    }

    // Step 3: both module import and manager resolution failed.
    let Some(class) = manager_class else {
        return Err(unresolved_hook(host, domain, hook));
    };

    // Step 4: the resolved class must belong to the domain.
    if !class.is_manager_for(domain) {
        return Err(ResolveError::InvalidManager {
            hook: hook.to_string(),
            domain,
        });
    }

    // Step 5: naming, unless the self-wrap case already fixed it.
    let canonical_name = match canonical_name {
        Some(name) => name,
        None => class
            .declared_alias()
            .map(str::to_string)
            .ok_or_else(|| ResolveError::MissingName {
                hook: hook.to_string(),
            })?,
    };

    // Step 6: materialize the module at the canonical name; this failure
    // points at the name, not the hook.
    let module =
        host.import_module(&canonical_name)
            .map_err(|source| ResolveError::ModuleImport {
                name: canonical_name.clone(),
                source,
            })?;

    // Step 7: construction validates the trailing identifier.
    let manager = ExtensionManager::new(class, &canonical_name, module)?;
    info!(
        "event=hook_resolved module=plugin status=ok domain={domain} hook={hook} manager={} class={}",
        manager.canonical_name(),
        manager.class().class_name()
    );
    Ok(manager)
}

/// Tie-break over the domain submodule's declared classes.
///
/// First pass reads the primary flag with a truthy default; a single
/// candidate wins outright. Otherwise the set narrows to classes that
/// declared `primary = true` explicitly: more than one is ambiguous, one
/// wins, zero leaves the hook unresolved at this step.
fn select_manager_class(
    classes: &[ManagerClass],
    domain: Domain,
    hook: &str,
) -> ResolveResult<Option<ManagerClass>> {
    let candidates: Vec<&ManagerClass> = classes
        .iter()
        .filter(|class| {
            class.is_manager_for(domain)
                && !class.is_base()
                && class.declared_primary().unwrap_or(true)
        })
        .collect();
    if candidates.len() == 1 {
        return Ok(Some(candidates[0].clone()));
    }

    let explicit: Vec<&ManagerClass> = candidates
        .into_iter()
        .filter(|class| class.declared_primary().unwrap_or(false))
        .collect();
    match explicit.as_slice() {
        [] => Ok(None),
        [class] => Ok(Some((*class).clone())),
        _ => Err(ResolveError::AmbiguousPlugin {
            hook: hook.to_string(),
            domain,
        }),
    }
}

/// The class-literal heuristic and its plain-import fallback.
fn unresolved_hook(host: &dyn ModuleHost, domain: Domain, hook: &str) -> ResolveError {
    let (path, component) = split_hook(hook);
    if !path.is_empty() && component.chars().next().is_some_and(|c| c.is_uppercase()) {
        match host.import_module(path) {
            Ok(module) => {
                let available: Vec<String> = module
                    .manager_classes()
                    .iter()
                    .filter(|class| class.is_manager_for(domain) && !class.is_base())
                    .map(|class| class.class_name().to_string())
                    .collect();
                ResolveError::UnresolvedReference {
                    hook: hook.to_string(),
                    class_name: component.to_string(),
                    available,
                }
            }
            Err(source) => ResolveError::ModuleImport {
                name: path.to_string(),
                source,
            },
        }
    } else {
        match host.import_module(hook) {
            Err(source) => ResolveError::ModuleImport {
                name: hook.to_string(),
                source,
            },
            // The hook imports now but did not in step 1; treat the host
            // state as corrupt rather than guess.
            Ok(_) => ResolveError::InvalidManager {
                hook: hook.to_string(),
                domain,
            },
        }
    }
}

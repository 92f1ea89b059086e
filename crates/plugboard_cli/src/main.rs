//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `plugboard_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use plugboard_core::{Domain, ManagerClass, ModuleSpec, Registry, StaticModuleHost, WorkflowType};

fn main() {
    println!("plugboard_core version={}", plugboard_core::core_version());

    // A tiny built-in extension set exercising resolve/register/load.
    let mut host = StaticModuleHost::new();
    host.declare(ModuleSpec::new("builtin"));
    host.declare(
        ModuleSpec::new("builtin.components").manager_class(
            ManagerClass::new(Domain::Component, "BuiltinManager").alias("builtin"),
        ),
    );
    host.declare(
        ModuleSpec::new("builtin.workflows")
            .workflow("builtin", WorkflowType::new("Ping", "builtin.workflows.Ping")),
    );

    let mut registry = Registry::new();
    match registry.populate(&host, Domain::Component, &["builtin"]) {
        Ok(()) => println!("registry managers={}", registry.manager_names().join(",")),
        Err(err) => println!("registry error={err}"),
    }
}

use plugboard_core::{
    resolve, Domain, ManagerClass, ModuleHost, ModuleSpec, ResolveError, StaticModuleHost,
};

fn shop_host() -> StaticModuleHost {
    let mut host = StaticModuleHost::new();
    host.declare(ModuleSpec::new("shop"));
    host.declare(
        ModuleSpec::new("shop.components")
            .manager_class(ManagerClass::new(Domain::Component, "ShopManager").alias("shop")),
    );
    host
}

#[test]
fn resolves_single_primary_default_manager_from_package_hook() {
    let host = shop_host();
    let manager = resolve(&host, Domain::Component, "shop").expect("package hook should resolve");

    assert_eq!(manager.class().class_name(), "ShopManager");
    assert_eq!(manager.canonical_name(), "shop");
    let imported = host.import_module("shop").expect("declared module imports");
    assert!(manager.module().same_module(&imported));
}

#[test]
fn narrows_to_the_explicit_primary_manager() {
    let mut host = StaticModuleHost::new();
    host.declare(ModuleSpec::new("shop"));
    host.declare(
        ModuleSpec::new("shop.components")
            .manager_class(ManagerClass::new(Domain::Component, "DefaultManager"))
            .manager_class(
                ManagerClass::new(Domain::Component, "PrimaryManager")
                    .primary(true)
                    .alias("shop"),
            ),
    );

    let manager = resolve(&host, Domain::Component, "shop").expect("explicit primary should win");
    assert_eq!(manager.class().class_name(), "PrimaryManager");
}

#[test]
fn two_explicit_primaries_are_ambiguous() {
    let mut host = StaticModuleHost::new();
    host.declare(ModuleSpec::new("shop"));
    host.declare(
        ModuleSpec::new("shop.components")
            .manager_class(ManagerClass::new(Domain::Component, "FirstManager").primary(true))
            .manager_class(ManagerClass::new(Domain::Component, "SecondManager").primary(true)),
    );

    let err = resolve(&host, Domain::Component, "shop")
        .expect_err("two explicit primaries must be ambiguous");
    assert!(matches!(err, ResolveError::AmbiguousPlugin { .. }));
}

#[test]
fn undeclared_primaries_fall_through_to_self_wrap() {
    let mut host = StaticModuleHost::new();
    host.declare(ModuleSpec::new("shop"));
    host.declare(
        ModuleSpec::new("shop.components")
            .manager_class(ManagerClass::new(Domain::Component, "FirstManager"))
            .manager_class(ManagerClass::new(Domain::Component, "SecondManager")),
    );

    let manager =
        resolve(&host, Domain::Component, "shop").expect("zero explicit primaries self-wrap");
    assert!(manager.class().is_base());
    assert_eq!(manager.canonical_name(), "shop");
}

#[test]
fn plain_module_self_wraps_under_the_hook_name() {
    let mut host = StaticModuleHost::new();
    host.declare(ModuleSpec::new("pkg"));
    host.declare(ModuleSpec::new("pkg.sub"));

    let manager = resolve(&host, Domain::Component, "pkg.sub").expect("plain module self-wraps");
    assert!(manager.class().is_base());
    assert_eq!(manager.class().class_name(), "ComponentManager");
    assert_eq!(manager.canonical_name(), "sub");
    let imported = host
        .import_module("pkg.sub")
        .expect("declared module imports");
    assert!(manager.module().same_module(&imported));
}

#[test]
fn attribute_hook_resolves_through_the_module() {
    let mut host = StaticModuleHost::new();
    host.declare(
        ModuleSpec::new("ext")
            .manager_class(ManagerClass::new(Domain::Component, "ShopManager").alias("shop")),
    );
    host.declare(ModuleSpec::new("shop"));

    let manager = resolve(&host, Domain::Component, "ext.ShopManager")
        .expect("attribute hook should resolve");
    assert_eq!(manager.class().class_name(), "ShopManager");
    assert_eq!(manager.canonical_name(), "shop");
}

#[test]
fn class_literal_heuristic_lists_available_managers() {
    let mut host = StaticModuleHost::new();
    host.declare(
        ModuleSpec::new("ext")
            .manager_class(ManagerClass::new(Domain::Component, "OtherManager").alias("other")),
    );

    let err = resolve(&host, Domain::Component, "ext.MissingManager")
        .expect_err("missing class must be unresolved");
    match err {
        ResolveError::UnresolvedReference {
            class_name,
            available,
            ..
        } => {
            assert_eq!(class_name, "MissingManager");
            assert_eq!(available, vec!["OtherManager".to_string()]);
        }
        other => panic!("expected UnresolvedReference, got {other:?}"),
    }
}

#[test]
fn lowercase_missing_hooks_surface_the_import_error() {
    let mut host = StaticModuleHost::new();
    host.declare(ModuleSpec::new("ext"));

    let err = resolve(&host, Domain::Component, "nosuch").expect_err("bare missing hook fails");
    assert!(matches!(err, ResolveError::ModuleImport { ref name, .. } if name == "nosuch"));

    let err =
        resolve(&host, Domain::Component, "ext.nosub").expect_err("dotted missing hook fails");
    assert!(matches!(err, ResolveError::ModuleImport { ref name, .. } if name == "ext.nosub"));
}

#[test]
fn wrong_domain_attribute_is_an_invalid_manager() {
    let mut host = StaticModuleHost::new();
    host.declare(
        ModuleSpec::new("ext")
            .manager_class(ManagerClass::new(Domain::Agent, "FleetManager").alias("fleet")),
    );

    let err = resolve(&host, Domain::Component, "ext.FleetManager")
        .expect_err("agent class must not satisfy a component hook");
    assert!(matches!(err, ResolveError::InvalidManager { .. }));
}

#[test]
fn manager_without_alias_is_missing_name() {
    let mut host = StaticModuleHost::new();
    host.declare(ModuleSpec::new("shop"));
    host.declare(
        ModuleSpec::new("shop.components")
            .manager_class(ManagerClass::new(Domain::Component, "NamelessManager")),
    );

    let err = resolve(&host, Domain::Component, "shop").expect_err("missing alias must fail");
    assert!(matches!(err, ResolveError::MissingName { .. }));
}

#[test]
fn unimportable_canonical_name_points_at_the_name() {
    let mut host = StaticModuleHost::new();
    host.declare(ModuleSpec::new("shop"));
    host.declare(
        ModuleSpec::new("shop.components")
            .manager_class(ManagerClass::new(Domain::Component, "GhostManager").alias("ghost")),
    );

    let err = resolve(&host, Domain::Component, "shop")
        .expect_err("unimportable canonical name must fail");
    assert!(matches!(err, ResolveError::ModuleImport { ref name, .. } if name == "ghost"));
}

#[test]
fn canonical_name_must_end_in_a_bare_identifier() {
    let mut host = StaticModuleHost::new();
    host.declare(ModuleSpec::new("shop"));
    host.declare(
        ModuleSpec::new("shop.components")
            .manager_class(ManagerClass::new(Domain::Component, "BadManager").alias("shop.9bad")),
    );
    host.declare(ModuleSpec::new("shop.9bad"));

    let err = resolve(&host, Domain::Component, "shop").expect_err("digit-led segment must fail");
    assert!(matches!(err, ResolveError::InvalidIdentifier { .. }));
}

#[test]
fn agent_domain_scans_its_own_submodule() {
    let mut host = StaticModuleHost::new();
    host.declare(ModuleSpec::new("fleet"));
    host.declare(
        ModuleSpec::new("fleet.agents")
            .manager_class(ManagerClass::new(Domain::Agent, "FleetManager").alias("fleet")),
    );

    let manager = resolve(&host, Domain::Agent, "fleet").expect("agent hook should resolve");
    assert_eq!(manager.class().class_name(), "FleetManager");
    assert_eq!(manager.class().domain(), Domain::Agent);
}

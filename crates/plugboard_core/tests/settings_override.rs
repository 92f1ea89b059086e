use plugboard_core::{
    RuntimeContext, SettingsSource, StaticSettingsSource, StaticSourceLoader, StoreError,
    SETTING_COMPONENTS_REGISTRY, SETTING_DEBUG,
};
use serde_json::json;
use std::rc::Rc;

#[test]
fn factory_defaults_flow_into_every_fresh_store() {
    let context = RuntimeContext::with_defaults();
    assert_eq!(context.configuration().get(SETTING_DEBUG), Some(&json!(true)));
    assert_eq!(
        context.environment().get(SETTING_COMPONENTS_REGISTRY),
        Some(&json!([]))
    );
}

#[test]
fn update_admits_new_settings_while_direct_set_stays_gated() {
    let mut context = RuntimeContext::with_defaults();

    // update(x=1) on a store that never had x succeeds.
    context
        .configuration_mut()
        .update([("x".to_string(), json!(1))]);
    assert_eq!(context.configuration().get("x"), Some(&json!(1)));

    // A direct set of an unknown name is rejected with the update() hint.
    let err = context
        .configuration_mut()
        .set("y", json!(2))
        .expect_err("unknown setting must be rejected");
    assert!(matches!(err, StoreError::UnknownSetting { ref name, .. } if name == "y"));
    assert!(err.to_string().contains("update()"));
}

#[test]
fn user_source_shadows_defaults_without_counting_as_override() {
    let user: Rc<dyn SettingsSource> = Rc::new(
        StaticSettingsSource::new("user.settings")
            .set(SETTING_DEBUG, json!(false))
            .set("theme", json!("dark")),
    );
    let mut context = RuntimeContext::with_user_sources(Some(user), None);

    assert_eq!(context.configuration().get(SETTING_DEBUG), Some(&json!(false)));
    assert_eq!(context.configuration().get("theme"), Some(&json!("dark")));
    assert_eq!(context.configuration().user_source(), Some("user.settings"));
    assert!(!context.configuration().is_overridden(SETTING_DEBUG));

    // Post-materialization updates of known names are tracked.
    context
        .configuration_mut()
        .update([(SETTING_DEBUG.to_string(), json!(true))]);
    assert!(context.configuration().is_overridden(SETTING_DEBUG));
}

#[test]
fn stores_materialize_independently_and_only_on_access() {
    let context = RuntimeContext::with_defaults();
    assert!(!context.is_configured());
    assert!(!context.is_environment_loaded());

    context.configuration();
    assert!(context.is_configured());
    assert!(!context.is_environment_loaded());
}

#[test]
fn from_env_without_variables_set_uses_defaults_only() {
    // Neither PLUGBOARD_CONFIG_MODULE nor PLUGBOARD_ENVIRONMENT_MODULE is
    // set in the test environment, so no loader lookup happens.
    let loader = StaticSourceLoader::new();
    let context = RuntimeContext::from_env(&loader).expect("defaults-only context");
    assert_eq!(context.configuration().user_source(), None);
    assert_eq!(context.environment().user_source(), None);
}

//! Registration and lookup of components.

use std::any::{type_name, TypeId};
use std::sync::Arc;

use super::support::*;
use crate::registry::derive_name;
use crate::*;

#[test]
fn duplicate_name_is_rejected() {
    let mut context = BringUpContext::new();
    context
        .register_named(shared(Plain), "plain")
        .expect("first registration");

    let err = context
        .register_named(shared(Database::default()), "plain")
        .unwrap_err();
    assert!(matches!(err, WiringError::DuplicateComponent { ref name } if name == "plain"));
    assert_eq!(context.len(), 1);
}

#[test]
fn derived_name_is_the_type_path() {
    let mut context = BringUpContext::new();
    context.register(shared(Plain)).expect("registration");
    let container = context.start().expect("bring-up");

    assert_eq!(derive_name::<Plain>().unwrap(), type_name::<Plain>());
    assert!(container.contains(type_name::<Plain>()));
}

#[test]
fn derived_name_collision_is_rejected() {
    let mut context = BringUpContext::new();
    context.register(shared(Plain)).expect("first registration");

    let err = context.register(shared(Plain)).unwrap_err();
    assert!(
        matches!(err, WiringError::DuplicateComponent { ref name } if name == type_name::<Plain>())
    );
}

#[test]
fn same_type_can_be_registered_under_several_names() {
    let mut context = BringUpContext::new();
    context.register_named(shared(Plain), "a").unwrap();
    context.register_named(shared(Plain), "b").unwrap();

    let container = context.start().expect("unused duplicates are not ambiguous");
    assert_eq!(container.len(), 2);
}

#[test]
fn get_returns_the_registered_reference() {
    let db = shared(Database::default());
    let mut context = BringUpContext::new();
    context.register_value("db.url", "postgres://db").unwrap();
    context.register_named(db.clone(), "db").unwrap();

    let container = context.start().expect("bring-up");
    let found: Shared<Database> = container.get("db").expect("registered");
    assert!(Arc::ptr_eq(&found, &db));
    assert_eq!(db.read().unwrap().url, "postgres://db");
}

#[test]
fn get_unknown_name_is_not_found() {
    let container = BringUpContext::new().start().expect("empty bring-up");
    assert!(container.is_empty());

    let err = container
        .get::<Plain>("missing")
        .err()
        .expect("nothing registered under this name");
    assert!(matches!(err, WiringError::NotFound { ref name } if name == "missing"));
}

#[test]
fn get_with_another_type_fails() {
    let mut context = BringUpContext::new();
    context.register_named(shared(Plain), "plain").unwrap();
    let container = context.start().unwrap();

    let err = container
        .get::<Database>("plain")
        .err()
        .expect("registered with another type");
    assert!(matches!(
        err,
        WiringError::WrongType { ref name, actual, expected }
            if name == "plain" && actual == type_name::<Plain>() && expected == type_name::<Database>()
    ));
}

#[test]
fn get_capability_returns_a_view_on_the_same_instance() {
    let console = shared(ConsoleLogger::default());
    let mut context = BringUpContext::new();
    context.register_named(console.clone(), "console").unwrap();
    context.register_named(shared(Plain), "plain").unwrap();
    let container = context.start().unwrap();

    let flush: Shared<dyn Flush> = container.get_capability("console").unwrap();
    flush.write().unwrap().flush();
    assert_eq!(console.read().unwrap().flushed, 1);

    let err = container
        .get_capability::<dyn Logger>("plain")
        .err()
        .expect("plain advertises no capability");
    assert!(matches!(err, WiringError::WrongType { .. }));
}

#[test]
fn capability_lookup_requires_every_capability() {
    let mut context = BringUpContext::new();
    context.register_named(shared(ConsoleLogger::default()), "console").unwrap();
    context.register_named(shared(FileLogger), "file").unwrap();
    context.register_named(shared(Plain), "plain").unwrap();

    let registry = &context.registry;
    let logger = TypeId::of::<dyn Logger>();
    let flush = TypeId::of::<dyn Flush>();
    assert_eq!(registry.lookup_by_capability(&[logger]), vec![0, 1]);
    assert_eq!(registry.lookup_by_capability(&[logger, flush]), vec![0]);
    assert_eq!(registry.lookup_by_type(TypeId::of::<Plain>()), &[2]);
    assert!(registry.lookup_by_type(TypeId::of::<dyn Logger>()).is_empty());
    assert_eq!(registry.lookup_by_name("file"), Some(1));
    assert_eq!(registry.lookup_by_name("other"), None);
}

fn name_of<T: 'static>(_: &T) -> Result<String, WiringError> {
    derive_name::<T>()
}

#[test]
fn closure_types_have_no_name() {
    let err = name_of(&|| ()).unwrap_err();
    assert!(
        matches!(err, WiringError::UnnamedType { type_name: name } if name.ends_with("{{closure}}"))
    );
}

#[test]
fn types_declared_in_a_closure_keep_their_path() {
    let register = || -> Result<String, WiringError> {
        struct Local;
        impl Component for Local {}

        let mut context = BringUpContext::new();
        context.register(shared(Local))?;
        let container = context.start()?;
        assert!(container.contains(type_name::<Local>()));
        derive_name::<Local>()
    };

    let name = register().expect("a local struct is a named type");
    assert!(name.ends_with("::Local"));
}

#[test]
fn generic_arguments_do_not_hide_the_type_name() {
    assert_eq!(
        derive_name::<Vec<Plain>>().unwrap(),
        type_name::<Vec<Plain>>()
    );
}

#[test]
fn container_debug_lists_sorted_names() {
    let mut context = BringUpContext::new();
    context.register_named(shared(Plain), "b").unwrap();
    context.register_named(shared(Plain), "a").unwrap();
    let container = context.start().unwrap();

    assert_eq!(
        format!("{container:?}"),
        r#"Container { components: ["a", "b"] }"#
    );
}

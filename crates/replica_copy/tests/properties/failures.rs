//! Errors that abort a copy.

use pretty_assertions::assert_eq;
use replica_copy::{
    deep_copy, AccessFailure, CopyError, CopyOptions, DeepCopier, InstantiationFailure,
};
use replica_value::{
    structurally_equal, ObjRef, ObjectData, TypeDef, TypeId, TypeRegistry, Value, Visibility,
};

use crate::common::world;

fn endpoint_types(raw_alloc: bool) -> (TypeRegistry, TypeId) {
    let mut registry = TypeRegistry::new();
    let endpoint = registry
        .define(TypeDef::new("Endpoint").slot("scheme", Visibility::Protected))
        .unwrap();
    let mut socket = TypeDef::new("Socket")
        .extends(endpoint)
        .slot("host", Visibility::Private)
        .slot("port", Visibility::Private)
        .requires_args();
    if raw_alloc {
        socket = socket.allow_raw_alloc();
    }
    let socket = registry.define(socket).unwrap();
    (registry, socket)
}

fn socket(registry: &TypeRegistry, ty: TypeId) -> Value {
    registry
        .new_record(
            ty,
            [
                ("scheme", Value::from("tcp")),
                ("host", Value::from("db.local")),
                ("port", Value::Int(5432)),
            ],
        )
        .unwrap()
}

fn fail_init(_: &mut ObjectData) -> Result<(), String> {
    Err("registry offline".to_string())
}

#[test]
fn raw_allocation_populates_every_slot() {
    let (registry, ty) = endpoint_types(true);
    let source = socket(&registry, ty);

    let copy = deep_copy(&registry, &source).unwrap();
    assert!(!copy.is_same(&source));
    assert!(structurally_equal(&copy, &source));
}

#[test]
fn args_only_type_without_opt_in_fails() {
    let (registry, ty) = endpoint_types(false);
    let source = Value::list(vec![socket(&registry, ty)]);

    let err = deep_copy(&registry, &source).unwrap_err();
    assert_eq!(
        err,
        CopyError::instantiation("Socket", InstantiationFailure::NoInitializer)
    );
}

#[test]
fn initializer_failure_aborts_the_copy() {
    let mut registry = TypeRegistry::new();
    let config = registry
        .define(TypeDef::new("Config").init_hook(fail_init))
        .unwrap();
    let source = Value::map([(
        Value::from("cfg"),
        Value::Obj(ObjRef::new(config, ObjectData::Record(vec![]))),
    )]);

    let err = deep_copy(&registry, &source).unwrap_err();
    assert_eq!(err.type_name(), "Config");
    assert!(matches!(
        err,
        CopyError::Instantiation {
            reason: InstantiationFailure::InitializerFailed(ref message),
            ..
        } if message == "registry offline"
    ));
}

#[test]
fn unregistered_type_fails() {
    let registry = TypeRegistry::new();
    let ty = TypeId::from_raw(999);
    let source = Value::Obj(ObjRef::new(ty, ObjectData::Record(vec![])));

    let err = deep_copy(&registry, &source).unwrap_err();
    assert_eq!(
        err,
        CopyError::instantiation("TypeId(999)", InstantiationFailure::UnknownType(ty))
    );
}

#[test]
fn sealed_slot_names_type_and_slot() {
    let mut registry = TypeRegistry::new();
    let vault = registry
        .define(
            TypeDef::new("Vault")
                .slot("label", Visibility::Public)
                .slot("secret", Visibility::Sealed),
        )
        .unwrap();
    let source = registry.new_record(vault, [("label", Value::from("v"))]).unwrap();

    let err = deep_copy(&registry, &source).unwrap_err();
    assert_eq!(err, CopyError::access("Vault", "secret", AccessFailure::Sealed));
    assert_eq!(
        err.to_string(),
        "cannot access `Vault.secret`: slot is sealed against forced access"
    );
}

#[test]
fn unset_source_slot_fails() {
    let w = world();
    let source = Value::Obj(ObjRef::new(
        w.node,
        ObjectData::Record(vec![Some(Value::from("half")), None]),
    ));

    let err = deep_copy(&w.registry, &source).unwrap_err();
    assert_eq!(err, CopyError::access("Node", "next", AccessFailure::Unset));
}

#[test]
fn depth_limit_reports_the_type() {
    let w = world();
    let head = w.chain(10);

    let options = CopyOptions::new().with_max_depth(3).without_stack_growth();
    let err = DeepCopier::with_options(&w.registry, options)
        .copy(&head)
        .unwrap_err();
    assert_eq!(
        err,
        CopyError::DepthExceeded {
            type_name: "Node".to_string(),
            limit: 3,
        }
    );

    let options = CopyOptions::new().with_max_depth(10);
    assert!(DeepCopier::with_options(&w.registry, options).copy(&head).is_ok());
}

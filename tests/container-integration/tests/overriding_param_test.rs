//! 参数覆盖集成测试


use common::{container, name, PrimitiveWithDefault, PrimitiveWithoutDefault};
use container_abstractions::{
    Arguments, Injectable, Parameter, RegistryExt, Resolver, ResolverExt, ServiceContainer,
};
use container_common::{ContainerError, ContainerResult, Overrides, Value};
use serde_json::json;
use std::sync::Arc;

/// 把收到的参数覆盖原样返回
fn echo(_: &dyn ServiceContainer, overrides: &Overrides) -> ContainerResult<Value> {
    Ok(Arc::new(overrides.clone()) as Value)
}

#[test]
fn test_override_param_without_default() {
    let container = container();
    container.bind(name::<PrimitiveWithoutDefault>(), None).unwrap();

    let resolved = container
        .make_as_with::<PrimitiveWithoutDefault>(
            name::<PrimitiveWithoutDefault>(),
            &Overrides::new().with("age", 25i64),
        )
        .unwrap();
    assert_eq!(resolved.age, 25);
}

#[test]
fn test_override_replaces_default() {
    let container = container();
    let resolved = container
        .make_as_with::<PrimitiveWithDefault>(
            name::<PrimitiveWithDefault>(),
            &Overrides::new().with("int", 9i64),
        )
        .unwrap();
    assert_eq!(resolved.int, 9);
}

#[test]
fn test_closure_overrides() {
    let container = container();
    container.bind_factory("foo", echo).unwrap();

    let received = container
        .make_as_with::<Overrides>("foo", &Overrides::new().with("age", 25i64))
        .unwrap();
    assert_eq!(*received.get_as::<i64>("age").unwrap(), 25);
    assert_eq!(received.len(), 1);
}

#[test]
fn test_nested_overrides() {
    let container = container();
    container
        .bind_factory("foo", |c: &dyn ServiceContainer, _: &Overrides| {
            c.make_with("bar", &Overrides::new().with("name", "Derek".to_string()))
        })
        .unwrap();
    container.bind_factory("bar", echo).unwrap();

    let received = container.make_as::<Overrides>("foo").unwrap();
    assert_eq!(received.get_as::<String>("name").unwrap().as_str(), "Derek");
}

#[test]
fn test_override_multiple_times() {
    let container = container();
    container.bind_factory("foo", echo).unwrap();

    for expected in ["Derek", "Soriam", "Amara"] {
        let overrides = Overrides::new().with("name", expected.to_string());
        let received = container.make_as_with::<Overrides>("foo", &overrides).unwrap();
        assert_eq!(received.get_as::<String>("name").unwrap().as_str(), expected);
    }
}

#[test]
fn test_overrides_are_not_propagated_to_dependencies() {
    let container = container();
    container.catalog().register::<Holder>();

    let overrides = Overrides::new().with("age", 3i64);
    let error = container.make_with(name::<Holder>(), &overrides).unwrap_err();
    assert!(matches!(
        error,
        ContainerError::ArgumentResolution { ref parameter, .. } if parameter == "age"
    ));
}

#[test]
fn test_overrides_are_ignored_for_cached_singleton() {
    let container = container();
    container.singleton(name::<PrimitiveWithoutDefault>(), None).unwrap();

    let first = container
        .make_as_with::<PrimitiveWithoutDefault>(
            name::<PrimitiveWithoutDefault>(),
            &Overrides::new().with("age", 25i64),
        )
        .unwrap();
    let second = container
        .make_as_with::<PrimitiveWithoutDefault>(
            name::<PrimitiveWithoutDefault>(),
            &Overrides::new().with("age", 40i64),
        )
        .unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.age, 25);
}

#[test]
fn test_overrides_from_json() {
    let container = container();
    let overrides = Overrides::from_json(json!({ "age": 31 })).unwrap();

    let resolved = container
        .make_as_with::<PrimitiveWithoutDefault>(name::<PrimitiveWithoutDefault>(), &overrides)
        .unwrap();
    assert_eq!(resolved.age, 31);
}

/// 依赖 [`PrimitiveWithoutDefault`]
#[derive(Debug)]
struct Holder;

impl Injectable for Holder {
    fn parameters() -> Vec<Parameter> {
        vec![Parameter::typed::<PrimitiveWithoutDefault>("inner")]
    }

    fn construct(_arguments: &Arguments) -> ContainerResult<Self> {
        Ok(Self)
    }
}

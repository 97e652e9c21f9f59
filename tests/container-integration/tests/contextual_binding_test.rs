//! 上下文绑定集成测试


use common::*;
use container_abstractions::{
    Concrete, RegistryExt, Resolver, ResolverExt, ServiceContainer, ServiceRegistry,
};
use container_common::{ContainerError, Overrides, Value};
use std::sync::Arc;

fn bind_contract_to_a(container: &container_impl::Container) {
    container
        .bind(contract(), Some(Concrete::of::<ImplA>()))
        .unwrap();
}

#[test]
fn test_contextual_binding_must_give_something() {
    let container = container();
    let error = container
        .when([name::<ConsumerC>()])
        .needs("")
        .give(Concrete::of::<ImplB>())
        .unwrap_err();
    assert!(matches!(error, ContainerError::Configuration { .. }));

    let error = container
        .when(Vec::<String>::new())
        .needs(contract())
        .give(Concrete::of::<ImplB>())
        .unwrap_err();
    assert!(matches!(error, ContainerError::Configuration { .. }));
}

#[test]
fn test_contextually_bind_class() {
    let container = container();
    bind_contract_to_a(&container);
    container
        .when([name::<ConsumerC>()])
        .needs(contract())
        .give(Concrete::of::<ImplB>())
        .unwrap();

    let consumer = container.make_as::<ConsumerC>(name::<ConsumerC>()).unwrap();
    assert_eq!(contract_label(&consumer.contract), "B");

    let other = container.make_as::<ConsumerD>(name::<ConsumerD>()).unwrap();
    assert_eq!(contract_label(&other.contract), "A");
}

#[test]
fn test_contextual_binding_is_not_used_for_top_level_requests() {
    let container = container();
    container
        .when([name::<ConsumerC>()])
        .needs(contract())
        .give(Concrete::of::<ImplB>())
        .unwrap();

    let error = container.make(contract()).unwrap_err();
    assert!(matches!(error, ContainerError::Resolution { .. }));
    assert!(error.to_string().contains("无法实例化"));
}

#[test]
fn test_contextually_bind_multiple_classes() {
    let container = container();
    bind_contract_to_a(&container);
    container
        .when([name::<ConsumerC>(), name::<ConsumerD>()])
        .needs(contract())
        .give(Concrete::of::<ImplB>())
        .unwrap();

    let c = container.make_as::<ConsumerC>(name::<ConsumerC>()).unwrap();
    let d = container.make_as::<ConsumerD>(name::<ConsumerD>()).unwrap();
    assert_eq!(contract_label(&c.contract), "B");
    assert_eq!(contract_label(&d.contract), "B");
}

#[test]
fn test_contextually_bind_closure() {
    let container = container();
    container
        .when([name::<ConsumerC>()])
        .needs(contract())
        .give_factory(|c: &dyn ServiceContainer, _: &Overrides| c.make(name::<ImplB>()))
        .unwrap();

    let consumer = container.make_as::<ConsumerC>(name::<ConsumerC>()).unwrap();
    assert_eq!(contract_label(&consumer.contract), "B");
}

#[test]
fn test_contextual_binding_matches_immediate_consumer_only() {
    let container = container();
    bind_contract_to_a(&container);
    container
        .when([name::<ConsumerC>()])
        .needs(contract())
        .give(Concrete::of::<ImplB>())
        .unwrap();

    let outer = container.make_as::<Outer>(name::<Outer>()).unwrap();
    assert_eq!(contract_label(&outer.consumer.contract), "B");
    assert_eq!(contract_label(&outer.contract), "A");
}

#[test]
fn test_contextual_binding_through_dependency_alias() {
    let container = container();
    container.alias(contract(), &["contract"]).unwrap();
    bind_contract_to_a(&container);
    container
        .when([name::<ConsumerC>()])
        .needs("contract")
        .give(Concrete::of::<ImplB>())
        .unwrap();

    let consumer = container.make_as::<ConsumerC>(name::<ConsumerC>()).unwrap();
    assert_eq!(contract_label(&consumer.contract), "B");
}

#[test]
fn test_contextual_implementation_is_not_cached_under_dependency() {
    let container = container();
    container.singleton(name::<ImplB>(), None).unwrap();
    container
        .when([name::<ConsumerC>()])
        .needs(contract())
        .give(Concrete::of::<ImplB>())
        .unwrap();

    let first = container.make_as::<ConsumerC>(name::<ConsumerC>()).unwrap();
    let second = container.make_as::<ConsumerC>(name::<ConsumerC>()).unwrap();
    assert!(Arc::ptr_eq(&first.contract, &second.contract));
    assert!(!container.bound(contract()));

    let shared: Value = container.make(name::<ImplB>()).unwrap();
    assert!(Arc::ptr_eq(&shared, &first.contract));
}

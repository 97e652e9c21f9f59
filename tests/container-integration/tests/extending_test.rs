//! 扩展函数集成测试


use common::{container, name, ExtendableStub};
use container_abstractions::{
    Concrete, RegistryExt, Resolver, ResolverExt, ServiceContainer, ServiceRegistry,
};
use container_common::{ContainerResult, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn stub(value: &Value) -> &ExtendableStub {
    value
        .downcast_ref::<ExtendableStub>()
        .expect("expected ExtendableStub")
}

fn set_a(value: Value, _: &dyn ServiceContainer) -> ContainerResult<Value> {
    stub(&value).a.store(1, Ordering::SeqCst);
    Ok(value)
}

fn set_b(value: Value, _: &dyn ServiceContainer) -> ContainerResult<Value> {
    stub(&value).b.store(2, Ordering::SeqCst);
    Ok(value)
}

fn set_c(value: Value, _: &dyn ServiceContainer) -> ContainerResult<Value> {
    stub(&value).c.store(3, Ordering::SeqCst);
    Ok(value)
}

#[test]
fn test_extend_service() {
    let container = container();
    container
        .bind("foo", Some(Concrete::of::<ExtendableStub>()))
        .unwrap();
    container.extend_with("foo", set_a).unwrap();

    let service = container.make_as::<ExtendableStub>("foo").unwrap();
    assert_eq!(service.a(), 1);

    let fresh = container.make_as::<ExtendableStub>("foo").unwrap();
    assert!(!Arc::ptr_eq(&service, &fresh));
    assert_eq!(fresh.a(), 1);
}

#[test]
fn test_extend_singleton() {
    let container = container();
    container
        .singleton("foo", Some(Concrete::of::<ExtendableStub>()))
        .unwrap();
    container.extend_with("foo", set_a).unwrap();

    let service = container.make_as::<ExtendableStub>("foo").unwrap();
    assert_eq!(service.a(), 1);
    assert!(Arc::ptr_eq(
        &service,
        &container.make_as::<ExtendableStub>("foo").unwrap()
    ));
}

#[test]
fn test_extend_instance() {
    let container = container();
    let service = Arc::new(ExtendableStub::default());
    container.instance("foo", service.clone()).unwrap();

    container.extend_with("foo", set_a).unwrap();
    assert_eq!(service.a(), 1);

    let resolved = container.make_as::<ExtendableStub>("foo").unwrap();
    assert!(Arc::ptr_eq(&service, &resolved));
}

#[test]
fn test_extend_cached_singleton_without_reconstruction() {
    let container = container();
    let constructed = Arc::new(AtomicUsize::new(0));
    let counter = constructed.clone();
    container
        .singleton_factory("foo", move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(ExtendableStub::default()) as Value)
        })
        .unwrap();
    let before = container.make_as::<ExtendableStub>("foo").unwrap();

    container.extend_with("foo", set_b).unwrap();
    let after = container.make_as::<ExtendableStub>("foo").unwrap();

    assert!(Arc::ptr_eq(&before, &after));
    assert_eq!(after.b(), 2);
    assert_eq!(constructed.load(Ordering::SeqCst), 1);
}

#[test]
fn test_extender_can_replace_cached_instance() {
    let container = container();
    container.instance_of("answer", 1i64).unwrap();
    container
        .extend_with("answer", |value, _| {
            let current = value.downcast_ref::<i64>().copied().unwrap_or_default();
            Ok(Arc::new(current + 41) as Value)
        })
        .unwrap();

    assert_eq!(*container.make_as::<i64>("answer").unwrap(), 42);
}

#[test]
fn test_multiple_extensions() {
    let container = container();
    container
        .bind("foo", Some(Concrete::of::<ExtendableStub>()))
        .unwrap();
    container.extend_with("foo", set_a).unwrap();
    container.extend_with("foo", set_b).unwrap();
    container.extend_with("foo", set_c).unwrap();

    let service = container.make_as::<ExtendableStub>("foo").unwrap();
    assert_eq!((service.a(), service.b(), service.c()), (1, 2, 3));
}

#[test]
fn test_extensions_run_in_registration_order() {
    let container = container();
    container
        .bind_factory("word", |_, _| Ok(Arc::new(String::new()) as Value))
        .unwrap();
    for suffix in ["a", "b", "c"] {
        container
            .extend_with("word", move |value, _| {
                let current = value.downcast_ref::<String>().cloned().unwrap_or_default();
                Ok(Arc::new(current + suffix) as Value)
            })
            .unwrap();
    }

    assert_eq!(container.make_as::<String>("word").unwrap().as_str(), "abc");
}

#[test]
fn test_extend_alias() {
    let container = container();
    container
        .bind("foo", Some(Concrete::of::<ExtendableStub>()))
        .unwrap();
    container.alias("foo", &["bar"]).unwrap();
    container.extend_with("bar", set_a).unwrap();

    let service = container.make_as::<ExtendableStub>("foo").unwrap();
    assert_eq!(service.a(), 1);
}

#[test]
fn test_lazy_extension() {
    let container = container();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    container
        .bind("foo", Some(Concrete::of::<ExtendableStub>()))
        .unwrap();
    container
        .extend_with("foo", move |value, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(value)
        })
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    container.make("foo").unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_extend_before_bind() {
    let container = container();
    container.extend_with("foo", set_a).unwrap();
    container
        .bind("foo", Some(Concrete::of::<ExtendableStub>()))
        .unwrap();

    let service = container.make_as::<ExtendableStub>("foo").unwrap();
    assert_eq!(service.a(), 1);
}

#[test]
fn test_extenders_only_apply_to_requested_alias() {
    let container = container();
    container
        .bind("foo", Some(Concrete::of::<ExtendableStub>()))
        .unwrap();
    container.extend_with(name::<ExtendableStub>(), set_a).unwrap();

    let service = container.make_as::<ExtendableStub>("foo").unwrap();
    assert_eq!(service.a(), 0);
}

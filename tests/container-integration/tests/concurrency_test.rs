//! 并发解析集成测试


use common::{container, name, ServiceStub};
use container_abstractions::{Arguments, Injectable, RegistryExt, Resolver};
use container_common::{ContainerError, ContainerResult, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Barrier};
use std::thread;
use std::time::Duration;

static SLOW_CONSTRUCTIONS: AtomicUsize = AtomicUsize::new(0);

/// 构造缓慢的单例，统计构造次数
#[derive(Debug)]
struct SlowSingleton;

impl Injectable for SlowSingleton {
    fn construct(_arguments: &Arguments) -> ContainerResult<Self> {
        SLOW_CONSTRUCTIONS.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(20));
        Ok(Self)
    }
}

#[test]
fn test_singleton_is_constructed_at_most_once() {
    let container = Arc::new(container());
    container.register_class::<SlowSingleton>();
    container.singleton(name::<SlowSingleton>(), None).unwrap();

    let barrier = Arc::new(Barrier::new(8));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let container = container.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                container.make(name::<SlowSingleton>()).unwrap()
            })
        })
        .collect();

    let resolved: Vec<Value> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    assert_eq!(SLOW_CONSTRUCTIONS.load(Ordering::SeqCst), 1);
    assert!(resolved.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
}

#[test]
fn test_shared_factory_runs_once_under_contention() {
    let container = Arc::new(container());
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    container
        .singleton_factory("slow", move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(20));
            Ok(Arc::new(ServiceStub) as Value)
        })
        .unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let container = container.clone();
            thread::spawn(move || container.make("slow").unwrap())
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_registration_interleaves_with_resolution() {
    let container = Arc::new(container());
    let writer = {
        let container = container.clone();
        thread::spawn(move || {
            for index in 0..100 {
                container
                    .instance_of(&format!("service-{index}"), index as i64)
                    .unwrap();
            }
        })
    };

    for _ in 0..100 {
        container.make(name::<ServiceStub>()).unwrap();
    }
    writer.join().unwrap();

    assert_eq!(*container.make("service-99").unwrap().downcast::<i64>().unwrap(), 99);
}

#[test]
fn test_cross_thread_circular_singletons_fail_instead_of_blocking() {
    let container = Arc::new(container());
    container
        .singleton_factory("A", |container, _| {
            thread::sleep(Duration::from_millis(100));
            container.make("B")
        })
        .unwrap();
    container
        .singleton_factory("B", |container, _| {
            thread::sleep(Duration::from_millis(100));
            container.make("A")
        })
        .unwrap();

    let barrier = Arc::new(Barrier::new(2));
    let (tx, rx) = mpsc::channel();
    for alias in ["A", "B"] {
        let container = container.clone();
        let barrier = barrier.clone();
        let tx = tx.clone();
        thread::spawn(move || {
            barrier.wait();
            tx.send(container.make(alias)).unwrap();
        });
    }

    for _ in 0..2 {
        let result = rx
            .recv_timeout(Duration::from_secs(5))
            .expect("circular singletons must not block");
        assert!(matches!(
            result,
            Err(ContainerError::CircularDependency { .. })
        ));
    }
}

#[test]
fn test_concurrent_extends_on_cached_instance_all_apply() {
    let container = Arc::new(container());
    container.instance_of("counter", 0i64).unwrap();

    let barrier = Arc::new(Barrier::new(4));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let container = container.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                container
                    .extend_with("counter", |value, _| {
                        let current = *value.downcast::<i64>().unwrap();
                        thread::sleep(Duration::from_millis(50));
                        Ok(Arc::new(current + 1) as Value)
                    })
                    .unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(*container.make("counter").unwrap().downcast::<i64>().unwrap(), 4);
}

//! 进程级默认容器集成测试
//!
//! 默认容器是进程级状态，全部断言放在同一个测试函数中避免并发干扰。

use container_abstractions::{RegistryExt, Resolver};
use container_impl::{get_container, set_container, Container};
use std::sync::Arc;

#[test]
fn test_global_container_lifecycle() {
    let container = Arc::new(Container::new());
    set_container(Some(container.clone()));
    assert!(Arc::ptr_eq(&container, &get_container()));

    get_container().instance_of("answer", 42i64).unwrap();
    assert_eq!(*container.make("answer").unwrap().downcast::<i64>().unwrap(), 42);

    let previous = set_container(None);
    assert!(previous.is_some_and(|previous| Arc::ptr_eq(&previous, &container)));

    let created = get_container();
    assert!(!Arc::ptr_eq(&created, &container));
    assert!(Arc::ptr_eq(&created, &get_container()));

    let replaced = set_container(None).unwrap();
    assert!(Arc::ptr_eq(&replaced, &created));
}

//! 类目：构造函数内省的默认实现

use container_abstractions::{class_name, ClassDescriptor, ClassIntrospector, Injectable};
use dashmap::DashMap;
use tracing::debug;

/// 类目
///
/// 保存类名到类描述符的映射。类目是元数据而不是容器注册表，`flush` 不会清空它。
#[derive(Debug, Default)]
pub struct ClassCatalog {
    classes: DashMap<String, ClassDescriptor>,
}

impl ClassCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记可自动装配的 Rust 类型
    pub fn register<T: Injectable>(&self) -> &Self {
        self.register_descriptor(T::descriptor())
    }

    /// 登记接口或抽象类型（Rust 中通常是 trait 对象）
    pub fn register_interface<T: ?Sized + 'static>(&self) -> &Self {
        self.register_abstract(class_name::<T>())
    }

    /// 按名称登记抽象类型
    pub fn register_abstract(&self, name: impl Into<String>) -> &Self {
        self.register_descriptor(ClassDescriptor::abstract_type(name))
    }

    /// 登记手写的类描述符
    pub fn register_descriptor(&self, descriptor: ClassDescriptor) -> &Self {
        debug!(
            "登记类: {} ({} 个参数)",
            descriptor.name,
            descriptor.parameters.len()
        );
        self.classes.insert(descriptor.name.clone(), descriptor);
        self
    }

    pub fn contains(&self, class: &str) -> bool {
        self.classes.contains_key(class)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl ClassIntrospector for ClassCatalog {
    fn describe(&self, class: &str) -> Option<ClassDescriptor> {
        self.classes.get(class).map(|entry| entry.value().clone())
    }
}

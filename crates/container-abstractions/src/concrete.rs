//! 构造方案
//!
//! 描述别名如何被构造：按类名自动装配，或调用工厂闭包

use crate::container::ServiceContainer;
use crate::introspection::class_name;
use container_common::{ContainerResult, Overrides, Value};
use std::sync::Arc;

/// 工厂函数类型
///
/// 接收容器与本次解析的参数覆盖，返回构造出的值。
pub type Factory =
    Arc<dyn Fn(&dyn ServiceContainer, &Overrides) -> ContainerResult<Value> + Send + Sync>;

/// 扩展函数类型
///
/// 接收上一步的实例，返回（可能被替换的）实例。
pub type Extender =
    Arc<dyn Fn(Value, &dyn ServiceContainer) -> ContainerResult<Value> + Send + Sync>;

/// 构造方案
#[derive(Clone)]
pub enum Concrete {
    /// 按类名构造，依赖通过构造函数内省自动装配
    Class(String),
    /// 调用工厂闭包
    Factory(Factory),
}

impl Concrete {
    /// 按类名构造
    pub fn class(name: impl Into<String>) -> Self {
        Self::Class(name.into())
    }

    /// 按 Rust 类型名构造
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::Class(class_name::<T>().to_string())
    }

    /// 使用工厂闭包
    pub fn factory<F>(factory: F) -> Self
    where
        F: Fn(&dyn ServiceContainer, &Overrides) -> ContainerResult<Value> + Send + Sync + 'static,
    {
        Self::Factory(Arc::new(factory))
    }

    /// 类名（工厂没有类名）
    pub fn class_name(&self) -> Option<&str> {
        match self {
            Self::Class(name) => Some(name),
            Self::Factory(_) => None,
        }
    }
}

impl std::fmt::Debug for Concrete {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Class(name) => f.debug_tuple("Class").field(name).finish(),
            Self::Factory(_) => f.debug_tuple("Factory").field(&"<function>").finish(),
        }
    }
}

impl From<&str> for Concrete {
    fn from(name: &str) -> Self {
        Self::class(name)
    }
}

impl From<String> for Concrete {
    fn from(name: String) -> Self {
        Self::Class(name)
    }
}

impl From<Factory> for Concrete {
    fn from(factory: Factory) -> Self {
        Self::Factory(factory)
    }
}

//! 上下文绑定构建器

use crate::concrete::Concrete;
use crate::container::{ServiceContainer, ServiceRegistry};
use container_common::{ContainerError, ContainerResult, Overrides, Value};

/// 上下文绑定构建器：已确定消费者
pub struct ContextualBindingBuilder<'a, R: ?Sized> {
    registry: &'a R,
    consumers: Vec<String>,
}

impl<'a, R: ServiceRegistry + ?Sized> ContextualBindingBuilder<'a, R> {
    pub fn new(registry: &'a R, consumers: Vec<String>) -> Self {
        Self {
            registry,
            consumers,
        }
    }

    /// 指定需要被替换的依赖
    pub fn needs(self, dependency: impl Into<String>) -> ContextualNeeds<'a, R> {
        ContextualNeeds {
            registry: self.registry,
            consumers: self.consumers,
            dependency: dependency.into(),
        }
    }
}

/// 上下文绑定构建器：已确定消费者和依赖
pub struct ContextualNeeds<'a, R: ?Sized> {
    registry: &'a R,
    consumers: Vec<String>,
    dependency: String,
}

impl<R: ServiceRegistry + ?Sized> ContextualNeeds<'_, R> {
    /// 指定实现并完成注册，每个消费者各写入一条记录
    pub fn give(self, implementation: impl Into<Concrete>) -> ContainerResult<()> {
        if self.consumers.is_empty() {
            return Err(ContainerError::configuration("上下文绑定必须至少指定一个消费者"));
        }
        if self.consumers.iter().any(String::is_empty) {
            return Err(ContainerError::configuration("上下文绑定的消费者不能为空"));
        }
        if self.dependency.is_empty() {
            return Err(ContainerError::configuration("上下文绑定必须指定依赖"));
        }

        let implementation = implementation.into();
        for consumer in &self.consumers {
            self.registry.add_contextual_binding(
                consumer,
                &self.dependency,
                implementation.clone(),
            )?;
        }
        Ok(())
    }

    /// 以工厂闭包作为实现
    pub fn give_factory<F>(self, factory: F) -> ContainerResult<()>
    where
        F: Fn(&dyn ServiceContainer, &Overrides) -> ContainerResult<Value> + Send + Sync + 'static,
    {
        self.give(Concrete::factory(factory))
    }
}

//! 服务容器抽象接口
//!
//! 注册与解析分为两个 trait，外部协作者通常只依赖 [`ServiceLocator`]。

use crate::concrete::{Concrete, Extender};
use crate::contextual::ContextualBindingBuilder;
use container_common::{ContainerError, ContainerResult, Overrides, Value};
use std::any::Any;
use std::sync::Arc;

/// 最小查找接口
///
/// 路由、中间件、日志等协作者只需要按名称查找服务。
pub trait ServiceLocator: Send + Sync {
    /// 是否存在绑定、实例、别名或能够提供该服务的提供者
    fn has(&self, id: &str) -> bool;

    /// 获取服务，没有任何注册时返回 [`ContainerError::MissingService`]
    fn get(&self, id: &str) -> ContainerResult<Value>;
}

/// 解析接口
pub trait Resolver: ServiceLocator {
    /// 使用参数覆盖解析别名
    fn make_with(&self, alias: &str, overrides: &Overrides) -> ContainerResult<Value>;

    /// 解析别名
    fn make(&self, alias: &str) -> ContainerResult<Value> {
        self.make_with(alias, &Overrides::new())
    }

    /// 标签是否存在
    fn tagged(&self, tag: &str) -> bool;

    /// 标签下的别名（打标签的顺序）
    fn tagged_aliases(&self, tag: &str) -> Vec<String>;

    /// 按打标签的顺序解析标签下的全部别名，未知标签返回空列表
    fn make_tagged(&self, tag: &str) -> ContainerResult<Vec<Value>>;
}

/// 注册接口
pub trait ServiceRegistry: Send + Sync {
    /// 注册或覆盖绑定，`concrete` 为空时按别名本身作为类名构造
    fn bind_shared(&self, alias: &str, concrete: Option<Concrete>, shared: bool)
        -> ContainerResult<()>;

    /// 直接放入实例缓存
    fn instance(&self, alias: &str, value: Value) -> ContainerResult<()>;

    /// 将 `names` 注册为 `binding` 的别名
    fn alias(&self, binding: &str, names: &[&str]) -> ContainerResult<()>;

    /// 是否为已注册的别名
    fn is_alias(&self, name: &str) -> bool;

    /// 直接指向 `binding` 的全部别名（注册顺序）
    fn aliases(&self, binding: &str) -> Vec<String>;

    /// 为别名打标签，重复的 (标签, 别名) 对被忽略
    fn tag(&self, aliases: &[&str], tags: &[&str]);

    /// 注册扩展函数
    fn extend(&self, alias: &str, extender: Extender) -> ContainerResult<()>;

    /// 添加一条上下文绑定
    fn add_contextual_binding(
        &self,
        consumer: &str,
        dependency: &str,
        implementation: Concrete,
    ) -> ContainerResult<()>;
}

/// 完整容器接口
pub trait ServiceContainer: ServiceRegistry + Resolver {
    /// 清空所有注册表
    fn flush(&self);
}

/// 类型化解析扩展
pub trait ResolverExt: Resolver {
    /// 解析并向下转型
    fn make_as<T: Any + Send + Sync>(&self, alias: &str) -> ContainerResult<Arc<T>> {
        self.make_as_with(alias, &Overrides::new())
    }

    /// 使用参数覆盖解析并向下转型
    fn make_as_with<T: Any + Send + Sync>(
        &self,
        alias: &str,
        overrides: &Overrides,
    ) -> ContainerResult<Arc<T>> {
        self.make_with(alias, overrides)?
            .downcast::<T>()
            .map_err(|_| ContainerError::type_mismatch(alias, std::any::type_name::<T>()))
    }
}

impl<R: Resolver + ?Sized> ResolverExt for R {}

/// 注册语法糖
pub trait RegistryExt: ServiceRegistry {
    /// 注册瞬时绑定
    fn bind(&self, alias: &str, concrete: Option<Concrete>) -> ContainerResult<()> {
        self.bind_shared(alias, concrete, false)
    }

    /// 注册共享绑定
    fn singleton(&self, alias: &str, concrete: Option<Concrete>) -> ContainerResult<()> {
        self.bind_shared(alias, concrete, true)
    }

    /// 注册瞬时工厂
    fn bind_factory<F>(&self, alias: &str, factory: F) -> ContainerResult<()>
    where
        F: Fn(&dyn ServiceContainer, &Overrides) -> ContainerResult<Value> + Send + Sync + 'static,
    {
        self.bind_shared(alias, Some(Concrete::factory(factory)), false)
    }

    /// 注册共享工厂
    fn singleton_factory<F>(&self, alias: &str, factory: F) -> ContainerResult<()>
    where
        F: Fn(&dyn ServiceContainer, &Overrides) -> ContainerResult<Value> + Send + Sync + 'static,
    {
        self.bind_shared(alias, Some(Concrete::factory(factory)), true)
    }

    /// 放入一个具体类型的实例
    fn instance_of<T: Any + Send + Sync>(&self, alias: &str, inner: T) -> ContainerResult<()> {
        self.instance(alias, Arc::new(inner))
    }

    /// 以闭包注册扩展函数
    fn extend_with<F>(&self, alias: &str, extender: F) -> ContainerResult<()>
    where
        F: Fn(Value, &dyn ServiceContainer) -> ContainerResult<Value> + Send + Sync + 'static,
    {
        self.extend(alias, Arc::new(extender))
    }

    /// 开始一条上下文绑定：`when(消费者).needs(依赖).give(实现)`
    fn when<I, S>(&self, consumers: I) -> ContextualBindingBuilder<'_, Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ContextualBindingBuilder::new(self, consumers.into_iter().map(Into::into).collect())
    }
}

impl<R: ServiceRegistry + ?Sized> RegistryExt for R {}

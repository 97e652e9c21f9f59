//! 服务提供者抽象接口

use crate::container::ServiceContainer;
use async_trait::async_trait;
use container_common::ContainerResult;

/// 服务提供者 trait
///
/// 提供者在 `register` 中向容器写入绑定，在 `boot` 中使用其他已注册的服务。
#[async_trait]
pub trait ServiceProvider: Send + Sync {
    /// 提供者名称
    fn name(&self) -> &str;

    /// 是否提供指定别名
    fn provides(&self, alias: &str) -> bool;

    /// 注册绑定
    fn register(&self, container: &dyn ServiceContainer) -> ContainerResult<()>;

    /// 启动提供者
    async fn boot(&self, _container: &dyn ServiceContainer) -> ContainerResult<()> {
        Ok(())
    }
}

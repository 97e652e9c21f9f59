//! 服务提供者聚合

use container_abstractions::{ServiceContainer, ServiceProvider};
use container_common::{ContainerError, ContainerResult};
use parking_lot::{Mutex, RwLock};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// 提供者的身份（`Arc` 数据指针）
fn identity(provider: &Arc<dyn ServiceProvider>) -> usize {
    Arc::as_ptr(provider) as *const () as usize
}

/// 服务提供者聚合
///
/// 每个提供者最多注册一次、启动一次。调用提供者时不持有任何内部锁，
/// 提供者可以在 `register` / `boot` 中自由调用容器。
#[derive(Default)]
pub struct ProviderAggregate {
    providers: RwLock<Vec<Arc<dyn ServiceProvider>>>,
    registered: Mutex<HashSet<usize>>,
    booted: Mutex<HashSet<usize>>,
}

impl ProviderAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加提供者，同一个 `Arc` 重复添加被忽略
    pub fn add(&self, provider: Arc<dyn ServiceProvider>) -> bool {
        let mut providers = self.providers.write();
        let id = identity(&provider);
        if providers.iter().any(|existing| identity(existing) == id) {
            debug!("服务提供者已存在: {}", provider.name());
            return false;
        }

        info!("添加服务提供者: {}", provider.name());
        providers.push(provider);
        true
    }

    /// 是否有提供者提供该别名
    pub fn provides(&self, alias: &str) -> bool {
        self.providers
            .read()
            .iter()
            .any(|provider| provider.provides(alias))
    }

    /// 是否有尚未注册的提供者提供该别名
    pub fn has_pending(&self, alias: &str) -> bool {
        let registered = self.registered.lock();
        self.providers
            .read()
            .iter()
            .any(|provider| provider.provides(alias) && !registered.contains(&identity(provider)))
    }

    /// 注册所有提供该别名的提供者
    ///
    /// 没有任何提供者提供该别名时返回 [`ContainerError::MissingService`]。
    pub fn register(&self, alias: &str, container: &dyn ServiceContainer) -> ContainerResult<()> {
        let matching: Vec<_> = self
            .snapshot()
            .into_iter()
            .filter(|provider| provider.provides(alias))
            .collect();

        if matching.is_empty() {
            return Err(ContainerError::missing_service(alias));
        }

        for provider in &matching {
            self.register_provider(provider, container)?;
        }
        Ok(())
    }

    /// 注册全部提供者
    pub fn register_all(&self, container: &dyn ServiceContainer) -> ContainerResult<()> {
        for provider in &self.snapshot() {
            self.register_provider(provider, container)?;
        }
        Ok(())
    }

    /// 注册（如有必要）并启动全部提供者，每个提供者只启动一次
    pub async fn boot(&self, container: &dyn ServiceContainer) -> ContainerResult<()> {
        self.register_all(container)?;

        for provider in self.snapshot() {
            let id = identity(&provider);
            if !self.booted.lock().insert(id) {
                continue;
            }

            info!("启动服务提供者: {}", provider.name());
            if let Err(error) = provider.boot(container).await {
                self.booted.lock().remove(&id);
                return Err(error);
            }
        }
        Ok(())
    }

    pub fn is_registered(&self, provider: &Arc<dyn ServiceProvider>) -> bool {
        self.registered.lock().contains(&identity(provider))
    }

    pub fn is_booted(&self, provider: &Arc<dyn ServiceProvider>) -> bool {
        self.booted.lock().contains(&identity(provider))
    }

    pub fn flush(&self) {
        self.providers.write().clear();
        self.registered.lock().clear();
        self.booted.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.providers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.read().is_empty()
    }

    fn snapshot(&self) -> Vec<Arc<dyn ServiceProvider>> {
        self.providers.read().clone()
    }

    fn register_provider(
        &self,
        provider: &Arc<dyn ServiceProvider>,
        container: &dyn ServiceContainer,
    ) -> ContainerResult<()> {
        let id = identity(provider);
        if !self.registered.lock().insert(id) {
            return Ok(());
        }

        info!("注册服务提供者: {}", provider.name());
        let result = provider.register(container);
        if result.is_err() {
            self.registered.lock().remove(&id);
        }
        result
    }
}

impl std::fmt::Debug for ProviderAggregate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<String> = self
            .providers
            .read()
            .iter()
            .map(|provider| provider.name().to_string())
            .collect();
        f.debug_struct("ProviderAggregate")
            .field("providers", &names)
            .field("registered", &self.registered.lock().len())
            .field("booted", &self.booted.lock().len())
            .finish()
    }
}

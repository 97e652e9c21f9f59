//! 服务容器
//!
//! 所有注册表由一把容器级读写锁保护。锁只在读写注册表时持有，
//! 调用工厂、构造函数、扩展函数和服务提供者时一律释放。

use crate::aliases::AliasTable;
use crate::bindings::BindingRegistry;
use crate::catalog::ClassCatalog;
use crate::contextual::ContextualBindingTable;
use crate::extenders::ExtenderRegistry;
use crate::instances::InstanceCache;
use crate::providers::ProviderAggregate;
use crate::tags::TagIndex;
use container_abstractions::{
    Concrete, Extender, Injectable, Resolver, ServiceContainer, ServiceLocator, ServiceProvider,
    ServiceRegistry,
};
use container_common::{ContainerConfig, ContainerError, ContainerResult, Overrides, Value};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info};

/// 容器内部的全部注册表
#[derive(Debug, Default)]
pub(crate) struct ContainerState {
    pub(crate) aliases: AliasTable,
    pub(crate) bindings: BindingRegistry,
    pub(crate) instances: InstanceCache,
    pub(crate) tags: TagIndex,
    pub(crate) extenders: ExtenderRegistry,
    pub(crate) contextual: ContextualBindingTable,
}

/// 服务容器
#[derive(Debug)]
pub struct Container {
    pub(crate) state: RwLock<ContainerState>,
    pub(crate) catalog: Arc<ClassCatalog>,
    pub(crate) providers: ProviderAggregate,
    pub(crate) config: ContainerConfig,
}

impl Container {
    /// 使用默认配置创建容器
    pub fn new() -> Self {
        Self::with_config(ContainerConfig::default())
    }

    /// 使用指定配置创建容器
    pub fn with_config(config: ContainerConfig) -> Self {
        debug!(
            "创建容器: max_resolution_depth={}, warn_on_ignored_overrides={}",
            config.max_resolution_depth, config.warn_on_ignored_overrides
        );
        Self {
            state: RwLock::new(ContainerState::default()),
            catalog: Arc::new(ClassCatalog::new()),
            providers: ProviderAggregate::new(),
            config,
        }
    }

    /// 与其他容器共享类目
    pub fn with_catalog(mut self, catalog: Arc<ClassCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn catalog(&self) -> &ClassCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// 向类目登记可自动装配的类型
    pub fn register_class<T: Injectable>(&self) -> &Self {
        self.catalog.register::<T>();
        self
    }

    /// 添加服务提供者
    pub fn add_provider(&self, provider: Arc<dyn ServiceProvider>) -> &Self {
        self.providers.add(provider);
        self
    }

    pub fn providers(&self) -> &ProviderAggregate {
        &self.providers
    }

    /// 立即注册提供该别名的服务提供者
    pub fn register_provider(&self, alias: &str) -> ContainerResult<()> {
        self.providers.register(alias, self)
    }

    /// 注册并启动全部服务提供者
    pub async fn boot(&self) -> ContainerResult<()> {
        self.providers.boot(self).await
    }

    /// 沿别名链找到规范别名
    pub fn canonicalize(&self, name: &str) -> ContainerResult<String> {
        self.state.read().aliases.canonicalize(name)
    }

    /// 名称是否全部为已注册的别名
    pub fn aliased(&self, names: &[&str]) -> bool {
        let state = self.state.read();
        names.iter().all(|name| state.aliases.is_alias(name))
    }

    /// 是否存在绑定或已缓存实例（不含别名、标签和提供者）
    pub fn bound(&self, alias: &str) -> bool {
        let state = self.state.read();
        state.bindings.contains(alias) || state.instances.contains(alias)
    }

    /// 别名是否会被共享
    pub fn is_shared(&self, alias: &str) -> ContainerResult<bool> {
        let state = self.state.read();
        let canonical = state.aliases.canonicalize(alias)?;
        Ok(state.bindings.is_shared(&canonical, &state.instances))
    }

    /// 解析链使用的容器身份
    pub(crate) fn id(&self) -> usize {
        self as *const Self as usize
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_name(kind: &str, name: &str) -> ContainerResult<()> {
    if name.is_empty() {
        return Err(ContainerError::configuration(format!("{kind}不能为空")));
    }
    Ok(())
}

impl ServiceRegistry for Container {
    fn bind_shared(
        &self,
        alias: &str,
        concrete: Option<Concrete>,
        shared: bool,
    ) -> ContainerResult<()> {
        ensure_name("绑定别名", alias)?;
        debug!("注册绑定: {} -> {:?} (shared={})", alias, concrete, shared);

        let mut state = self.state.write();
        if let Some(target) = state.aliases.unlink(alias) {
            debug!("[{}] 不再是 [{}] 的别名", alias, target);
        }
        if state.instances.invalidate(alias) {
            info!("重新绑定 [{}]，丢弃已缓存的实例", alias);
        }
        state.bindings.register(alias, concrete, shared);
        Ok(())
    }

    fn instance(&self, alias: &str, value: Value) -> ContainerResult<()> {
        ensure_name("实例别名", alias)?;
        debug!("注册实例: {}", alias);

        let mut state = self.state.write();
        if let Some(target) = state.aliases.unlink(alias) {
            debug!("[{}] 不再是 [{}] 的别名", alias, target);
        }
        state.instances.insert(alias, value);
        Ok(())
    }

    fn alias(&self, binding: &str, names: &[&str]) -> ContainerResult<()> {
        let mut state = self.state.write();
        state.aliases.alias(binding, names)?;
        for name in names {
            if state.instances.invalidate(name) {
                info!("[{}] 成为 [{}] 的别名，丢弃其已缓存的实例", name, binding);
            }
        }
        debug!("注册别名: {:?} -> {}", names, binding);
        Ok(())
    }

    fn is_alias(&self, name: &str) -> bool {
        self.state.read().aliases.is_alias(name)
    }

    fn aliases(&self, binding: &str) -> Vec<String> {
        self.state.read().aliases.aliases_of(binding)
    }

    fn tag(&self, aliases: &[&str], tags: &[&str]) {
        debug!("打标签: {:?} -> {:?}", aliases, tags);
        self.state.write().tags.tag(aliases, tags);
    }

    fn extend(&self, alias: &str, extender: Extender) -> ContainerResult<()> {
        ensure_name("扩展别名", alias)?;

        let (canonical, mut existing) = {
            let mut state = self.state.write();
            let canonical = state.aliases.canonicalize(alias)?;
            let cached = state.instances.get(&canonical);
            match cached {
                Some(existing) => (canonical, existing),
                None => {
                    debug!("注册扩展函数: {}", canonical);
                    state.extenders.push(&canonical, extender);
                    return Ok(());
                }
            }
        };

        // 扩展函数执行期间缓存被其他线程改写时，基于新值重新执行
        loop {
            debug!("[{}] 已有共享实例，立即执行扩展函数", canonical);
            let extended = extender(Arc::clone(&existing), self)?;

            let mut state = self.state.write();
            let current = state.instances.get(&canonical);
            match current {
                Some(current) if Arc::ptr_eq(&current, &existing) => {
                    state.instances.replace(&canonical, extended);
                    return Ok(());
                }
                Some(current) => existing = current,
                None => {
                    debug!("[{}] 的共享实例已失效，扩展函数改为延迟执行", canonical);
                    state.extenders.push(&canonical, extender);
                    return Ok(());
                }
            }
        }
    }

    fn add_contextual_binding(
        &self,
        consumer: &str,
        dependency: &str,
        implementation: Concrete,
    ) -> ContainerResult<()> {
        ensure_name("上下文绑定的消费者", consumer)?;
        ensure_name("上下文绑定的依赖", dependency)?;

        let mut state = self.state.write();
        let consumer = state.aliases.canonicalize(consumer)?;
        let dependency = state.aliases.canonicalize(dependency)?;
        debug!(
            "注册上下文绑定: 构造 [{}] 时 [{}] -> {:?}",
            consumer, dependency, implementation
        );
        state.contextual.add(&consumer, &dependency, implementation);
        Ok(())
    }
}

impl ServiceLocator for Container {
    fn has(&self, id: &str) -> bool {
        let local = {
            let state = self.state.read();
            state.bindings.contains(id)
                || state.instances.contains(id)
                || state.aliases.is_alias(id)
                || state.tags.is_tagged(id)
        };
        local || self.providers.provides(id)
    }

    fn get(&self, id: &str) -> ContainerResult<Value> {
        self.make(id).map_err(|error| match error {
            ContainerError::Resolution { .. } if !self.has(id) => {
                ContainerError::missing_service(id)
            }
            other => other,
        })
    }
}

impl Resolver for Container {
    fn make_with(&self, alias: &str, overrides: &Overrides) -> ContainerResult<Value> {
        self.resolve(alias, overrides)
    }

    fn tagged(&self, tag: &str) -> bool {
        self.state.read().tags.is_tagged(tag)
    }

    fn tagged_aliases(&self, tag: &str) -> Vec<String> {
        self.state.read().tags.aliases(tag)
    }

    fn make_tagged(&self, tag: &str) -> ContainerResult<Vec<Value>> {
        self.tagged_aliases(tag)
            .iter()
            .map(|alias| self.resolve(alias, &Overrides::new()))
            .collect()
    }
}

impl ServiceContainer for Container {
    fn flush(&self) {
        *self.state.write() = ContainerState::default();
        self.providers.flush();
        info!("容器已清空");
    }
}

//! 绑定注册表

use crate::instances::InstanceCache;
use container_abstractions::Concrete;
use std::collections::HashMap;

/// 单条绑定
#[derive(Debug, Clone)]
pub struct Binding {
    /// 构造方案，为空表示按别名本身作为类名构造
    pub concrete: Option<Concrete>,
    /// 是否共享（单例）
    pub shared: bool,
}

/// 绑定注册表
///
/// 键由调用方决定，注册表本身不做别名规范化。
#[derive(Debug, Default)]
pub struct BindingRegistry {
    bindings: HashMap<String, Binding>,
}

impl BindingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册或覆盖绑定，返回被替换的旧绑定
    pub fn register(
        &mut self,
        alias: &str,
        concrete: Option<Concrete>,
        shared: bool,
    ) -> Option<Binding> {
        self.bindings
            .insert(alias.to_string(), Binding { concrete, shared })
    }

    pub fn binding(&self, alias: &str) -> Option<&Binding> {
        self.bindings.get(alias)
    }

    /// 构造方案，没有显式绑定时回退为按别名自动装配
    pub fn concrete_for(&self, alias: &str) -> Concrete {
        self.bindings
            .get(alias)
            .and_then(|binding| binding.concrete.clone())
            .unwrap_or_else(|| Concrete::class(alias))
    }

    /// 已缓存实例或共享绑定
    pub fn is_shared(&self, alias: &str, instances: &InstanceCache) -> bool {
        instances.contains(alias) || self.bindings.get(alias).is_some_and(|binding| binding.shared)
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.bindings.contains_key(alias)
    }

    pub fn clear(&mut self) {
        self.bindings.clear();
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

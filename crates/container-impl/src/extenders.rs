//! 扩展函数注册表

use container_abstractions::{Extender, ServiceContainer};
use container_common::{ContainerResult, Value};
use std::collections::HashMap;

/// 扩展函数注册表：规范别名 -> 有序扩展链
#[derive(Default)]
pub struct ExtenderRegistry {
    extenders: HashMap<String, Vec<Extender>>,
}

impl ExtenderRegistry {
    pub fn push(&mut self, alias: &str, extender: Extender) {
        self.extenders
            .entry(alias.to_string())
            .or_default()
            .push(extender);
    }

    /// 扩展链的副本，调用方在释放锁之后执行
    pub fn chain(&self, alias: &str) -> Vec<Extender> {
        self.extenders.get(alias).cloned().unwrap_or_default()
    }

    pub fn count(&self, alias: &str) -> usize {
        self.extenders.get(alias).map_or(0, Vec::len)
    }

    pub fn clear(&mut self) {
        self.extenders.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.extenders.is_empty()
    }
}

impl std::fmt::Debug for ExtenderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: HashMap<&str, usize> = self
            .extenders
            .iter()
            .map(|(alias, chain)| (alias.as_str(), chain.len()))
            .collect();
        f.debug_struct("ExtenderRegistry")
            .field("extenders", &counts)
            .finish()
    }
}

/// 按注册顺序执行扩展链，每一步接收上一步的输出
pub fn apply_extenders(
    value: Value,
    chain: &[Extender],
    container: &dyn ServiceContainer,
) -> ContainerResult<Value> {
    chain
        .iter()
        .try_fold(value, |current, extender| extender(current, container))
}

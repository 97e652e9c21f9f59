//! 上下文绑定表

use container_abstractions::Concrete;
use std::collections::HashMap;

/// 上下文绑定表：消费者 -> 依赖 -> 实现
#[derive(Debug, Default)]
pub struct ContextualBindingTable {
    bindings: HashMap<String, HashMap<String, Concrete>>,
}

impl ContextualBindingTable {
    /// 添加或替换一条记录
    pub fn add(&mut self, consumer: &str, dependency: &str, implementation: Concrete) {
        self.bindings
            .entry(consumer.to_string())
            .or_default()
            .insert(dependency.to_string(), implementation);
    }

    /// 查找 `consumer` 构造期间 `dependency` 的替换实现
    pub fn find(&self, consumer: &str, dependency: &str) -> Option<Concrete> {
        self.bindings
            .get(consumer)
            .and_then(|dependencies| dependencies.get(dependency))
            .cloned()
    }

    pub fn has_consumer(&self, consumer: &str) -> bool {
        self.bindings.contains_key(consumer)
    }

    pub fn clear(&mut self) {
        self.bindings.clear();
    }

    pub fn len(&self) -> usize {
        self.bindings.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

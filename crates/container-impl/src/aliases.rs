//! 别名表

use container_common::{ContainerError, ContainerResult};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// 别名表
///
/// 每个名称最多指向一个目标，目标本身也可以是别名，形成别名链。
#[derive(Debug, Default)]
pub struct AliasTable {
    /// 别名 -> 目标
    targets: HashMap<String, String>,
    /// 目标 -> 直接指向它的别名（注册顺序）
    by_binding: HashMap<String, Vec<String>>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 将 `names` 注册为 `binding` 的别名
    ///
    /// 自别名或会形成环的注册整体失败，不做部分写入。
    pub fn alias(&mut self, binding: &str, names: &[&str]) -> ContainerResult<()> {
        if binding.is_empty() {
            return Err(ContainerError::configuration("别名目标不能为空"));
        }
        if names.iter().any(|name| name.is_empty()) {
            return Err(ContainerError::configuration("别名不能为空"));
        }
        if let Some(name) = names.iter().find(|name| **name == binding) {
            return Err(ContainerError::configuration(format!(
                "[{name}] 不能作为自身的别名"
            )));
        }

        let chain = self.chain(binding)?;
        if let Some(name) = names.iter().find(|name| chain.contains(**name)) {
            return Err(ContainerError::configuration(format!(
                "检测到别名环: [{name}] -> [{binding}] -> ... -> [{name}]"
            )));
        }

        for name in names {
            if let Some(previous) = self.unlink(name) {
                debug!("别名 [{}] 从 [{}] 改指向 [{}]", name, previous, binding);
            }
            self.targets.insert((*name).to_string(), binding.to_string());
            self.by_binding
                .entry(binding.to_string())
                .or_default()
                .push((*name).to_string());
        }

        Ok(())
    }

    /// 沿别名链找到最终名称
    pub fn canonicalize(&self, name: &str) -> ContainerResult<String> {
        let mut visited = HashSet::new();
        let mut current = name;

        while let Some(target) = self.targets.get(current) {
            if !visited.insert(current) {
                return Err(ContainerError::configuration(format!(
                    "检测到别名环: [{name}]"
                )));
            }
            current = target.as_str();
        }

        Ok(current.to_string())
    }

    /// 直接指向 `binding` 的别名
    pub fn aliases_of(&self, binding: &str) -> Vec<String> {
        self.by_binding.get(binding).cloned().unwrap_or_default()
    }

    pub fn is_alias(&self, name: &str) -> bool {
        self.targets.contains_key(name)
    }

    /// 移除别名映射，返回原目标
    pub fn unlink(&mut self, name: &str) -> Option<String> {
        let previous = self.targets.remove(name)?;
        if let Some(names) = self.by_binding.get_mut(&previous) {
            names.retain(|existing| existing != name);
            if names.is_empty() {
                self.by_binding.remove(&previous);
            }
        }
        Some(previous)
    }

    pub fn clear(&mut self) {
        self.targets.clear();
        self.by_binding.clear();
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// 从 `name` 出发经过的全部名称（含终点）
    fn chain(&self, name: &str) -> ContainerResult<HashSet<String>> {
        let mut visited = HashSet::new();
        let mut current = name.to_string();
        visited.insert(current.clone());

        while let Some(target) = self.targets.get(&current) {
            if !visited.insert(target.clone()) {
                return Err(ContainerError::configuration(format!(
                    "检测到别名环: [{name}]"
                )));
            }
            current = target.clone();
        }

        Ok(visited)
    }
}

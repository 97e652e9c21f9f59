//! 标签索引

use std::collections::HashMap;

/// 标签索引：标签 -> 有序别名集合
#[derive(Debug, Default)]
pub struct TagIndex {
    tags: HashMap<String, Vec<String>>,
}

impl TagIndex {
    /// 为每个 (标签, 别名) 对建立关联，已存在的对被忽略
    pub fn tag(&mut self, aliases: &[&str], tags: &[&str]) {
        for tag in tags {
            let members = self.tags.entry((*tag).to_string()).or_default();
            for alias in aliases {
                if !members.iter().any(|existing| existing == alias) {
                    members.push((*alias).to_string());
                }
            }
        }
    }

    /// 标签是否存在且至少有一个成员
    pub fn is_tagged(&self, tag: &str) -> bool {
        self.tags.get(tag).is_some_and(|members| !members.is_empty())
    }

    /// 标签下的别名（打标签的顺序）
    pub fn aliases(&self, tag: &str) -> Vec<String> {
        self.tags.get(tag).cloned().unwrap_or_default()
    }

    pub fn clear(&mut self) {
        self.tags.clear();
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

//! 容器值与参数覆盖

use crate::errors::{ContainerError, ContainerResult};
use std::any::Any;
use std::sync::Arc;

/// 容器中流转的值
///
/// 解析结果、预置实例以及参数覆盖都以共享指针形式传递，单例的身份即指针身份。
pub type Value = Arc<dyn Any + Send + Sync>;

/// 把任意值包装为 [`Value`]
pub fn value<T: Any + Send + Sync>(inner: T) -> Value {
    Arc::new(inner)
}

/// 单次解析的参数覆盖
///
/// 按参数名匹配构造函数参数，保持插入顺序；同名参数后写覆盖先写。
/// 覆盖只作用于声明它的那一次 `make`，不会传递给间接依赖。
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    entries: Vec<(String, Value)>,
}

impl Overrides {
    /// 创建空的覆盖表
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加覆盖值（构建器风格）
    pub fn with<T: Any + Send + Sync>(mut self, name: impl Into<String>, inner: T) -> Self {
        self.insert(name, Arc::new(inner));
        self
    }

    /// 插入已经包装好的值
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// 按名称获取覆盖值
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    /// 按名称获取并向下转型
    pub fn get_as<T: Any + Send + Sync>(&self, name: &str) -> Option<Arc<T>> {
        self.get(name)
            .and_then(|value| Arc::clone(value).downcast::<T>().ok())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 参数名列表（插入顺序）
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// 从 JSON 对象构建覆盖表
    ///
    /// 整数映射为 `i64`，其余数字为 `f64`，布尔为 `bool`，字符串为 `String`；
    /// 数组和对象保留为 `serde_json::Value`，`null` 会被跳过。
    pub fn from_json(json: serde_json::Value) -> ContainerResult<Self> {
        let serde_json::Value::Object(map) = json else {
            return Err(ContainerError::configuration("参数覆盖必须是 JSON 对象"));
        };

        let mut overrides = Self::new();
        for (name, entry) in map {
            let converted: Value = match entry {
                serde_json::Value::Null => continue,
                serde_json::Value::Bool(flag) => Arc::new(flag),
                serde_json::Value::Number(number) => match number.as_i64() {
                    Some(integer) => Arc::new(integer),
                    None => Arc::new(number.as_f64().unwrap_or_default()),
                },
                serde_json::Value::String(text) => Arc::new(text),
                other => Arc::new(other),
            };
            overrides.insert(name, converted);
        }

        Ok(overrides)
    }
}

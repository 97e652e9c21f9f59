//! 共享实例缓存

use container_common::Value;
use once_cell::sync::OnceCell;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::thread::{self, ThreadId};

/// 正在构造的共享实例
pub type InFlight = Arc<OnceCell<Value>>;

/// 认领结果
pub enum Claim {
    /// 实例已缓存
    Ready(Value),
    /// 需要（或等待别的线程）构造
    Pending(InFlight),
}

#[derive(Debug)]
struct Flight {
    cell: InFlight,
    builder: Option<ThreadId>,
}

/// 共享实例缓存
///
/// 除了已完成的实例，还为每个正在构造的共享别名保存一个 `OnceCell`，
/// 并发解析同一别名时只有一个线程执行构造，其余线程等待同一个结果。
///
/// 在途构造记录了执行构造的线程，等待中的线程记录了所等待的别名，
/// 二者组成等待图，用于在阻塞前发现跨线程的循环依赖。
#[derive(Debug, Default)]
pub struct InstanceCache {
    instances: HashMap<String, Value>,
    in_flight: HashMap<String, Flight>,
    waiting: HashMap<ThreadId, String>,
}

impl InstanceCache {
    pub fn get(&self, alias: &str) -> Option<Value> {
        self.instances.get(alias).cloned()
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.instances.contains_key(alias)
    }

    /// 写入实例并丢弃该别名的在途构造
    pub fn insert(&mut self, alias: &str, value: Value) {
        self.in_flight.remove(alias);
        self.instances.insert(alias.to_string(), value);
    }

    /// 替换已存在的实例，别名未缓存时不写入
    pub fn replace(&mut self, alias: &str, value: Value) -> bool {
        match self.instances.get_mut(alias) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// 使缓存失效，返回是否确有内容被移除
    pub fn invalidate(&mut self, alias: &str) -> bool {
        let dropped_flight = self.in_flight.remove(alias).is_some();
        let dropped_instance = self.instances.remove(alias).is_some();
        dropped_flight || dropped_instance
    }

    /// 取得已缓存实例，或认领该别名的在途构造
    pub fn claim(&mut self, alias: &str) -> Claim {
        if let Some(value) = self.instances.get(alias) {
            return Claim::Ready(Arc::clone(value));
        }

        let flight = self
            .in_flight
            .entry(alias.to_string())
            .or_insert_with(|| Flight {
                cell: Arc::new(OnceCell::new()),
                builder: None,
            });
        Claim::Pending(Arc::clone(&flight.cell))
    }

    /// 当前线程开始构造 `cell`
    pub fn begin(&mut self, alias: &str, cell: &InFlight) {
        let me = thread::current().id();
        self.waiting.remove(&me);
        if let Some(flight) = self.current_flight_mut(alias, cell) {
            flight.builder = Some(me);
        }
    }

    /// 构造失败，`cell` 保持未初始化，可由其他线程重新构造
    pub fn abandon(&mut self, alias: &str, cell: &InFlight) {
        if let Some(flight) = self.current_flight_mut(alias, cell) {
            flight.builder = None;
        }
    }

    /// 登记当前线程将等待 `cell`
    ///
    /// 沿等待图从 `alias` 的构造线程出发，若最终回到当前线程则说明
    /// 阻塞后永远不会被唤醒，此时不做登记并返回循环经过的别名。
    pub fn wait_for(&mut self, alias: &str, cell: &InFlight) -> Result<(), Vec<String>> {
        let me = thread::current().id();
        let mut path = vec![alias.to_string()];
        let mut visited = HashSet::new();
        let mut next = self
            .in_flight
            .get(alias)
            .filter(|flight| Arc::ptr_eq(&flight.cell, cell))
            .and_then(|flight| flight.builder);

        while let Some(builder) = next {
            if builder == me {
                return Err(path);
            }
            if !visited.insert(builder) {
                break;
            }
            let Some(awaited) = self.waiting.get(&builder) else {
                break;
            };
            path.push(awaited.clone());
            next = self.in_flight.get(awaited).and_then(|flight| flight.builder);
        }

        self.waiting.insert(me, alias.to_string());
        Ok(())
    }

    /// 当前线程结束等待
    pub fn stop_waiting(&mut self) {
        self.waiting.remove(&thread::current().id());
    }

    /// 构造完成后落盘
    ///
    /// 只有当 `cell` 仍是该别名当前的在途构造时才写入缓存；
    /// 构造期间发生的重新绑定或 flush 会使本次结果不被缓存。
    pub fn settle(&mut self, alias: &str, cell: &InFlight, value: Value) -> bool {
        let current = self.current_flight_mut(alias, cell).is_some();
        if current {
            self.in_flight.remove(alias);
            self.instances.insert(alias.to_string(), value);
        }
        current
    }

    pub fn clear(&mut self) {
        self.instances.clear();
        self.in_flight.clear();
        self.waiting.clear();
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    fn current_flight_mut(&mut self, alias: &str, cell: &InFlight) -> Option<&mut Flight> {
        self.in_flight
            .get_mut(alias)
            .filter(|flight| Arc::ptr_eq(&flight.cell, cell))
    }
}

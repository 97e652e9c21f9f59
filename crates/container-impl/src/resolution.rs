//! 解析链
//!
//! 每个线程维护一条正在解析的别名链，用于检测循环依赖和限制递归深度。
//! 链上的每一项同时记录所属容器，不同容器之间的嵌套解析互不干扰。

use container_common::{ContainerError, ContainerResult};
use std::cell::RefCell;

thread_local! {
    static RESOLUTION_CHAIN: RefCell<Vec<(usize, String)>> = const { RefCell::new(Vec::new()) };
}

/// 解析链守卫，离开作用域时弹出对应的别名
#[derive(Debug)]
pub struct ResolutionGuard {
    container: usize,
}

impl ResolutionGuard {
    /// 将别名压入解析链
    ///
    /// 同一容器中别名已在链上时返回 [`ContainerError::CircularDependency`]，
    /// 链长度达到 `max_depth` 时返回解析错误。
    pub fn enter(container: usize, alias: &str, max_depth: usize) -> ContainerResult<Self> {
        RESOLUTION_CHAIN.with(|chain| {
            let mut chain = chain.borrow_mut();
            let path: Vec<&str> = chain
                .iter()
                .filter(|(owner, _)| *owner == container)
                .map(|(_, existing)| existing.as_str())
                .collect();

            if path.contains(&alias) {
                let mut dependency_chain = path.join(" -> ");
                dependency_chain.push_str(" -> ");
                dependency_chain.push_str(alias);
                return Err(ContainerError::CircularDependency { dependency_chain });
            }

            if path.len() >= max_depth {
                return Err(ContainerError::resolution(
                    alias,
                    format!("超过最大解析深度 {max_depth}"),
                ));
            }

            chain.push((container, alias.to_string()));
            Ok(Self { container })
        })
    }
}

impl Drop for ResolutionGuard {
    fn drop(&mut self) {
        RESOLUTION_CHAIN.with(|chain| {
            let mut chain = chain.borrow_mut();
            if let Some(position) = chain
                .iter()
                .rposition(|(owner, _)| *owner == self.container)
            {
                chain.remove(position);
            }
        });
    }
}

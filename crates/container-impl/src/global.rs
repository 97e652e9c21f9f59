//! 进程级默认容器
//!
//! 供没有显式容器引用的调用方使用，解析引擎本身从不依赖它。

use crate::container::Container;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

static GLOBAL_CONTAINER: Lazy<RwLock<Option<Arc<Container>>>> = Lazy::new(|| RwLock::new(None));

/// 获取默认容器，首次访问时创建
pub fn get_container() -> Arc<Container> {
    if let Some(container) = GLOBAL_CONTAINER.read().as_ref() {
        return Arc::clone(container);
    }

    let mut slot = GLOBAL_CONTAINER.write();
    let container = slot.get_or_insert_with(|| {
        info!("创建默认容器");
        Arc::new(Container::new())
    });
    Arc::clone(container)
}

/// 替换默认容器，返回原来的容器
///
/// 传入 `None` 会清除默认容器，下次 [`get_container`] 时重新创建。
pub fn set_container(container: Option<Arc<Container>>) -> Option<Arc<Container>> {
    std::mem::replace(&mut *GLOBAL_CONTAINER.write(), container)
}

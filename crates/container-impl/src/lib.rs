//! # Container Impl
//!
//! 服务容器的具体实现：别名表、绑定注册表、实例缓存、标签索引、扩展函数、
//! 上下文绑定、解析引擎、服务提供者聚合以及进程级默认容器。

pub mod aliases;
pub mod bindings;
pub mod catalog;
pub mod container;
pub mod contextual;
pub mod extenders;
pub mod global;
pub mod instances;
pub mod providers;
pub mod resolution;
mod resolver;
pub mod tags;

pub use aliases::AliasTable;
pub use bindings::{Binding, BindingRegistry};
pub use catalog::ClassCatalog;
pub use container::Container;
pub use contextual::ContextualBindingTable;
pub use extenders::{apply_extenders, ExtenderRegistry};
pub use global::{get_container, set_container};
pub use instances::InstanceCache;
pub use providers::ProviderAggregate;
pub use tags::TagIndex;

//! # Container Abstractions
//!
//! 服务容器抽象层，定义注册、解析、构造函数内省以及服务提供者的核心接口。
//!
//! ## 核心接口
//!
//! - [`ServiceLocator`] - 最小查找接口（`has` / `get`）
//! - [`Resolver`] - 解析接口
//! - [`ServiceRegistry`] - 注册接口
//! - [`ServiceContainer`] - 完整容器接口
//! - [`ClassIntrospector`] - 构造函数内省能力
//! - [`ServiceProvider`] - 服务提供者

pub mod concrete;
pub mod container;
pub mod contextual;
pub mod introspection;
pub mod provider;

pub use concrete::*;
pub use container::*;
pub use contextual::*;
pub use introspection::*;
pub use provider::*;

pub use container_common::{ContainerError, ContainerResult, Overrides, Value};

//! # Container Common
//!
//! 服务容器各层共享的基础类型。
//!
//! ## 核心类型
//!
//! - [`ContainerError`] - 容器统一错误类型
//! - [`Value`] - 容器中流转的共享值
//! - [`Overrides`] - 单次解析的参数覆盖表
//! - [`ContainerConfig`] - 容器运行配置

pub mod config;
pub mod errors;
pub mod value;

pub use config::*;
pub use errors::*;
pub use value::*;

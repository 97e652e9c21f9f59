//! 容器配置

use crate::errors::ContainerResult;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 默认配置文件（不含扩展名）
pub const DEFAULT_CONFIG_PATH: &str = "config/container";

/// 环境变量前缀，例如 `CONTAINER_MAX_RESOLUTION_DEPTH=64`
pub const ENV_PREFIX: &str = "CONTAINER";

/// 容器配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// 最大解析深度
    pub max_resolution_depth: usize,
    /// 对已缓存单例传入参数覆盖时是否记录警告
    pub warn_on_ignored_overrides: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            max_resolution_depth: 100,
            warn_on_ignored_overrides: true,
        }
    }
}

impl ContainerConfig {
    /// 从默认位置加载配置
    pub fn load() -> ContainerResult<Self> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// 从指定文件加载配置，环境变量优先于文件
    ///
    /// 文件不存在时不报错，缺失的字段使用默认值。
    pub fn load_from(path: &str) -> ContainerResult<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let loaded: Self = settings.try_deserialize()?;
        debug!("加载容器配置: {:?}", loaded);
        Ok(loaded)
    }

    /// 设置最大解析深度
    pub fn with_max_resolution_depth(mut self, depth: usize) -> Self {
        self.max_resolution_depth = depth;
        self
    }

    /// 设置是否对被忽略的参数覆盖发出警告
    pub fn with_warn_on_ignored_overrides(mut self, enabled: bool) -> Self {
        self.warn_on_ignored_overrides = enabled;
        self
    }
}

//! 错误类型定义

use thiserror::Error;

/// 服务容器错误类型
///
/// 所有错误都直接返回给 `make` / 注册操作的调用方，容器内部不做重试或替换。
#[derive(Error, Debug)]
pub enum ContainerError {
    /// 注册阶段的配置错误（自别名、别名环、空别名等）
    #[error("容器配置无效: {message}")]
    Configuration { message: String },

    /// 类不存在或无法实例化
    #[error("无法解析 [{alias}]: {message}")]
    Resolution { alias: String, message: String },

    /// 构造参数无法满足
    #[error("无法解析类 [{class}] 的参数 ${parameter}: {message}")]
    ArgumentResolution {
        class: String,
        parameter: String,
        message: String,
    },

    /// 按名称查找时没有找到任何服务
    #[error("服务不存在: {alias}")]
    MissingService { alias: String },

    #[error("检测到循环依赖: {dependency_chain}")]
    CircularDependency { dependency_chain: String },

    #[error("类型不匹配: [{alias}] 不是 {expected}")]
    TypeMismatch { alias: String, expected: String },

    #[error("组件创建失败: {type_name}, 原因: {source}")]
    ComponentCreationFailed {
        type_name: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("容器配置加载失败: {source}")]
    ConfigLoad {
        #[from]
        source: config::ConfigError,
    },
}

impl ContainerError {
    /// 创建配置错误
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// 创建解析错误
    pub fn resolution(alias: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Resolution {
            alias: alias.into(),
            message: message.into(),
        }
    }

    /// 创建参数解析错误
    pub fn argument_resolution(
        class: impl Into<String>,
        parameter: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::ArgumentResolution {
            class: class.into(),
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// 创建服务缺失错误
    pub fn missing_service(alias: impl Into<String>) -> Self {
        Self::MissingService {
            alias: alias.into(),
        }
    }

    /// 创建类型不匹配错误
    pub fn type_mismatch(alias: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::TypeMismatch {
            alias: alias.into(),
            expected: expected.into(),
        }
    }

    /// 包装用户构造函数或工厂返回的错误
    pub fn creation_failed(
        type_name: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::ComponentCreationFailed {
            type_name: type_name.into(),
            source: source.into(),
        }
    }

    /// 是否由容器的注册或解析过程本身产生
    pub fn is_resolution_failure(&self) -> bool {
        matches!(
            self,
            Self::Configuration { .. }
                | Self::Resolution { .. }
                | Self::ArgumentResolution { .. }
                | Self::MissingService { .. }
                | Self::CircularDependency { .. }
                | Self::ComponentCreationFailed { .. }
        )
    }

    /// 是否为注册阶段的配置错误
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. } | Self::ConfigLoad { .. })
    }
}

/// 结果类型别名
pub type ContainerResult<T> = Result<T, ContainerError>;

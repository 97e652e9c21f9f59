//! 构造函数内省
//!
//! Rust 没有运行时反射，类通过 [`Injectable`] 或手写 [`ClassDescriptor`]
//! 向类目登记自己的参数列表和构造函数。

use container_common::{ContainerError, ContainerResult, Value};
use std::any::Any;
use std::sync::Arc;

/// Rust 类型对应的类名
pub fn class_name<T: ?Sized + 'static>() -> &'static str {
    std::any::type_name::<T>()
}

/// 构造函数参数描述
#[derive(Debug, Clone)]
pub struct Parameter {
    /// 参数名
    pub name: String,
    /// 声明的类/接口类型，基本类型为 `None`
    pub declared_type: Option<String>,
    /// 默认值
    pub default: Option<Value>,
}

impl Parameter {
    /// 声明为类/接口类型的参数
    pub fn class(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_type: Some(declared_type.into()),
            default: None,
        }
    }

    /// 声明为 Rust 类型的参数
    pub fn typed<T: ?Sized + 'static>(name: impl Into<String>) -> Self {
        Self::class(name, class_name::<T>())
    }

    /// 基本类型参数
    pub fn scalar(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_type: None,
            default: None,
        }
    }

    /// 设置默认值
    pub fn with_default<T: Any + Send + Sync>(mut self, default: T) -> Self {
        self.default = Some(Arc::new(default));
        self
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

/// 构造函数类型
pub type Constructor = Arc<dyn Fn(Arguments) -> ContainerResult<Value> + Send + Sync>;

/// 类描述符
#[derive(Clone)]
pub struct ClassDescriptor {
    /// 类名
    pub name: String,
    /// 构造函数参数（声明顺序）
    pub parameters: Vec<Parameter>,
    constructor: Option<Constructor>,
}

impl ClassDescriptor {
    /// 可实例化的类
    pub fn instantiable(
        name: impl Into<String>,
        parameters: Vec<Parameter>,
        constructor: Constructor,
    ) -> Self {
        Self {
            name: name.into(),
            parameters,
            constructor: Some(constructor),
        }
    }

    /// 接口或抽象类型，不能直接实例化
    pub fn abstract_type(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            constructor: None,
        }
    }

    pub fn is_instantiable(&self) -> bool {
        self.constructor.is_some()
    }

    /// 使用已解析的参数调用构造函数
    pub fn construct(&self, arguments: Arguments) -> ContainerResult<Value> {
        match &self.constructor {
            Some(constructor) => constructor(arguments),
            None => Err(ContainerError::resolution(
                &self.name,
                format!("类 [{}] 无法实例化", self.name),
            )),
        }
    }
}

impl std::fmt::Debug for ClassDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassDescriptor")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .field("instantiable", &self.is_instantiable())
            .finish()
    }
}

/// 已解析的构造参数（声明顺序）
#[derive(Debug, Clone)]
pub struct Arguments {
    class: String,
    values: Vec<(String, Value)>,
}

impl Arguments {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            values: Vec::new(),
        }
    }

    pub fn push(&mut self, name: impl Into<String>, value: Value) {
        self.values.push((name.into(), value));
    }

    /// 正在构造的类名
    pub fn class(&self) -> &str {
        &self.class
    }

    /// 原始值
    pub fn raw(&self, name: &str) -> ContainerResult<Value> {
        self.values
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| Arc::clone(value))
            .ok_or_else(|| {
                ContainerError::argument_resolution(&self.class, name, "构造参数未提供")
            })
    }

    /// 按类型取出共享值
    pub fn get<T: Any + Send + Sync>(&self, name: &str) -> ContainerResult<Arc<T>> {
        self.raw(name)?.downcast::<T>().map_err(|_| {
            ContainerError::argument_resolution(
                &self.class,
                name,
                format!("期望类型 {}", std::any::type_name::<T>()),
            )
        })
    }

    /// 按类型取出值的副本，适用于基本类型
    pub fn value<T: Any + Send + Sync + Clone>(&self, name: &str) -> ContainerResult<T> {
        self.get::<T>(name).map(|shared| (*shared).clone())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// 可由容器自动装配的类型
pub trait Injectable: Any + Send + Sync + Sized {
    /// 构造函数参数（声明顺序），默认无参数
    fn parameters() -> Vec<Parameter> {
        Vec::new()
    }

    /// 使用已解析的参数构造实例
    fn construct(arguments: &Arguments) -> ContainerResult<Self>;

    /// 生成类描述符
    fn descriptor() -> ClassDescriptor {
        ClassDescriptor::instantiable(
            class_name::<Self>(),
            Self::parameters(),
            Arc::new(|arguments: Arguments| {
                let constructed = Self::construct(&arguments)?;
                Ok(Arc::new(constructed) as Value)
            }),
        )
    }
}

/// 构造函数内省能力
pub trait ClassIntrospector: Send + Sync {
    /// 查找类描述符，类不存在时返回 `None`
    fn describe(&self, class: &str) -> Option<ClassDescriptor>;
}

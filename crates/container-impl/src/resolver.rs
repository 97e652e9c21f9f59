//! 解析引擎
//!
//! 解析顺序：规范化别名 -> 实例缓存 -> 绑定（工厂或类）-> 构造函数参数
//! -> 扩展函数 -> 写入共享缓存。
//!
//! 同一线程内的循环依赖由解析链发现；等待其他线程构造的共享实例前，
//! 先沿实例缓存的等待图检查是否会形成跨线程的循环。

use crate::container::Container;
use crate::extenders::apply_extenders;
use crate::instances::Claim;
use crate::resolution::ResolutionGuard;
use container_abstractions::{Arguments, ClassIntrospector, Concrete, Parameter};
use container_common::{ContainerError, ContainerResult, Overrides, Value};
use std::sync::Arc;
use tracing::{debug, trace, warn};

impl Container {
    /// 解析别名
    pub(crate) fn resolve(&self, alias: &str, overrides: &Overrides) -> ContainerResult<Value> {
        self.register_deferred(alias)?;
        let canonical = self.canonicalize(alias)?;
        if canonical != alias {
            self.register_deferred(&canonical)?;
        }

        let _guard =
            ResolutionGuard::enter(self.id(), &canonical, self.config.max_resolution_depth)?;
        trace!("解析: {} -> {}", alias, canonical);

        let claim = {
            let mut state = self.state.write();
            if state.bindings.is_shared(&canonical, &state.instances) {
                Some(state.instances.claim(&canonical))
            } else {
                None
            }
        };

        let cell = match claim {
            None => return self.construct(&canonical, overrides),
            Some(Claim::Ready(existing)) => {
                self.warn_ignored_overrides(&canonical, overrides);
                return Ok(existing);
            }
            Some(Claim::Pending(cell)) => cell,
        };

        let waited = cell.get().is_none();
        if waited {
            let walked = self.state.write().instances.wait_for(&canonical, &cell);
            if let Err(path) = walked {
                let mut dependency_chain = path.join(" -> ");
                dependency_chain.push_str(" -> ");
                dependency_chain.push_str(&canonical);
                warn!("跨线程循环依赖: {}", dependency_chain);
                return Err(ContainerError::CircularDependency { dependency_chain });
            }
        }

        let mut constructed_here = false;
        let result = cell
            .get_or_try_init(|| {
                constructed_here = true;
                self.state.write().instances.begin(&canonical, &cell);
                let built = self.construct(&canonical, overrides);
                if built.is_err() {
                    self.state.write().instances.abandon(&canonical, &cell);
                }
                built
            })
            .map(Arc::clone);
        if waited {
            self.state.write().instances.stop_waiting();
        }
        let value = result?;

        if constructed_here {
            if !self
                .state
                .write()
                .instances
                .settle(&canonical, &cell, Arc::clone(&value))
            {
                debug!("[{}] 构造期间被重新绑定或清空，结果不写入缓存", canonical);
            }
        } else {
            self.warn_ignored_overrides(&canonical, overrides);
        }

        Ok(value)
    }

    /// 构造规范别名并执行扩展函数
    fn construct(&self, canonical: &str, overrides: &Overrides) -> ContainerResult<Value> {
        let concrete = self.state.read().bindings.concrete_for(canonical);
        let built = self.build(canonical, &concrete, overrides)?;

        let chain = self.state.read().extenders.chain(canonical);
        if chain.is_empty() {
            return Ok(built);
        }
        trace!("[{}] 执行 {} 个扩展函数", canonical, chain.len());
        apply_extenders(built, &chain, self)
    }

    fn build(
        &self,
        requested: &str,
        concrete: &Concrete,
        overrides: &Overrides,
    ) -> ContainerResult<Value> {
        match concrete {
            Concrete::Factory(factory) => {
                factory(self, overrides).map_err(|error| creation_failure(requested, error))
            }
            Concrete::Class(class) => self.build_class(requested, class, overrides),
        }
    }

    /// 按类描述符自动装配
    fn build_class(
        &self,
        requested: &str,
        class: &str,
        overrides: &Overrides,
    ) -> ContainerResult<Value> {
        let descriptor = self.catalog.describe(class).ok_or_else(|| {
            ContainerError::resolution(requested, format!("类 [{class}] 不存在"))
        })?;

        if !descriptor.is_instantiable() {
            return Err(ContainerError::resolution(
                requested,
                format!("[{class}] 无法实例化"),
            ));
        }

        let mut arguments = Arguments::new(&descriptor.name);
        for parameter in &descriptor.parameters {
            let value = self.resolve_parameter(&descriptor.name, parameter, overrides)?;
            arguments.push(&parameter.name, value);
        }

        descriptor
            .construct(arguments)
            .map_err(|error| creation_failure(&descriptor.name, error))
    }

    /// 解析单个构造参数
    ///
    /// 依次尝试：参数覆盖、当前消费者的上下文绑定、按声明类型递归解析、默认值。
    fn resolve_parameter(
        &self,
        consumer: &str,
        parameter: &Parameter,
        overrides: &Overrides,
    ) -> ContainerResult<Value> {
        if let Some(value) = overrides.get(&parameter.name) {
            return Ok(Arc::clone(value));
        }

        let Some(declared) = parameter.declared_type.as_deref() else {
            return parameter.default.clone().ok_or_else(|| {
                ContainerError::argument_resolution(
                    consumer,
                    &parameter.name,
                    "没有参数覆盖也没有默认值",
                )
            });
        };

        let resolved = match self.contextual_for(consumer, declared)? {
            Some(implementation) => {
                trace!("构造 [{}] 时使用上下文绑定解析 [{}]", consumer, declared);
                self.resolve_contextual(&implementation)
            }
            None => self.resolve(declared, &Overrides::new()),
        };

        match (resolved, &parameter.default) {
            (Ok(value), _) => Ok(value),
            (
                Err(ContainerError::Resolution { .. } | ContainerError::ArgumentResolution { .. }),
                Some(default),
            ) => {
                debug!(
                    "[{}] 的参数 ${} 无法解析，使用默认值",
                    consumer, parameter.name
                );
                Ok(Arc::clone(default))
            }
            (Err(error), _) => Err(error),
        }
    }

    /// 查找上下文绑定，先按声明类型原样匹配，再按规范别名匹配
    fn contextual_for(
        &self,
        consumer: &str,
        declared: &str,
    ) -> ContainerResult<Option<Concrete>> {
        let state = self.state.read();
        if let Some(implementation) = state.contextual.find(consumer, declared) {
            return Ok(Some(implementation));
        }
        let canonical = state.aliases.canonicalize(declared)?;
        Ok(state.contextual.find(consumer, &canonical))
    }

    /// 上下文实现的解析结果不写入依赖别名的缓存
    fn resolve_contextual(&self, implementation: &Concrete) -> ContainerResult<Value> {
        match implementation {
            Concrete::Class(class) => self.resolve(class, &Overrides::new()),
            Concrete::Factory(factory) => factory(self, &Overrides::new()),
        }
    }

    /// 提供该名称的服务提供者尚未注册且容器中没有对应绑定时，先注册提供者
    fn register_deferred(&self, name: &str) -> ContainerResult<()> {
        if self.bound(name) || !self.providers.has_pending(name) {
            return Ok(());
        }
        debug!("[{}] 由延迟注册的服务提供者提供", name);
        self.providers.register(name, self)
    }

    fn warn_ignored_overrides(&self, alias: &str, overrides: &Overrides) {
        if self.config.warn_on_ignored_overrides && !overrides.is_empty() {
            let names: Vec<&str> = overrides.names().collect();
            warn!("[{}] 已有共享实例，忽略参数覆盖 {:?}", alias, names);
        }
    }
}

/// 用户构造函数或工厂的失败包装为 [`ContainerError::ComponentCreationFailed`]，
/// 嵌套解析产生的错误原样返回
fn creation_failure(type_name: &str, error: ContainerError) -> ContainerError {
    if error.is_resolution_failure() {
        error
    } else {
        ContainerError::creation_failed(type_name, error)
    }
}

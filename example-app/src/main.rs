//! # 示例应用程序
//!
//! 演示服务容器的注册、服务提供者、上下文绑定、标签与扩展函数

use anyhow::Context;
use async_trait::async_trait;
use clap::Parser;
use container_abstractions::{
    class_name, Arguments, Injectable, Parameter, RegistryExt, Resolver, ResolverExt,
    ServiceContainer, ServiceProvider,
};
use container_common::{value, ContainerConfig, ContainerResult, Overrides, Value};
use container_impl::Container;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "example-app")]
#[command(about = "服务容器示例应用")]
struct Args {
    /// 容器配置文件路径（不含扩展名）
    #[arg(short, long, default_value = container_common::DEFAULT_CONFIG_PATH)]
    config: String,

    /// 日志级别
    #[arg(long, default_value = "info")]
    log_level: String,

    /// 解析 mailer 时使用的参数覆盖（JSON 对象）
    #[arg(long)]
    overrides: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .init();

    info!("启动服务容器示例应用");

    let config = ContainerConfig::load_from(&args.config)
        .with_context(|| format!("加载容器配置失败: {}", args.config))?;
    let container = Arc::new(Container::with_config(config));

    container
        .register_class::<Mailer>()
        .register_class::<AlertNotifier>()
        .add_provider(Arc::new(TransportProvider))
        .add_provider(Arc::new(NotificationProvider));

    container.boot().await.context("启动服务提供者失败")?;

    demonstrate_resolution(&container, args.overrides.as_deref())?;
    demonstrate_tagged(&container)?;

    info!("应用已退出");
    Ok(())
}

/// 演示单次解析与参数覆盖
fn demonstrate_resolution(container: &Container, overrides: Option<&str>) -> anyhow::Result<()> {
    let overrides = match overrides {
        Some(raw) => Overrides::from_json(serde_json::from_str(raw)?)?,
        None => Overrides::new(),
    };

    let mailer = container.make_as_with::<Mailer>(class_name::<Mailer>(), &overrides)?;
    mailer.notify("容器已启动");

    let alerts = container.make_as::<AlertNotifier>("alerts")?;
    alerts.notify("这条消息走日志通道");

    match container.make("dne") {
        Ok(_) => error!("不存在的服务竟然解析成功"),
        Err(e) => info!("预期中的解析失败: {}", e),
    }
    Ok(())
}

/// 演示按标签批量解析
fn demonstrate_tagged(container: &Container) -> anyhow::Result<()> {
    let notifiers = container.make_tagged(NOTIFIERS)?;
    info!("标签 [{}] 下共有 {} 个通知器", NOTIFIERS, notifiers.len());

    for notifier in &notifiers {
        if let Some(notifier) = as_notifier(notifier) {
            notifier.notify("批量通知");
        }
    }
    Ok(())
}

// 示例服务

/// 通知器标签
const NOTIFIERS: &str = "notifiers";

/// 发送通道
pub trait Transport: Send + Sync {
    fn send(&self, from: &str, message: &str);
}

/// 容器中保存的通道句柄
type SharedTransport = Arc<dyn Transport>;

/// 通道接口在容器中的名称
fn transport() -> &'static str {
    class_name::<dyn Transport>()
}

/// SMTP 通道（示例中只打印日志）
#[derive(Debug)]
pub struct SmtpTransport {
    host: String,
}

impl Transport for SmtpTransport {
    fn send(&self, from: &str, message: &str) {
        info!("[smtp://{}] {} -> {}", self.host, from, message);
    }
}

/// 日志通道
#[derive(Debug)]
pub struct LogTransport;

impl Transport for LogTransport {
    fn send(&self, from: &str, message: &str) {
        info!("[log] {} -> {}", from, message);
    }
}

/// 通知器
pub trait Notifier {
    fn notify(&self, message: &str);
}

fn as_notifier(value: &Value) -> Option<&dyn Notifier> {
    if let Some(mailer) = value.downcast_ref::<Mailer>() {
        return Some(mailer as &dyn Notifier);
    }
    value
        .downcast_ref::<AlertNotifier>()
        .map(|alerts| alerts as &dyn Notifier)
}

/// 邮件通知器
pub struct Mailer {
    transport: Arc<SharedTransport>,
    sender: String,
}

impl Injectable for Mailer {
    fn parameters() -> Vec<Parameter> {
        vec![
            Parameter::class("transport", transport()),
            Parameter::scalar("sender").with_default("noreply@example.com".to_string()),
        ]
    }

    fn construct(arguments: &Arguments) -> ContainerResult<Self> {
        Ok(Self {
            transport: arguments.get("transport")?,
            sender: arguments.value("sender")?,
        })
    }
}

impl Notifier for Mailer {
    fn notify(&self, message: &str) {
        self.transport.send(&self.sender, message);
    }
}

/// 告警通知器
pub struct AlertNotifier {
    transport: Arc<SharedTransport>,
}

impl Injectable for AlertNotifier {
    fn parameters() -> Vec<Parameter> {
        vec![Parameter::class("transport", transport())]
    }

    fn construct(arguments: &Arguments) -> ContainerResult<Self> {
        Ok(Self {
            transport: arguments.get("transport")?,
        })
    }
}

impl Notifier for AlertNotifier {
    fn notify(&self, message: &str) {
        self.transport.send("alerts", message);
    }
}

// 服务提供者

/// 注册默认发送通道
struct TransportProvider;

#[async_trait]
impl ServiceProvider for TransportProvider {
    fn name(&self) -> &str {
        "TransportProvider"
    }

    fn provides(&self, alias: &str) -> bool {
        alias == transport()
    }

    fn register(&self, container: &dyn ServiceContainer) -> ContainerResult<()> {
        container.singleton_factory(transport(), |_, _| {
            let transport: SharedTransport = Arc::new(SmtpTransport {
                host: "mail.example.com".to_string(),
            });
            Ok(value(transport))
        })
    }
}

/// 注册通知器、上下文绑定与标签
struct NotificationProvider;

#[async_trait]
impl ServiceProvider for NotificationProvider {
    fn name(&self) -> &str {
        "NotificationProvider"
    }

    fn provides(&self, alias: &str) -> bool {
        matches!(alias, "mailer" | "alerts")
    }

    fn register(&self, container: &dyn ServiceContainer) -> ContainerResult<()> {
        container.singleton(class_name::<Mailer>(), None)?;
        container.alias(class_name::<Mailer>(), &["mailer"])?;
        container.bind("alerts", Some(class_name::<AlertNotifier>().into()))?;

        container
            .when([class_name::<AlertNotifier>()])
            .needs(transport())
            .give_factory(|_, _| {
                let transport: SharedTransport = Arc::new(LogTransport);
                Ok(value(transport))
            })?;

        container.tag(&["mailer", "alerts"], &[NOTIFIERS]);

        container.extend_with("mailer", |mailer, _| {
            info!("mailer 已创建");
            Ok(mailer)
        })
    }

    async fn boot(&self, container: &dyn ServiceContainer) -> ContainerResult<()> {
        info!(
            "通知器启动完成，标签 [{}] 下有 {:?}",
            NOTIFIERS,
            container.tagged_aliases(NOTIFIERS)
        );
        Ok(())
    }
}

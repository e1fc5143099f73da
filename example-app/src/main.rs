//! # 示例应用程序
//!
//! 演示如何使用 Lorn IoC 容器：配置值注入、构造器与字段注入、按能力类型获取
//! 以及通过拦截链调用服务方法。

mod aspect;
mod config;
mod model;
mod repository;
mod service;

use aspect::LoggingAspect;
use clap::Parser;
use config::AppConfig;
use config_impl::MapPropertySource;
use di_abstractions::BeanRef;
use di_impl::StaticDiscovery;
use infrastructure_composition::{ApplicationContext, ApplicationContextBuilder, LoggingConfig};
use repository::{InMemoryUserRepository, UserRepository};
use service::UserService;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// 内置默认配置，优先级低于所有外部配置源
const DEFAULT_PROPERTIES: &[(&str, &str)] = &[
    ("app.name", "example-app"),
    ("app.version", "0.1.0"),
    ("app.debug", "false"),
    ("server.port", "8080"),
    ("feature.user.management", "true"),
    ("db.host", "localhost"),
    ("db.port", "5432"),
];

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "example-app")]
#[command(about = "Lorn IoC 示例应用")]
struct Args {
    /// `.properties` 配置文件路径
    #[arg(short, long)]
    properties: Option<PathBuf>,

    /// TOML/JSON/YAML 配置文件路径
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 环境变量前缀，例如 `APP` 时 `APP_SERVER_PORT` 覆盖 `server.port`
    #[arg(long)]
    env_prefix: Option<String>,

    /// 以 JSON 格式输出日志
    #[arg(long)]
    json_logs: bool,

    /// 输出调试日志
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let context = build_context(&args)?;
    info!("应用上下文初始化完成");

    let config = context.get_bean::<AppConfig>()?;
    config.print_configuration();
    println!();

    demonstrate(&context)?;

    let stats = context.stats();
    println!(
        "容器 {}: {} 个 Bean, {} 个切面, {} 个通知, 启动耗时 {} ms",
        stats.container_id,
        stats.bean_count,
        stats.aspect_count,
        stats.advice_count,
        stats.startup_millis()
    );
    Ok(())
}

/// 构建应用上下文
fn build_context(args: &Args) -> anyhow::Result<ApplicationContext> {
    let logging = if args.verbose {
        LoggingConfig::development()
    } else {
        LoggingConfig::default()
    }
    .with_json(args.json_logs);

    let defaults =
        MapPropertySource::from_pairs("defaults", DEFAULT_PROPERTIES.iter().copied()).with_priority(0);

    let mut builder = ApplicationContextBuilder::new()
        .with_logging(logging)
        .add_property_source(Arc::new(defaults))
        .with_default_properties()?;

    if let Some(path) = &args.properties {
        builder = builder.add_properties_file(path)?;
    }
    if let Some(path) = &args.config {
        builder = builder.add_config_file(path)?;
    }
    if let Some(prefix) = &args.env_prefix {
        builder = builder.add_env_vars(prefix.as_str())?;
    }

    let discovery = StaticDiscovery::new("example-app")
        .with::<AppConfig>()
        .with::<UserService>()
        .with::<InMemoryUserRepository>()
        .with::<LoggingAspect>();

    Ok(builder.add_discovery(Box::new(discovery)).build()?)
}

/// 经拦截链调用 `T` 上的方法
fn intercepted<T, R>(
    context: &ApplicationContext,
    target: &BeanRef,
    method: &str,
    call: impl FnOnce() -> R,
) -> anyhow::Result<R>
where
    T: ?Sized + 'static,
{
    Ok(context
        .chain_for_method::<T>(method)
        .invoke(Some(Arc::clone(target)), call)?)
}

/// 演示容器功能
fn demonstrate(context: &ApplicationContext) -> anyhow::Result<()> {
    println!("=== 容器功能演示 ===");

    let bean = context.get_bean_by_name("userService")?;
    let target = bean.instance();
    let service = bean.get_as::<UserService>()?;

    println!("1. 获取所有用户:");
    let users = intercepted::<UserService, _>(context, target, "get_all_users", || {
        service.get_all_users()
    })?;
    users.iter().for_each(|user| println!("   {user}"));

    println!("2. 按ID获取用户 (1):");
    if let Some(user) = intercepted::<UserService, _>(context, target, "get_user_by_id", || {
        service.get_user_by_id(1)
    })? {
        println!("   {user}");
    }

    println!("3. 创建新用户:");
    let created = intercepted::<UserService, _>(context, target, "create_user", || {
        service.create_user("Alice Brown", "alice@example.com")
    })??;
    println!("   已创建: {created}");

    println!("4. 更新用户 (2):");
    let updated = intercepted::<UserService, _>(context, target, "update_user", || {
        service.update_user(2, "Jane Smith Updated", "jane.updated@example.com")
    })??;
    println!("   已更新: {updated}");

    println!("5. 按姓名搜索 (John):");
    let found = intercepted::<UserService, _>(context, target, "search_users_by_name", || {
        service.search_users_by_name("John")
    })?;
    found.iter().for_each(|user| println!("   {user}"));

    println!("6. 用户统计:");
    let count = intercepted::<UserService, _>(context, target, "user_count", || {
        service.user_count()
    })?;
    println!("   用户总数: {count}");

    println!("7. 删除用户 (3):");
    intercepted::<UserService, _>(context, target, "delete_user", || service.delete_user(3))??;

    // 按能力类型获取仓储，经仓储切点调用
    println!("8. 变更后的所有用户:");
    let repository_bean = context.get_bean_by_name("userRepository")?;
    let repository = context.get_bean::<dyn UserRepository>()?;
    let users = intercepted::<dyn UserRepository, _>(
        context,
        repository_bean.instance(),
        "find_all",
        || repository.find_all(),
    )?;
    users.iter().for_each(|user| println!("   {user}"));

    println!("=== 演示完成 ===");
    println!();
    Ok(())
}

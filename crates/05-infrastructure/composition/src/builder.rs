//! 应用上下文构建器

use crate::context::ApplicationContext;
use chrono::Utc;
use config_abstractions::{ConfigurationBinder, PropertySource};
use config_impl::{
    CompositePropertySource, DefaultConfigurationBinder, LayeredConfigSource, MapPropertySource,
    PropertiesFileSource,
};
use di_abstractions::{
    BeanRegistry, ComponentDescriptor, ComponentDiscovery, ContainerStats, DependencyResolver,
};
use di_aop::AspectMatcher;
use di_impl::{DefaultBeanRegistry, DefaultDependencyResolver, InstantiationPlanner};
use infrastructure_common::{InfrastructureError, InfrastructureResult};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// 默认配置文件名，位于工作目录
pub const DEFAULT_PROPERTIES_FILE: &str = "application.properties";

/// 应用上下文构建器
///
/// 收集组件描述符和配置源，`build` 时依次完成规划、注册、注入和切面索引。
/// 任一步骤失败都会中止启动，不会返回部分构建的上下文。
pub struct ApplicationContextBuilder {
    /// 直接添加的组件描述符
    descriptors: Vec<ComponentDescriptor>,
    /// 组件发现器列表
    discoveries: Vec<Box<dyn ComponentDiscovery>>,
    /// 配置源
    sources: CompositePropertySource,
    /// 程序内配置计数，用于命名
    programmatic_sources: usize,
    /// 日志配置，未设置时不初始化日志
    logging: Option<LoggingConfig>,
}

impl ApplicationContextBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self {
            descriptors: Vec::new(),
            discoveries: Vec::new(),
            sources: CompositePropertySource::new(),
            programmatic_sources: 0,
            logging: None,
        }
    }

    /// 添加组件描述符
    #[must_use]
    pub fn add_descriptor(mut self, descriptor: ComponentDescriptor) -> Self {
        debug!("添加组件: {}", descriptor.type_info().short_name());
        self.descriptors.push(descriptor);
        self
    }

    /// 批量添加组件描述符
    #[must_use]
    pub fn add_descriptors<I>(mut self, descriptors: I) -> Self
    where
        I: IntoIterator<Item = ComponentDescriptor>,
    {
        self.descriptors.extend(descriptors);
        self
    }

    /// 添加组件发现器
    #[must_use]
    pub fn add_discovery(mut self, discovery: Box<dyn ComponentDiscovery>) -> Self {
        debug!("添加组件发现器: {}", discovery.name());
        self.discoveries.push(discovery);
        self
    }

    /// 添加自定义配置源
    #[must_use]
    pub fn add_property_source(mut self, source: Arc<dyn PropertySource>) -> Self {
        info!("添加配置源: {} (优先级 {})", source.name(), source.priority());
        self.sources.add_source(source);
        self
    }

    /// 添加程序内配置，优先级最高
    #[must_use]
    pub fn add_properties<K, V, I>(mut self, pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.programmatic_sources += 1;
        let name = format!("programmatic-{}", self.programmatic_sources);
        self.add_property_source(Arc::new(MapPropertySource::from_pairs(name, pairs)))
    }

    /// 添加 `.properties` 配置文件
    pub fn add_properties_file<P: AsRef<Path>>(self, path: P) -> InfrastructureResult<Self> {
        let source = PropertiesFileSource::load(path)?;
        Ok(self.add_property_source(Arc::new(source)))
    }

    /// 加载工作目录下可选的 `application.properties`
    pub fn with_default_properties(self) -> InfrastructureResult<Self> {
        let source = PropertiesFileSource::optional(DEFAULT_PROPERTIES_FILE)?;
        Ok(self.add_property_source(Arc::new(source)))
    }

    /// 添加 TOML/JSON/YAML 配置文件
    pub fn add_config_file<P: AsRef<Path>>(self, path: P) -> InfrastructureResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(InfrastructureError::BootstrapFailed {
                message: format!("配置文件不存在: {}", path.display()),
            });
        }

        let source = LayeredConfigSource::builder().add_file(path).build()?;
        Ok(self.add_property_source(Arc::new(source)))
    }

    /// 添加环境变量配置源
    pub fn add_env_vars(self, prefix: impl Into<String>) -> InfrastructureResult<Self> {
        let prefix = prefix.into();
        let source = LayeredConfigSource::builder()
            .with_env_prefix(prefix)
            .build()?;
        Ok(self.add_property_source(Arc::new(source)))
    }

    /// 配置日志
    #[must_use]
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging = Some(config);
        self
    }

    /// 构建应用上下文
    pub fn build(self) -> InfrastructureResult<ApplicationContext> {
        // 只有在明确配置了日志时才初始化，避免测试中重复初始化
        if let Some(config) = &self.logging {
            initialize_logging(config)?;
        }

        let started_at = Utc::now();
        let clock = Instant::now();
        info!("开始构建应用上下文");

        let mut descriptors: Vec<Arc<ComponentDescriptor>> =
            self.descriptors.into_iter().map(Arc::new).collect();
        for discovery in &self.discoveries {
            let found = discovery.discover()?;
            debug!("发现器 {} 提供 {} 个组件", discovery.name(), found.len());
            descriptors.extend(found.into_iter().map(Arc::new));
        }

        let plan = InstantiationPlanner::new().plan(descriptors)?;

        let mut registry = DefaultBeanRegistry::new();
        for descriptor in plan {
            registry.register(descriptor)?;
        }

        let properties: Arc<dyn PropertySource> = Arc::new(self.sources);
        let binder: Arc<dyn ConfigurationBinder> =
            Arc::new(DefaultConfigurationBinder::new(Arc::clone(&properties)));
        let injected = DefaultDependencyResolver::new(binder).inject_all(&registry)?;
        debug!("注入完成，共写入 {} 个槽位", injected);

        let matcher = AspectMatcher::from_registry(&registry)?;

        let mut stats = ContainerStats::new(started_at);
        stats.bean_count = registry.len();
        stats.aspect_count = matcher.aspect_count();
        stats.advice_count = matcher.advice_count();
        stats.startup_duration = clock.elapsed();

        info!(
            "应用上下文构建完成: {} 个 Bean, {} 个通知, 耗时 {} ms",
            stats.bean_count,
            stats.advice_count,
            stats.startup_millis()
        );
        Ok(ApplicationContext::new(registry, matcher, properties, stats))
    }
}

impl Default for ApplicationContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// 初始化日志系统
fn initialize_logging(config: &LoggingConfig) -> InfrastructureResult<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(config.level)
        .with_target(config.show_target)
        .with_thread_ids(config.show_thread_ids)
        .with_file(config.show_file)
        .with_line_number(config.show_line_number);

    if config.json_format {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    }
    .map_err(|e| InfrastructureError::BootstrapFailed {
        message: format!("日志初始化失败: {}", e),
    })?;

    info!("日志系统初始化完成");
    Ok(())
}

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: tracing::Level,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
    /// 是否显示文件名
    pub show_file: bool,
    /// 是否显示行号
    pub show_line_number: bool,
    /// 是否使用 JSON 格式
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: true,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// 创建开发环境日志配置
    pub fn development() -> Self {
        Self {
            level: tracing::Level::DEBUG,
            show_target: true,
            show_thread_ids: true,
            show_file: true,
            show_line_number: true,
            json_format: false,
        }
    }

    /// 创建生产环境日志配置
    pub fn production() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: false,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: true,
        }
    }

    /// 设置日志级别
    #[must_use]
    pub fn with_level(mut self, level: tracing::Level) -> Self {
        self.level = level;
        self
    }

    /// 切换 JSON 输出
    #[must_use]
    pub fn with_json(mut self, json_format: bool) -> Self {
        self.json_format = json_format;
        self
    }
}

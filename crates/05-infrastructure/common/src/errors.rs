//! 错误类型定义

use crate::configuration::ValueKind;
use thiserror::Error;

/// 装箱的错误源
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置键不存在: {key}{}", bean_suffix(.bean))]
    MissingProperty { key: String, bean: Option<String> },

    #[error("配置类型转换失败: {}值 '{value}' 无法转换为 {target}: {message}", key_prefix(.key))]
    TypeConversion {
        key: Option<String>,
        value: String,
        target: ValueKind,
        message: String,
    },

    #[error("配置文件读取失败: {path}: {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("配置解析失败: {source}")]
    Parse { source: BoxError },

    #[error("不支持的配置文件格式: {path}")]
    UnsupportedFormat { path: String },
}

impl ConfigError {
    /// 创建缺失配置错误
    pub fn missing_property(key: impl Into<String>) -> Self {
        Self::MissingProperty {
            key: key.into(),
            bean: None,
        }
    }

    /// 为错误附加所属 Bean 名称
    #[must_use]
    pub fn for_bean(self, bean_name: &str) -> Self {
        match self {
            Self::MissingProperty { key, .. } => Self::MissingProperty {
                key,
                bean: Some(bean_name.to_string()),
            },
            other => other,
        }
    }

    /// 为类型转换错误附加配置键
    #[must_use]
    pub fn with_key(self, config_key: &str) -> Self {
        match self {
            Self::TypeConversion {
                value,
                target,
                message,
                ..
            } => Self::TypeConversion {
                key: Some(config_key.to_string()),
                value,
                target,
                message,
            },
            other => other,
        }
    }
}

fn bean_suffix(bean: &Option<String>) -> String {
    bean.as_ref()
        .map(|name| format!(" (Bean: {name})"))
        .unwrap_or_default()
}

fn key_prefix(key: &Option<String>) -> String {
    key.as_ref().map(|k| format!("{k} 的")).unwrap_or_default()
}

/// 依赖注入错误类型
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("依赖无法解析: Bean '{bean}' 需要 {dependency}, 原因: {reason}")]
    UnresolvedDependency {
        bean: String,
        dependency: String,
        reason: String,
    },

    #[error("按类型查找 Bean 失败: {type_name}, 候选: {candidates:?}")]
    AmbiguousOrMissingBean {
        type_name: String,
        candidates: Vec<String>,
    },

    #[error("Bean 不存在: {name}")]
    BeanNotFound { name: String },

    #[error("Bean 类型不匹配: '{bean}' 不能作为 {expected} 使用")]
    BeanTypeMismatch { bean: String, expected: String },
}

impl DependencyError {
    /// 创建依赖无法解析错误
    pub fn unresolved(
        bean: impl Into<String>,
        dependency: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::UnresolvedDependency {
            bean: bean.into(),
            dependency: dependency.into(),
            reason: reason.into(),
        }
    }
}

/// 组件错误类型
#[derive(Error, Debug)]
pub enum ComponentError {
    #[error("Bean 创建失败: {bean} ({type_name}), 原因: {source}")]
    ConstructionFailed {
        bean: String,
        type_name: String,
        source: BoxError,
    },

    #[error("没有可用的构造器: {type_name}")]
    NoUsableConstructor { type_name: String },

    #[error("声明了多个注入构造器: {type_name}")]
    AmbiguousConstructor { type_name: String },

    #[error("Bean 名称重复: '{name}' 已被 {existing} 使用, 无法注册 {type_name}")]
    DuplicateBeanName {
        name: String,
        existing: String,
        type_name: String,
    },

    #[error("组件类型重复注册: {type_name}")]
    DuplicateComponentType { type_name: String },

    #[error("组件元数据无效: {message}")]
    InvalidMetadata { message: String },

    #[error("组件发现失败: {discoverer}, 原因: {message}")]
    DiscoveryFailed { discoverer: String, message: String },
}

/// 切面调用错误类型
#[derive(Error, Debug)]
pub enum InterceptionError {
    #[error("通知执行失败: {aspect}.{method} (目标: {identifier}), 原因: {source}")]
    AdviceFailed {
        aspect: String,
        method: String,
        identifier: String,
        source: BoxError,
    },
}

/// 基础设施错误类型
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("配置错误: {source}")]
    ConfigError {
        #[from]
        source: ConfigError,
    },

    #[error("依赖注入错误: {source}")]
    DependencyError {
        #[from]
        source: DependencyError,
    },

    #[error("组件错误: {source}")]
    ComponentError {
        #[from]
        source: ComponentError,
    },

    #[error("切面错误: {source}")]
    InterceptionError {
        #[from]
        source: InterceptionError,
    },

    #[error("基础设施启动失败: {message}")]
    BootstrapFailed { message: String },
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type DependencyResult<T> = Result<T, DependencyError>;
pub type ComponentResult<T> = Result<T, ComponentError>;
pub type InfrastructureResult<T> = Result<T, InfrastructureError>;

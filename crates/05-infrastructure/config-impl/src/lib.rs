//! # Configuration Implementation
//!
//! 配置源与配置绑定器的具体实现。
//!
//! ## 主要组件
//!
//! - [`MapPropertySource`] - 内存配置源
//! - [`PropertiesFileSource`] - `.properties` 文件配置源
//! - [`LayeredConfigSource`] - 基于 `config` crate 的文件与环境变量配置源
//! - [`CompositePropertySource`] - 按优先级组合多个配置源
//! - [`DefaultConfigurationBinder`] - 默认配置绑定器

pub mod binder;
pub mod composite;
pub mod providers;

pub use binder::*;
pub use composite::*;
pub use providers::*;

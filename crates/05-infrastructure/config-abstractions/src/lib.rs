//! # Configuration Abstractions
//!
//! 配置抽象层，定义容器读取配置的核心接口。
//!
//! ## 核心接口
//!
//! - [`PropertySource`] - 键到字符串值的配置源
//! - [`ConfigurationBinder`] - 配置值读取与类型转换

pub mod binder;
pub mod provider;

pub use binder::*;
pub use provider::*;

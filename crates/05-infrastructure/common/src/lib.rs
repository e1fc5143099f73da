//! # Infrastructure Common
//!
//! 容器各层共享的基础类型和工具。
//!
//! ## 核心组件
//!
//! - [`TypeInfo`] - 类型元数据（支持 trait object）
//! - [`Stereotype`] - 组件构造型
//! - [`BeanRef`] - Bean 实例句柄
//! - [`ValueKind`] / [`TypedValue`] / [`Bindable`] - 值注入的类型系统
//! - [`NamingConventions`] - Bean 命名约定
//! - 各层错误类型

pub mod component;
pub mod configuration;
pub mod conventions;
pub mod errors;
pub mod metadata;

pub use component::*;
pub use configuration::*;
pub use conventions::*;
pub use errors::*;
pub use metadata::*;

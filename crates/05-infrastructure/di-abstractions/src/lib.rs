//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义组件描述、注册和依赖解析的核心接口。
//!
//! ## 核心接口
//!
//! - [`ComponentDescriptor`] - 组件描述符及其类型化构建器
//! - [`Autowired`] / [`Value`] - 一次性写入的注入槽位
//! - [`BeanRegistry`] - Bean 注册表接口
//! - [`DependencyResolver`] - 依赖解析器接口
//! - [`ComponentDiscovery`] - 组件发现接口
//! - [`JoinPoint`] / [`AdviceDeclaration`] - 切面通知声明

pub mod advice;
pub mod container;
pub mod descriptor;
pub mod discovery;
pub mod injection;
pub mod registry;
pub mod resolver;

pub use advice::*;
pub use container::*;
pub use descriptor::*;
pub use discovery::*;
pub use injection::*;
pub use registry::*;
pub use resolver::*;

pub use infrastructure_common::BeanRef;

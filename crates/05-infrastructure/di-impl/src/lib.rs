//! # 依赖注入具体实现
//!
//! 提供 Bean 注册表、依赖解析器、构造器实例化规划和静态组件发现的实现。
//!
//! 容器启动流程：
//!
//! 1. [`StaticDiscovery`] 等发现器产出组件描述符
//! 2. [`InstantiationPlanner`] 按构造器依赖确定注册顺序
//! 3. [`DefaultBeanRegistry`] 逐个创建单例
//! 4. [`DefaultDependencyResolver`] 写入字段依赖和配置值

pub mod discovery;
pub mod planner;
pub mod registry;
pub mod resolver;

pub use discovery::*;
pub use planner::*;
pub use registry::*;
pub use resolver::*;

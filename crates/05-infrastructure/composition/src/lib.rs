//! # 基础设施组合层
//!
//! 将配置源、Bean 注册表、依赖解析器和切面引擎组合成一个可用的应用上下文。
//!
//! ## 主要功能
//!
//! - **上下文构建器**: 使用建造者模式收集组件和配置源
//! - **启动流程**: 规划 → 注册 → 注入 → 切面索引，任一步失败即中止
//! - **应用上下文**: 只读的 Bean 查询和方法拦截入口
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use infrastructure_composition::ApplicationContextBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let context = ApplicationContextBuilder::new()
//!         .with_default_properties()?
//!         .add_properties([("app.name", "demo")])
//!         .build()?;
//!
//!     println!("Bean 数量: {}", context.stats().bean_count);
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;

pub use builder::{ApplicationContextBuilder, LoggingConfig, DEFAULT_PROPERTIES_FILE};
pub use context::ApplicationContext;

// 重新导出错误类型
pub use infrastructure_common::InfrastructureError;

#[cfg(test)]
mod tests;

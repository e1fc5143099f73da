//! # AOP
//!
//! 切面引擎：索引切面 Bean 上声明的通知，按切点匹配方法标识符，
//! 按顺序构建并缓存拦截链。
//!
//! 拦截采用显式模型：调用方通过 [`AspectMatcher::chain_for`] 获取拦截链，
//! 再用 [`InterceptorChain::invoke`] 包裹目标调用，容器不做动态代理。

pub mod chain;
pub mod matcher;
pub mod pointcut;

pub use chain::*;
pub use matcher::*;
pub use pointcut::*;

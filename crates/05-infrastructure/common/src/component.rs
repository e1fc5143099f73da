//! 组件基础定义
//!
//! 提供组件构造型和 Bean 实例句柄

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Bean 实例句柄
///
/// 容器持有的每个单例都以该形式存储，按需向下转型为具体类型或能力类型。
pub type BeanRef = Arc<dyn Any + Send + Sync>;

/// 组件构造型
///
/// 仅用于默认命名和识别切面，核心流程对其余构造型一视同仁。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Stereotype {
    /// 通用组件
    #[default]
    Generic,
    /// 服务组件
    Service,
    /// 仓储组件
    Repository,
    /// 配置组件
    Configuration,
    /// 切面组件
    Aspect,
}

impl Stereotype {
    /// 是否为切面
    pub fn is_aspect(self) -> bool {
        matches!(self, Self::Aspect)
    }

    /// 构造型名称
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Generic => "component",
            Self::Service => "service",
            Self::Repository => "repository",
            Self::Configuration => "configuration",
            Self::Aspect => "aspect",
        }
    }
}

impl fmt::Display for Stereotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

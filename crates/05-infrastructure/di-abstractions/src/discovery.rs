//! 组件发现抽象接口
//!
//! 发现机制对容器而言是黑盒，只需产出组件描述符

use crate::descriptor::ComponentDescriptor;
use infrastructure_common::ComponentResult;

/// 组件发现器 trait
pub trait ComponentDiscovery: Send + Sync {
    /// 发现组件
    fn discover(&self) -> ComponentResult<Vec<ComponentDescriptor>>;

    /// 获取发现器名称
    fn name(&self) -> &str;
}

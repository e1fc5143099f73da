//! 依赖解析器抽象接口
//!
//! 提供依赖解析和注入的能力

use crate::registry::{Bean, BeanRegistry};
use infrastructure_common::{
    BeanRef, DependencyError, DependencyResult, InfrastructureResult, TypeInfo,
};
use std::any::TypeId;

/// 依赖解析器 trait
///
/// 负责为 Bean 的注入点计算注入值并写入
pub trait DependencyResolver: Send + Sync {
    /// 解析依赖，返回目标类型的句柄
    fn resolve_dependency(
        &self,
        registry: &dyn BeanRegistry,
        owner: &str,
        target: &TypeInfo,
    ) -> DependencyResult<BeanRef>;

    /// 为单个 Bean 注入所有字段，返回本次写入的字段数
    fn inject(&self, registry: &dyn BeanRegistry, bean: &Bean) -> InfrastructureResult<usize>;

    /// 按注册顺序为所有 Bean 注入
    fn inject_all(&self, registry: &dyn BeanRegistry) -> InfrastructureResult<usize> {
        let mut injected = 0;
        for bean in registry.all_beans() {
            injected += self.inject(registry, &bean)?;
        }
        Ok(injected)
    }
}

/// 解析上下文
///
/// 记录当前构造器解析链，用于检测循环依赖
#[derive(Debug, Clone, Default)]
pub struct ResolveContext {
    /// 当前解析链：组件类型与其 Bean 名称
    pub resolution_chain: Vec<(TypeId, String)>,
}

impl ResolveContext {
    /// 创建新的解析上下文
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加组件到解析链
    ///
    /// `dependency` 为链上最后一个组件正在解析的参数类型，组件已在链上时
    /// 返回以 `a -> b -> a` 形式描述循环的错误。
    pub fn push(&mut self, type_id: TypeId, name: &str, dependency: &TypeInfo) -> DependencyResult<()> {
        if let Some(start) = self.resolution_chain.iter().position(|(id, _)| *id == type_id) {
            let mut cycle: Vec<&str> = self.resolution_chain[start..]
                .iter()
                .map(|(_, n)| n.as_str())
                .collect();
            cycle.push(name);
            let owner = self
                .resolution_chain
                .last()
                .map_or(name, |(_, n)| n.as_str());
            return Err(DependencyError::unresolved(
                owner,
                dependency.name,
                format!("构造器循环依赖: {}", cycle.join(" -> ")),
            ));
        }
        self.resolution_chain.push((type_id, name.to_string()));
        Ok(())
    }

    /// 从解析链中移除最后一个组件
    pub fn pop(&mut self) {
        self.resolution_chain.pop();
    }

    /// 当前解析深度
    pub fn depth(&self) -> usize {
        self.resolution_chain.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_context_detects_cycle() {
        let mut ctx = ResolveContext::new();
        let a = TypeInfo::of::<u8>();
        let b = TypeInfo::of::<u16>();
        ctx.push(a.id, "a", &b).unwrap();
        ctx.push(b.id, "b", &a).unwrap();

        let err = ctx.push(a.id, "a", &a).unwrap_err();
        assert!(err.to_string().contains("a -> b -> a"));
        assert!(matches!(err, DependencyError::UnresolvedDependency { ref bean, .. } if bean == "b"));

        ctx.pop();
        assert_eq!(ctx.depth(), 1);
    }
}

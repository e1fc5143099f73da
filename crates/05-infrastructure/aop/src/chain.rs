//! 拦截链

use crate::matcher::AspectDescriptor;
use di_abstractions::{AdviceKind, JoinPoint};
use infrastructure_common::{BeanRef, InterceptionError};

/// 拦截链
///
/// 已按 order 升序排列。调用时先按链顺序执行全部前置通知，再执行目标调用，
/// 最后按链顺序执行全部后置通知；任一通知失败立即中止。
#[derive(Debug, Clone)]
pub struct InterceptorChain {
    identifier: String,
    entries: Vec<AspectDescriptor>,
}

impl InterceptorChain {
    /// 创建拦截链，`entries` 需已排序
    pub fn new(identifier: impl Into<String>, entries: Vec<AspectDescriptor>) -> Self {
        Self {
            identifier: identifier.into(),
            entries,
        }
    }

    /// 方法标识符
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// 链上所有通知
    pub fn entries(&self) -> &[AspectDescriptor] {
        &self.entries
    }

    /// 前置通知，按链顺序
    pub fn before(&self) -> impl Iterator<Item = &AspectDescriptor> {
        self.of_kind(AdviceKind::Before)
    }

    /// 后置通知，按链顺序
    pub fn after(&self) -> impl Iterator<Item = &AspectDescriptor> {
        self.of_kind(AdviceKind::After)
    }

    fn of_kind(&self, kind: AdviceKind) -> impl Iterator<Item = &AspectDescriptor> {
        self.entries.iter().filter(move |e| e.kind() == kind)
    }

    /// 通知数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否为空链
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 用拦截链包裹目标调用
    pub fn invoke<R, F>(&self, target: Option<BeanRef>, call: F) -> Result<R, InterceptionError>
    where
        F: FnOnce() -> R,
    {
        let mut join_point = JoinPoint::new(self.identifier.as_str());
        if let Some(target) = target {
            join_point = join_point.with_target(target);
        }

        for advice in self.before() {
            advice.apply(&join_point)?;
        }
        let result = call();
        for advice in self.after() {
            advice.apply(&join_point)?;
        }

        Ok(result)
    }
}

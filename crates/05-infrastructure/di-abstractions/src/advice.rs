//! 切面通知声明
//!
//! 切面组件在描述符中声明通知方法，由切面引擎建立索引并按顺序调用。

use infrastructure_common::{BeanRef, BoxError};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 通知类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdviceKind {
    /// 目标调用之前执行
    Before,
    /// 目标调用之后执行
    After,
}

impl fmt::Display for AdviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Before => f.write_str("before"),
            Self::After => f.write_str("after"),
        }
    }
}

/// 连接点
///
/// 描述一次被拦截的方法调用，标识符格式为 `<声明类型>.<方法名>`。
#[derive(Clone)]
pub struct JoinPoint {
    identifier: String,
    target: Option<BeanRef>,
}

impl JoinPoint {
    /// 创建连接点
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            target: None,
        }
    }

    /// 附加目标实例
    #[must_use]
    pub fn with_target(mut self, target: BeanRef) -> Self {
        self.target = Some(target);
        self
    }

    /// 完整方法标识符
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// 声明类型，例如 `app.service.UserService`
    pub fn declaring_type(&self) -> &str {
        self.identifier
            .rsplit_once('.')
            .map_or("", |(declaring, _)| declaring)
    }

    /// 方法名
    pub fn method_name(&self) -> &str {
        self.identifier
            .rsplit_once('.')
            .map_or(self.identifier.as_str(), |(_, method)| method)
    }

    /// 目标实例
    pub fn target(&self) -> Option<&BeanRef> {
        self.target.as_ref()
    }

    /// 以具体类型访问目标实例
    pub fn target_as<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.target.as_ref()?.downcast_ref::<T>()
    }
}

impl fmt::Debug for JoinPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JoinPoint")
            .field("identifier", &self.identifier)
            .field("has_target", &self.target.is_some())
            .finish()
    }
}

/// 类型擦除后的通知函数，第一个参数为切面实例
pub type AdviceFn = Arc<dyn Fn(&BeanRef, &JoinPoint) -> Result<(), BoxError> + Send + Sync>;

/// 通知声明
#[derive(Clone)]
pub struct AdviceDeclaration {
    method: String,
    pointcut: String,
    kind: AdviceKind,
    action: AdviceFn,
}

impl AdviceDeclaration {
    /// 创建通知声明
    pub fn new(
        method: impl Into<String>,
        pointcut: impl Into<String>,
        kind: AdviceKind,
        action: AdviceFn,
    ) -> Self {
        Self {
            method: method.into(),
            pointcut: pointcut.into(),
            kind,
            action,
        }
    }

    /// 通知方法名
    pub fn method(&self) -> &str {
        &self.method
    }

    /// 切点表达式
    pub fn pointcut(&self) -> &str {
        &self.pointcut
    }

    /// 通知类型
    pub fn kind(&self) -> AdviceKind {
        self.kind
    }

    /// 在切面实例上执行通知
    pub fn invoke(&self, aspect: &BeanRef, join_point: &JoinPoint) -> Result<(), BoxError> {
        (self.action)(aspect, join_point)
    }
}

impl fmt::Debug for AdviceDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdviceDeclaration")
            .field("method", &self.method)
            .field("pointcut", &self.pointcut)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// 切面元数据
#[derive(Debug, Clone, Default)]
pub struct AspectMetadata {
    /// 执行顺序，数值越小越先执行
    pub order: i32,
    /// 按声明顺序排列的通知
    pub advice: Vec<AdviceDeclaration>,
}

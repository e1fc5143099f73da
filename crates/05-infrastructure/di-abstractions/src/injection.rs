//! 注入槽位
//!
//! 字段注入点在组件内部以一次性写入的槽位表示，容器在所有实例创建完成后
//! 写入依赖或配置值，之后只读。

use infrastructure_common::{BeanRef, Bindable, DependencyError, DependencyResult};
use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::Arc;

/// 依赖注入槽位
///
/// `T` 可以是具体类型，也可以是 trait object，例如 `Autowired<dyn UserRepository>`。
pub struct Autowired<T: ?Sized> {
    cell: OnceCell<Arc<T>>,
}

impl<T: ?Sized> Autowired<T> {
    /// 创建空槽位
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// 获取已注入的依赖
    pub fn get(&self) -> Option<&Arc<T>> {
        self.cell.get()
    }

    /// 是否已注入
    pub fn is_injected(&self) -> bool {
        self.cell.get().is_some()
    }

    /// 写入依赖，已注入时不覆盖并返回 `false`
    pub fn inject(&self, value: Arc<T>) -> bool {
        self.cell.set(value).is_ok()
    }
}

impl<T: ?Sized> Default for Autowired<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for Autowired<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Autowired")
            .field("type", &std::any::type_name::<T>())
            .field("injected", &self.is_injected())
            .finish()
    }
}

/// 配置值注入槽位
pub struct Value<T: Bindable> {
    cell: OnceCell<T>,
}

impl<T: Bindable> Value<T> {
    /// 创建空槽位
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// 获取已绑定的值
    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    /// 是否已绑定
    pub fn is_bound(&self) -> bool {
        self.cell.get().is_some()
    }

    /// 写入配置值，已绑定时不覆盖并返回 `false`
    pub fn set(&self, value: T) -> bool {
        self.cell.set(value).is_ok()
    }
}

impl<T: Bindable + Clone> Value<T> {
    /// 获取值的副本，未绑定时返回默认值
    pub fn get_or(&self, default: T) -> T {
        self.cell.get().cloned().unwrap_or(default)
    }
}

impl<T: Bindable> Default for Value<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Bindable + fmt::Debug> fmt::Debug for Value<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Value").field(&self.cell.get()).finish()
    }
}

/// 构造器参数
///
/// 参数按声明顺序排列，每个参数都是目标类型的句柄。
#[derive(Clone)]
pub struct ConstructorArgs {
    bean: String,
    values: Vec<BeanRef>,
}

impl ConstructorArgs {
    /// 创建构造器参数
    pub fn new(bean: impl Into<String>, values: Vec<BeanRef>) -> Self {
        Self {
            bean: bean.into(),
            values,
        }
    }

    /// 按下标获取参数
    pub fn get<T: ?Sized + 'static>(&self, index: usize) -> DependencyResult<Arc<T>> {
        let expected = std::any::type_name::<T>();
        let handle = self.values.get(index).ok_or_else(|| {
            DependencyError::unresolved(
                &self.bean,
                expected,
                format!("构造参数下标越界: {index} (共 {} 个)", self.values.len()),
            )
        })?;

        handle
            .downcast_ref::<Arc<T>>()
            .cloned()
            .ok_or_else(|| DependencyError::BeanTypeMismatch {
                bean: self.bean.clone(),
                expected: expected.to_string(),
            })
    }

    /// 参数数量
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// 是否没有参数
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for ConstructorArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorArgs")
            .field("bean", &self.bean)
            .field("len", &self.values.len())
            .finish()
    }
}

//! 元数据定义
//!
//! 提供组件和类型的元数据信息

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// 类型信息
///
/// 同时支持具体类型和 trait object（`dyn Trait`），相等性仅由 [`TypeId`] 决定。
#[derive(Debug, Clone, Copy)]
pub struct TypeInfo {
    /// 类型ID
    pub id: TypeId,
    /// 完整类型名称
    pub name: &'static str,
}

impl TypeInfo {
    /// 从类型获取类型信息
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// 获取简短的类型名称（不包含模块路径和泛型参数）
    pub fn short_name(&self) -> &'static str {
        let path = self.base_path();
        path.rsplit("::").next().unwrap_or(path)
    }

    /// 获取模块路径（不包含类型名称本身）
    pub fn module_path(&self) -> &'static str {
        let path = self.base_path();
        path.rfind("::").map_or("", |pos| &path[..pos])
    }

    /// 以点号分隔的完整路径，例如 `app::service::UserService` -> `app.service.UserService`
    pub fn dotted_path(&self) -> String {
        self.base_path().replace("::", ".")
    }

    /// 泛型参数部分，例如 `Wrapper<u8>` -> `<u8>`，非泛型类型返回空串
    pub fn generic_args(&self) -> &'static str {
        let name = self.unqualified();
        name.find('<').map_or("", |pos| &name[pos..])
    }

    /// 是否为 trait object
    pub fn is_trait_object(&self) -> bool {
        self.name.starts_with("dyn ")
    }

    fn unqualified(&self) -> &'static str {
        let name = self.name.strip_prefix("dyn ").unwrap_or(self.name);
        name.split(" + ").next().unwrap_or(name)
    }

    fn base_path(&self) -> &'static str {
        let name = self.unqualified();
        name.find('<').map_or(name, |pos| &name[..pos])
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeInfo {}

impl Hash for TypeInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

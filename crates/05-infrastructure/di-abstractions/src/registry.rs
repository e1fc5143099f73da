//! Bean 注册表抽象接口

use crate::descriptor::ComponentDescriptor;
use infrastructure_common::{
    BeanRef, DependencyError, DependencyResult, InfrastructureResult, Stereotype, TypeInfo,
};
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Bean 标识，等于注册序号
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BeanId(pub usize);

impl fmt::Display for BeanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 容器持有的单例
pub struct Bean {
    id: BeanId,
    name: String,
    instance: BeanRef,
    descriptor: Arc<ComponentDescriptor>,
}

impl Bean {
    /// 创建 Bean
    pub fn new(
        id: BeanId,
        name: impl Into<String>,
        instance: BeanRef,
        descriptor: Arc<ComponentDescriptor>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            instance,
            descriptor,
        }
    }

    /// Bean 标识
    pub fn id(&self) -> BeanId {
        self.id
    }

    /// Bean 名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 具体类型
    pub fn type_info(&self) -> TypeInfo {
        self.descriptor.type_info()
    }

    /// 构造型
    pub fn stereotype(&self) -> Stereotype {
        self.descriptor.stereotype()
    }

    /// 实例
    pub fn instance(&self) -> &BeanRef {
        &self.instance
    }

    /// 组件描述符
    pub fn descriptor(&self) -> &Arc<ComponentDescriptor> {
        &self.descriptor
    }

    /// 能力集合
    pub fn capabilities(&self) -> impl Iterator<Item = TypeInfo> + '_ {
        self.descriptor.capabilities().iter().map(|c| c.type_info())
    }

    /// 具体类型或能力集合是否匹配
    pub fn matches_type(&self, type_id: TypeId) -> bool {
        self.descriptor.provides(type_id)
    }

    /// 获取目标类型的句柄，句柄内为 `Arc<T>`
    pub fn handle_for(&self, type_id: TypeId) -> Option<BeanRef> {
        self.descriptor.handle_for(&self.instance, type_id)
    }

    /// 以具体类型获取实例
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.instance).downcast::<T>().ok()
    }

    /// 以具体类型或能力类型获取实例，例如 `bean.get_as::<dyn UserRepository>()`
    pub fn get_as<T: ?Sized + 'static>(&self) -> DependencyResult<Arc<T>> {
        self.handle_for(TypeId::of::<T>())
            .and_then(|handle| handle.downcast_ref::<Arc<T>>().cloned())
            .ok_or_else(|| DependencyError::BeanTypeMismatch {
                bean: self.name.clone(),
                expected: std::any::type_name::<T>().to_string(),
            })
    }
}

impl fmt::Debug for Bean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bean")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("type", &self.type_info().name)
            .field("stereotype", &self.stereotype())
            .finish()
    }
}

/// Bean 注册表 trait
///
/// 注册仅发生在容器启动阶段，启动完成后注册表只读。
pub trait BeanRegistry: Send + Sync {
    /// 注册组件并创建唯一实例
    fn register(&mut self, descriptor: Arc<ComponentDescriptor>) -> InfrastructureResult<BeanId>;

    /// 按名称获取
    fn get_by_name(&self, name: &str) -> DependencyResult<Arc<Bean>>;

    /// 按类型获取，要求唯一匹配
    fn get_by_type(&self, type_info: &TypeInfo) -> DependencyResult<Arc<Bean>>;

    /// 按类型查找第一个匹配：先精确类型，再按注册顺序查找能力匹配
    fn find_first_by_type(&self, type_info: &TypeInfo) -> Option<Arc<Bean>>;

    /// 所有匹配类型的 Bean，按注册顺序
    fn beans_of_type(&self, type_info: &TypeInfo) -> Vec<Arc<Bean>>;

    /// 所有 Bean，按注册顺序
    fn all_beans(&self) -> Vec<Arc<Bean>>;

    /// 是否包含该名称
    fn contains(&self, name: &str) -> bool;

    /// 所有 Bean 名称，按注册顺序
    fn bean_names(&self) -> Vec<String>;

    /// Bean 数量
    fn len(&self) -> usize;

    /// 是否为空
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl dyn BeanRegistry + '_ {
    /// 按类型获取唯一实例
    pub fn get<T: ?Sized + 'static>(&self) -> DependencyResult<Arc<T>> {
        self.get_by_type(&TypeInfo::of::<T>())?.get_as::<T>()
    }
}

//! 组件描述符
//!
//! 组件的类型身份、构造型、构造器、注入点、能力集合和切面声明都通过
//! [`ComponentDescriptor`] 显式描述，容器只消费描述符，不检查运行时类型元数据。

use crate::advice::{AdviceDeclaration, AdviceFn, AdviceKind, AspectMetadata, JoinPoint};
use crate::injection::{Autowired, ConstructorArgs, Value};
use infrastructure_common::{
    BeanRef, Bindable, BoxError, ComponentError, ComponentResult, Stereotype, TypeInfo,
    TypedValue, ValueKind,
};
use std::any::{Any, TypeId};
use std::collections::HashSet;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// 实例工厂
pub type InstanceFactory =
    Arc<dyn Fn(&ConstructorArgs) -> Result<BeanRef, BoxError> + Send + Sync>;

/// 能力转换函数，把组件实例转换为某一类型的句柄
pub type CapabilityCaster = Arc<dyn Fn(BeanRef) -> Option<BeanRef> + Send + Sync>;

type SlotProbe = Arc<dyn Fn(&BeanRef) -> Option<bool> + Send + Sync>;
type DependencyWrite = Arc<dyn Fn(&BeanRef, BeanRef) -> Option<bool> + Send + Sync>;
type ValueWrite = Arc<dyn Fn(&BeanRef, TypedValue) -> Option<bool> + Send + Sync>;

/// 组件定义
///
/// 组件类型实现该 trait 即可加入静态注册表。
pub trait ComponentDefinition: Any + Send + Sync {
    /// 生成组件描述符
    fn component_descriptor() -> ComponentDescriptor;
}

/// 注入点类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InjectionKind {
    /// 字段依赖
    DependencyField,
    /// 构造器参数依赖
    DependencyConstructorParam,
    /// 配置值字段
    ValueField,
}

/// 依赖字段槽位访问器
#[derive(Clone)]
pub struct DependencySlot {
    probe: SlotProbe,
    write: DependencyWrite,
}

impl DependencySlot {
    /// 字段是否已注入，实例类型不符时返回 `None`
    pub fn is_filled(&self, instance: &BeanRef) -> Option<bool> {
        (self.probe)(instance)
    }

    /// 写入依赖句柄，已注入时返回 `Some(false)`，类型不符时返回 `None`
    pub fn fill(&self, instance: &BeanRef, handle: BeanRef) -> Option<bool> {
        (self.write)(instance, handle)
    }
}

/// 配置值字段槽位访问器
#[derive(Clone)]
pub struct ValueSlot {
    probe: SlotProbe,
    write: ValueWrite,
}

impl ValueSlot {
    /// 字段是否已绑定
    pub fn is_filled(&self, instance: &BeanRef) -> Option<bool> {
        (self.probe)(instance)
    }

    /// 写入配置值
    pub fn fill(&self, instance: &BeanRef, value: TypedValue) -> Option<bool> {
        (self.write)(instance, value)
    }
}

/// 注入点
#[derive(Clone)]
pub enum InjectionPoint {
    /// 字段依赖
    DependencyField {
        name: String,
        target: TypeInfo,
        slot: DependencySlot,
    },
    /// 构造器参数依赖
    ConstructorParam { name: String, target: TypeInfo },
    /// 配置值字段
    ValueField {
        name: String,
        key: String,
        kind: ValueKind,
        slot: ValueSlot,
    },
}

impl InjectionPoint {
    /// 注入点类型
    pub fn kind(&self) -> InjectionKind {
        match self {
            Self::DependencyField { .. } => InjectionKind::DependencyField,
            Self::ConstructorParam { .. } => InjectionKind::DependencyConstructorParam,
            Self::ValueField { .. } => InjectionKind::ValueField,
        }
    }

    /// 注入点名称
    pub fn name(&self) -> &str {
        match self {
            Self::DependencyField { name, .. }
            | Self::ConstructorParam { name, .. }
            | Self::ValueField { name, .. } => name,
        }
    }

    /// 依赖的目标类型，配置值字段返回 `None`
    pub fn target_type(&self) -> Option<TypeInfo> {
        match self {
            Self::DependencyField { target, .. } | Self::ConstructorParam { target, .. } => {
                Some(*target)
            }
            Self::ValueField { .. } => None,
        }
    }
}

impl fmt::Debug for InjectionPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DependencyField { name, target, .. } => f
                .debug_struct("DependencyField")
                .field("name", name)
                .field("target", &target.name)
                .finish(),
            Self::ConstructorParam { name, target } => f
                .debug_struct("ConstructorParam")
                .field("name", name)
                .field("target", &target.name)
                .finish(),
            Self::ValueField {
                name, key, kind, ..
            } => f
                .debug_struct("ValueField")
                .field("name", name)
                .field("key", key)
                .field("kind", kind)
                .finish(),
        }
    }
}

/// 构造器声明
#[derive(Clone)]
pub struct ConstructorSpec {
    params: Vec<InjectionPoint>,
    designated: bool,
    factory: InstanceFactory,
}

impl ConstructorSpec {
    /// 参数注入点
    pub fn params(&self) -> &[InjectionPoint] {
        &self.params
    }

    /// 参数类型
    pub fn param_types(&self) -> impl Iterator<Item = TypeInfo> + '_ {
        self.params.iter().filter_map(InjectionPoint::target_type)
    }

    /// 是否被显式指定为注入构造器
    pub fn is_designated(&self) -> bool {
        self.designated
    }

    /// 调用构造器
    pub fn instantiate(&self, args: &ConstructorArgs) -> Result<BeanRef, BoxError> {
        (self.factory)(args)
    }

    /// 选择构造器
    ///
    /// 1. 唯一被指定的注入构造器，多个则报错
    /// 2. 参数最多的有参构造器，参数数相同取先声明者
    /// 3. 无参构造器
    pub fn select<'a>(
        constructors: &'a [ConstructorSpec],
        type_info: &TypeInfo,
    ) -> ComponentResult<&'a ConstructorSpec> {
        let mut designated = constructors.iter().filter(|c| c.designated);
        if let Some(first) = designated.next() {
            if designated.next().is_some() {
                return Err(ComponentError::AmbiguousConstructor {
                    type_name: type_info.name.to_string(),
                });
            }
            return Ok(first);
        }

        let widest = constructors
            .iter()
            .filter(|c| !c.params.is_empty())
            .fold(None::<&ConstructorSpec>, |best, c| match best {
                Some(b) if b.params.len() >= c.params.len() => Some(b),
                _ => Some(c),
            });

        widest
            .or_else(|| constructors.iter().find(|c| c.params.is_empty()))
            .ok_or_else(|| ComponentError::NoUsableConstructor {
                type_name: type_info.name.to_string(),
            })
    }
}

impl fmt::Debug for ConstructorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorSpec")
            .field("params", &self.params)
            .field("designated", &self.designated)
            .finish_non_exhaustive()
    }
}

/// 能力集合中的一项
#[derive(Clone)]
pub struct Capability {
    type_info: TypeInfo,
    cast: CapabilityCaster,
}

impl Capability {
    /// 能力类型
    pub fn type_info(&self) -> TypeInfo {
        self.type_info
    }

    /// 将实例转换为该能力的句柄
    pub fn cast(&self, instance: BeanRef) -> Option<BeanRef> {
        (self.cast)(instance)
    }
}

impl fmt::Debug for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_info.name)
    }
}

/// 组件描述符
///
/// 由发现机制产生，产生后不可变。
#[derive(Clone)]
pub struct ComponentDescriptor {
    type_info: TypeInfo,
    stereotype: Stereotype,
    name: Option<String>,
    constructors: Vec<ConstructorSpec>,
    fields: Vec<InjectionPoint>,
    self_cast: CapabilityCaster,
    capabilities: Vec<Capability>,
    aspect: Option<AspectMetadata>,
    problems: Vec<String>,
}

impl ComponentDescriptor {
    /// 创建组件描述符构建器
    pub fn builder<C: Any + Send + Sync>(stereotype: Stereotype) -> ComponentDescriptorBuilder<C> {
        ComponentDescriptorBuilder::new(stereotype)
    }

    /// 组件类型
    pub fn type_info(&self) -> TypeInfo {
        self.type_info
    }

    /// 构造型
    pub fn stereotype(&self) -> Stereotype {
        self.stereotype
    }

    /// 显式指定的名称
    pub fn explicit_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// 声明的构造器
    pub fn constructors(&self) -> &[ConstructorSpec] {
        &self.constructors
    }

    /// 选择用于实例化的构造器
    pub fn select_constructor(&self) -> ComponentResult<&ConstructorSpec> {
        ConstructorSpec::select(&self.constructors, &self.type_info)
    }

    /// 字段注入点，按声明顺序
    pub fn fields(&self) -> &[InjectionPoint] {
        &self.fields
    }

    /// 能力集合
    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    /// 是否以具体类型或能力的形式提供该类型
    pub fn provides(&self, type_id: TypeId) -> bool {
        self.type_info.id == type_id || self.has_capability(type_id)
    }

    /// 能力集合是否包含该类型
    pub fn has_capability(&self, type_id: TypeId) -> bool {
        self.capabilities.iter().any(|c| c.type_info.id == type_id)
    }

    /// 将实例转换为目标类型的句柄（句柄内为 `Arc<T>`）
    pub fn handle_for(&self, instance: &BeanRef, type_id: TypeId) -> Option<BeanRef> {
        if self.type_info.id == type_id {
            return (self.self_cast)(Arc::clone(instance));
        }
        self.capabilities
            .iter()
            .find(|c| c.type_info.id == type_id)
            .and_then(|c| c.cast(Arc::clone(instance)))
    }

    /// 切面元数据，非切面组件返回 `None`
    pub fn aspect(&self) -> Option<&AspectMetadata> {
        self.aspect.as_ref()
    }

    /// 校验描述符
    pub fn validate(&self) -> ComponentResult<()> {
        if self.problems.is_empty() {
            return Ok(());
        }
        Err(ComponentError::InvalidMetadata {
            message: format!("{}: {}", self.type_info.name, self.problems.join("; ")),
        })
    }
}

impl fmt::Debug for ComponentDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentDescriptor")
            .field("type", &self.type_info.name)
            .field("stereotype", &self.stereotype)
            .field("name", &self.name)
            .field("constructors", &self.constructors)
            .field("fields", &self.fields)
            .field("capabilities", &self.capabilities)
            .field("aspect", &self.aspect)
            .finish()
    }
}

/// 组件描述符构建器
pub struct ComponentDescriptorBuilder<C> {
    stereotype: Stereotype,
    name: Option<String>,
    constructors: Vec<ConstructorSpec>,
    pending_params: Vec<InjectionPoint>,
    fields: Vec<InjectionPoint>,
    capabilities: Vec<Capability>,
    order: i32,
    advice: Vec<AdviceDeclaration>,
    _marker: PhantomData<fn() -> C>,
}

impl<C: Any + Send + Sync> ComponentDescriptorBuilder<C> {
    fn new(stereotype: Stereotype) -> Self {
        Self {
            stereotype,
            name: None,
            constructors: Vec::new(),
            pending_params: Vec::new(),
            fields: Vec::new(),
            capabilities: Vec::new(),
            order: 0,
            advice: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// 指定 Bean 名称
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// 声明无参构造器
    #[must_use]
    pub fn default_constructor<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> C + Send + Sync + 'static,
    {
        self.constructors.push(ConstructorSpec {
            params: Vec::new(),
            designated: false,
            factory: Arc::new(move |_: &ConstructorArgs| -> Result<BeanRef, BoxError> {
                Ok(Arc::new(factory()) as BeanRef)
            }),
        });
        self
    }

    /// 为下一个构造器声明参数
    #[must_use]
    pub fn constructor_param<T: ?Sized + 'static>(mut self, name: impl Into<String>) -> Self {
        self.pending_params.push(InjectionPoint::ConstructorParam {
            name: name.into(),
            target: TypeInfo::of::<T>(),
        });
        self
    }

    /// 声明构造器，使用之前声明的参数
    #[must_use]
    pub fn constructor<F>(self, factory: F) -> Self
    where
        F: Fn(&ConstructorArgs) -> Result<C, BoxError> + Send + Sync + 'static,
    {
        self.push_constructor(false, factory)
    }

    /// 声明注入构造器，实例化时优先使用
    #[must_use]
    pub fn autowired_constructor<F>(self, factory: F) -> Self
    where
        F: Fn(&ConstructorArgs) -> Result<C, BoxError> + Send + Sync + 'static,
    {
        self.push_constructor(true, factory)
    }

    fn push_constructor<F>(mut self, designated: bool, factory: F) -> Self
    where
        F: Fn(&ConstructorArgs) -> Result<C, BoxError> + Send + Sync + 'static,
    {
        let params = std::mem::take(&mut self.pending_params);
        self.constructors.push(ConstructorSpec {
            params,
            designated,
            factory: Arc::new(move |args: &ConstructorArgs| {
                factory(args).map(|c| Arc::new(c) as BeanRef)
            }),
        });
        self
    }

    /// 声明依赖字段
    #[must_use]
    pub fn autowired<T>(mut self, name: impl Into<String>, accessor: fn(&C) -> &Autowired<T>) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let probe: SlotProbe = Arc::new(move |instance: &BeanRef| {
            instance
                .downcast_ref::<C>()
                .map(|c| accessor(c).is_injected())
        });
        let write: DependencyWrite = Arc::new(move |instance: &BeanRef, handle: BeanRef| {
            let component = instance.downcast_ref::<C>()?;
            let value = handle.downcast_ref::<Arc<T>>()?;
            Some(accessor(component).inject(Arc::clone(value)))
        });

        self.fields.push(InjectionPoint::DependencyField {
            name: name.into(),
            target: TypeInfo::of::<T>(),
            slot: DependencySlot { probe, write },
        });
        self
    }

    /// 声明配置值字段
    #[must_use]
    pub fn value<V: Bindable>(
        mut self,
        name: impl Into<String>,
        key: impl Into<String>,
        accessor: fn(&C) -> &Value<V>,
    ) -> Self {
        let probe: SlotProbe = Arc::new(move |instance: &BeanRef| {
            instance.downcast_ref::<C>().map(|c| accessor(c).is_bound())
        });
        let write: ValueWrite = Arc::new(move |instance: &BeanRef, value: TypedValue| {
            let component = instance.downcast_ref::<C>()?;
            let value = V::from_typed(value)?;
            Some(accessor(component).set(value))
        });

        self.fields.push(InjectionPoint::ValueField {
            name: name.into(),
            key: key.into(),
            kind: V::KIND,
            slot: ValueSlot { probe, write },
        });
        self
    }

    /// 声明组件实现的能力，通常传入 `|c| c as Arc<dyn Trait>`
    #[must_use]
    pub fn capability<T, F>(mut self, cast: F) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(Arc<C>) -> Arc<T> + Send + Sync + 'static,
    {
        let caster: CapabilityCaster = Arc::new(move |instance: BeanRef| {
            let component = instance.downcast::<C>().ok()?;
            Some(Arc::new(cast(component)) as BeanRef)
        });
        self.capabilities.push(Capability {
            type_info: TypeInfo::of::<T>(),
            cast: caster,
        });
        self
    }

    /// 标记为切面并指定执行顺序
    #[must_use]
    pub fn aspect(mut self, order: i32) -> Self {
        self.stereotype = Stereotype::Aspect;
        self.order = order;
        self
    }

    /// 声明前置通知
    #[must_use]
    pub fn before<F>(self, method: impl Into<String>, pointcut: impl Into<String>, advice: F) -> Self
    where
        F: Fn(&C, &JoinPoint) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.push_advice(AdviceKind::Before, method.into(), pointcut.into(), advice)
    }

    /// 声明后置通知
    #[must_use]
    pub fn after<F>(self, method: impl Into<String>, pointcut: impl Into<String>, advice: F) -> Self
    where
        F: Fn(&C, &JoinPoint) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.push_advice(AdviceKind::After, method.into(), pointcut.into(), advice)
    }

    fn push_advice<F>(mut self, kind: AdviceKind, method: String, pointcut: String, advice: F) -> Self
    where
        F: Fn(&C, &JoinPoint) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        let aspect_type = std::any::type_name::<C>();
        let action: AdviceFn = Arc::new(
            move |instance: &BeanRef, join_point: &JoinPoint| -> Result<(), BoxError> {
                let aspect = instance
                    .downcast_ref::<C>()
                    .ok_or_else(|| format!("切面实例类型不匹配: {aspect_type}"))?;
                advice(aspect, join_point)
            },
        );
        self.advice
            .push(AdviceDeclaration::new(method, pointcut, kind, action));
        self
    }

    /// 构建描述符
    ///
    /// 元数据问题（多余的构造参数、重名注入点、非切面组件声明通知）不会在此报错，
    /// 而是在注册时由 [`ComponentDescriptor::validate`] 统一报告。
    pub fn build(self) -> ComponentDescriptor {
        let type_info = TypeInfo::of::<C>();
        let mut problems = Vec::new();

        if !self.pending_params.is_empty() {
            problems.push(format!(
                "构造参数 {:?} 之后没有声明构造器",
                self.pending_params
                    .iter()
                    .map(InjectionPoint::name)
                    .collect::<Vec<_>>()
            ));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name()) {
                problems.push(format!("注入点名称重复: {}", field.name()));
            }
        }

        let mut capability_ids = HashSet::new();
        for capability in &self.capabilities {
            if capability.type_info == type_info || !capability_ids.insert(capability.type_info.id) {
                problems.push(format!("能力声明重复: {}", capability.type_info.name));
            }
        }

        let aspect = if self.stereotype.is_aspect() {
            Some(AspectMetadata {
                order: self.order,
                advice: self.advice,
            })
        } else {
            if !self.advice.is_empty() {
                problems.push("非切面组件不能声明通知".to_string());
            }
            None
        };

        ComponentDescriptor {
            type_info,
            stereotype: self.stereotype,
            name: self.name,
            constructors: self.constructors,
            fields: self.fields,
            self_cast: Arc::new(|instance: BeanRef| {
                let component = instance.downcast::<C>().ok()?;
                Some(Arc::new(component) as BeanRef)
            }),
            capabilities: self.capabilities,
            aspect,
            problems,
        }
    }
}

//! 默认 Bean 注册表实现

use di_abstractions::{Bean, BeanId, BeanRegistry, ComponentDescriptor, ConstructorArgs};
use infrastructure_common::{
    BeanRef, ComponentError, DependencyError, DependencyResult, InfrastructureResult,
    NamingConventions, TypeInfo,
};
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// 默认 Bean 注册表
///
/// 按名称、具体类型和能力类型建立索引，所有 Bean 按注册顺序保存。
#[derive(Debug, Default)]
pub struct DefaultBeanRegistry {
    beans: Vec<Arc<Bean>>,
    by_name: HashMap<String, usize>,
    by_type: HashMap<TypeId, usize>,
    by_capability: HashMap<TypeId, Vec<usize>>,
}

impl DefaultBeanRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 确定 Bean 名称
    ///
    /// 显式名称被占用时直接报错；默认名称被占用时退回带模块路径的名称，
    /// 仍被占用才报错。
    fn assign_name(&self, descriptor: &ComponentDescriptor) -> Result<String, ComponentError> {
        let type_info = descriptor.type_info();

        if let Some(name) = descriptor.explicit_name() {
            return match self.by_name.get(name) {
                Some(&existing) => Err(self.duplicate_name(name, existing, &type_info)),
                None => Ok(name.to_string()),
            };
        }

        let default_name = NamingConventions::default_bean_name(&type_info);
        let Some(&existing) = self.by_name.get(&default_name) else {
            return Ok(default_name);
        };

        let qualified = NamingConventions::qualified_bean_name(&type_info);
        debug!(
            "默认名称 {} 已被 {} 使用，改用 {}",
            default_name,
            self.beans[existing].type_info(),
            qualified
        );
        match self.by_name.get(&qualified) {
            Some(&existing) => Err(self.duplicate_name(&qualified, existing, &type_info)),
            None => Ok(qualified),
        }
    }

    fn duplicate_name(&self, name: &str, existing: usize, type_info: &TypeInfo) -> ComponentError {
        ComponentError::DuplicateBeanName {
            name: name.to_string(),
            existing: self.beans[existing].type_info().name.to_string(),
            type_name: type_info.name.to_string(),
        }
    }

    /// 为构造器参数解析句柄
    fn resolve_argument(&self, owner: &str, target: &TypeInfo) -> DependencyResult<BeanRef> {
        let bean = self.find_first_by_type(target).ok_or_else(|| {
            DependencyError::unresolved(owner, target.name, "没有匹配的 Bean")
        })?;

        bean.handle_for(target.id)
            .ok_or_else(|| DependencyError::BeanTypeMismatch {
                bean: bean.name().to_string(),
                expected: target.name.to_string(),
            })
    }

    fn candidate_names(&self, indexes: &[usize]) -> Vec<String> {
        indexes
            .iter()
            .map(|&i| self.beans[i].name().to_string())
            .collect()
    }
}

impl BeanRegistry for DefaultBeanRegistry {
    fn register(&mut self, descriptor: Arc<ComponentDescriptor>) -> InfrastructureResult<BeanId> {
        descriptor.validate()?;
        let type_info = descriptor.type_info();

        if self.by_type.contains_key(&type_info.id) {
            return Err(ComponentError::DuplicateComponentType {
                type_name: type_info.name.to_string(),
            }
            .into());
        }

        let name = self.assign_name(&descriptor)?;
        let constructor = descriptor.select_constructor()?;

        let mut args = Vec::with_capacity(constructor.params().len());
        for param_type in constructor.param_types() {
            debug!("解析构造参数: {} <- {}", name, param_type);
            args.push(self.resolve_argument(&name, &param_type)?);
        }

        let instance = constructor
            .instantiate(&ConstructorArgs::new(&name, args))
            .map_err(|source| ComponentError::ConstructionFailed {
                bean: name.clone(),
                type_name: type_info.name.to_string(),
                source,
            })?;

        let index = self.beans.len();
        let id = BeanId(index);
        for capability in descriptor.capabilities() {
            self.by_capability
                .entry(capability.type_info().id)
                .or_default()
                .push(index);
        }
        self.by_type.insert(type_info.id, index);
        self.by_name.insert(name.clone(), index);
        self.beans
            .push(Arc::new(Bean::new(id, name.clone(), instance, descriptor)));

        info!("注册 Bean: {} ({}) {}", name, type_info, id);
        Ok(id)
    }

    fn get_by_name(&self, name: &str) -> DependencyResult<Arc<Bean>> {
        self.by_name
            .get(name)
            .map(|&i| Arc::clone(&self.beans[i]))
            .ok_or_else(|| DependencyError::BeanNotFound {
                name: name.to_string(),
            })
    }

    fn get_by_type(&self, type_info: &TypeInfo) -> DependencyResult<Arc<Bean>> {
        if let Some(&index) = self.by_type.get(&type_info.id) {
            return Ok(Arc::clone(&self.beans[index]));
        }

        match self.by_capability.get(&type_info.id).map(Vec::as_slice) {
            Some([index]) => Ok(Arc::clone(&self.beans[*index])),
            Some(indexes) => Err(DependencyError::AmbiguousOrMissingBean {
                type_name: type_info.name.to_string(),
                candidates: self.candidate_names(indexes),
            }),
            None => Err(DependencyError::AmbiguousOrMissingBean {
                type_name: type_info.name.to_string(),
                candidates: Vec::new(),
            }),
        }
    }

    fn find_first_by_type(&self, type_info: &TypeInfo) -> Option<Arc<Bean>> {
        self.by_type
            .get(&type_info.id)
            .or_else(|| {
                self.by_capability
                    .get(&type_info.id)
                    .and_then(|indexes| indexes.first())
            })
            .map(|&i| Arc::clone(&self.beans[i]))
    }

    fn beans_of_type(&self, type_info: &TypeInfo) -> Vec<Arc<Bean>> {
        self.beans
            .iter()
            .filter(|bean| bean.matches_type(type_info.id))
            .cloned()
            .collect()
    }

    fn all_beans(&self) -> Vec<Arc<Bean>> {
        self.beans.clone()
    }

    fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    fn bean_names(&self) -> Vec<String> {
        self.beans.iter().map(|b| b.name().to_string()).collect()
    }

    fn len(&self) -> usize {
        self.beans.len()
    }
}

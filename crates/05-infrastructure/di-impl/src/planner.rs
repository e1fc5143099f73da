//! 构造器实例化规划
//!
//! 注册前根据描述符元数据确定注册顺序：构造器依赖先于依赖它的组件注册。
//! 没有构造器注入时顺序与描述符顺序一致。

use di_abstractions::{ComponentDescriptor, ResolveContext};
use infrastructure_common::{
    ComponentError, DependencyError, InfrastructureResult, NamingConventions, TypeInfo,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// 构造器依赖边：参数类型与提供该类型的描述符下标
type Edge = (TypeInfo, usize);

/// 实例化规划器
#[derive(Debug, Default)]
pub struct InstantiationPlanner;

impl InstantiationPlanner {
    /// 创建规划器
    pub fn new() -> Self {
        Self
    }

    /// 计算注册顺序
    ///
    /// 以描述符顺序深度优先遍历构造器依赖，输出后序序列。参数没有候选、
    /// 唯一候选为自身或存在循环时返回 [`DependencyError::UnresolvedDependency`]。
    ///
    /// 规划只决定注册顺序。能力类型参数的候选按描述符顺序选取，但实际注入的是
    /// 注册时已注册的第一个匹配者，两者可能不同，日志中输出的是后者。
    pub fn plan(
        &self,
        descriptors: Vec<Arc<ComponentDescriptor>>,
    ) -> InfrastructureResult<Vec<Arc<ComponentDescriptor>>> {
        let mut by_type = HashMap::new();
        for (index, descriptor) in descriptors.iter().enumerate() {
            let type_info = descriptor.type_info();
            if by_type.insert(type_info.id, index).is_some() {
                return Err(ComponentError::DuplicateComponentType {
                    type_name: type_info.name.to_string(),
                }
                .into());
            }
        }

        let labels: Vec<String> = descriptors.iter().map(|d| Self::label(d)).collect();
        let mut edges = Vec::with_capacity(descriptors.len());
        for (index, descriptor) in descriptors.iter().enumerate() {
            edges.push(Self::edges_of(index, descriptor, &descriptors, &by_type, &labels)?);
        }

        let mut visited = vec![false; descriptors.len()];
        let mut order = Vec::with_capacity(descriptors.len());
        let mut ctx = ResolveContext::new();
        for index in 0..descriptors.len() {
            Self::visit(
                index,
                None,
                &descriptors,
                &edges,
                &labels,
                &mut visited,
                &mut ctx,
                &mut order,
            )?;
        }

        debug!(
            "实例化顺序: {}",
            order
                .iter()
                .map(|&i| labels[i].as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );

        let mut registered = Vec::with_capacity(order.len());
        for &index in &order {
            for (param_type, _) in &edges[index] {
                if let Some(provider) =
                    Self::registered_provider(param_type, &descriptors, &by_type, &registered)
                {
                    debug!("构造参数 {} <- {} ({})", labels[index], labels[provider], param_type);
                }
            }
            registered.push(index);
        }

        let mut slots: Vec<Option<Arc<ComponentDescriptor>>> =
            descriptors.into_iter().map(Some).collect();
        Ok(order.into_iter().filter_map(|i| slots[i].take()).collect())
    }

    fn label(descriptor: &ComponentDescriptor) -> String {
        descriptor.explicit_name().map_or_else(
            || NamingConventions::default_bean_name(&descriptor.type_info()),
            str::to_string,
        )
    }

    /// 注册表在注册时选中的提供者：精确类型优先，否则为已注册的第一个能力匹配者
    fn registered_provider(
        param_type: &TypeInfo,
        descriptors: &[Arc<ComponentDescriptor>],
        by_type: &HashMap<std::any::TypeId, usize>,
        registered: &[usize],
    ) -> Option<usize> {
        by_type.get(&param_type.id).copied().or_else(|| {
            registered
                .iter()
                .copied()
                .find(|&i| descriptors[i].has_capability(param_type.id))
        })
    }

    fn edges_of(
        index: usize,
        descriptor: &ComponentDescriptor,
        descriptors: &[Arc<ComponentDescriptor>],
        by_type: &HashMap<std::any::TypeId, usize>,
        labels: &[String],
    ) -> InfrastructureResult<Vec<Edge>> {
        let constructor = descriptor.select_constructor()?;
        let mut edges = Vec::new();

        for param_type in constructor.param_types() {
            let candidate = by_type.get(&param_type.id).copied().or_else(|| {
                descriptors
                    .iter()
                    .enumerate()
                    .find(|(i, d)| *i != index && d.has_capability(param_type.id))
                    .map(|(i, _)| i)
            });

            let reason = match candidate {
                Some(target) if target != index => {
                    edges.push((param_type, target));
                    continue;
                }
                Some(_) => "构造器依赖自身",
                None if descriptor.has_capability(param_type.id) => "构造器依赖自身",
                None => "没有匹配的组件",
            };
            return Err(DependencyError::unresolved(&labels[index], param_type.name, reason).into());
        }

        Ok(edges)
    }

    #[allow(clippy::too_many_arguments)]
    fn visit(
        index: usize,
        via: Option<&TypeInfo>,
        descriptors: &[Arc<ComponentDescriptor>],
        edges: &[Vec<Edge>],
        labels: &[String],
        visited: &mut [bool],
        ctx: &mut ResolveContext,
        order: &mut Vec<usize>,
    ) -> InfrastructureResult<()> {
        if visited[index] {
            return Ok(());
        }

        let type_info = descriptors[index].type_info();
        ctx.push(type_info.id, &labels[index], via.unwrap_or(&type_info))?;
        for (param_type, target) in &edges[index] {
            Self::visit(
                *target,
                Some(param_type),
                descriptors,
                edges,
                labels,
                visited,
                ctx,
                order,
            )?;
        }
        ctx.pop();

        visited[index] = true;
        order.push(index);
        Ok(())
    }
}

//! 静态组件发现
//!
//! 以注册表的形式列出组件，替代运行时扫描。

use di_abstractions::{ComponentDefinition, ComponentDescriptor, ComponentDiscovery};
use infrastructure_common::{ComponentError, ComponentResult};
use std::collections::HashSet;
use tracing::debug;

/// 描述符工厂
pub type DescriptorFactory = fn() -> ComponentDescriptor;

/// 静态组件发现器
#[derive(Debug, Clone)]
pub struct StaticDiscovery {
    name: String,
    entries: Vec<DescriptorFactory>,
}

impl StaticDiscovery {
    /// 创建发现器
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// 添加实现了 [`ComponentDefinition`] 的组件
    #[must_use]
    pub fn with<C: ComponentDefinition>(self) -> Self {
        self.with_factory(C::component_descriptor)
    }

    /// 添加描述符工厂
    #[must_use]
    pub fn with_factory(mut self, factory: DescriptorFactory) -> Self {
        self.entries.push(factory);
        self
    }

    /// 注册表项数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ComponentDiscovery for StaticDiscovery {
    fn discover(&self) -> ComponentResult<Vec<ComponentDescriptor>> {
        let mut seen = HashSet::new();
        let mut descriptors = Vec::with_capacity(self.entries.len());

        for factory in &self.entries {
            let descriptor = factory();
            let type_info = descriptor.type_info();
            if !seen.insert(type_info.id) {
                return Err(ComponentError::DiscoveryFailed {
                    discoverer: self.name.clone(),
                    message: format!("组件重复登记: {type_info}"),
                });
            }
            debug!("发现组件: {} ({})", type_info, descriptor.stereotype());
            descriptors.push(descriptor);
        }

        Ok(descriptors)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

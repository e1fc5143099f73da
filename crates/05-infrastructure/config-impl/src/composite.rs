//! 组合配置源

use config_abstractions::PropertySource;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, trace};

/// 组合配置源
///
/// 按优先级从高到低依次查找，第一个包含该键的配置源胜出。
/// 优先级相同的配置源保持添加顺序。
#[derive(Debug, Default, Clone)]
pub struct CompositePropertySource {
    sources: Vec<Arc<dyn PropertySource>>,
}

impl CompositePropertySource {
    /// 创建空的组合配置源
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加配置源
    pub fn add_source(&mut self, source: Arc<dyn PropertySource>) {
        debug!(
            "添加配置源: {} (优先级: {})",
            source.name(),
            source.priority()
        );
        self.sources.push(source);
        // 稳定排序，保证同优先级按添加顺序
        self.sources
            .sort_by(|a, b| b.priority().cmp(&a.priority()));
    }

    /// 链式添加配置源
    #[must_use]
    pub fn with_source(mut self, source: Arc<dyn PropertySource>) -> Self {
        self.add_source(source);
        self
    }

    /// 按查找顺序返回所有配置源
    pub fn sources(&self) -> &[Arc<dyn PropertySource>] {
        &self.sources
    }
}

impl PropertySource for CompositePropertySource {
    fn get(&self, key: &str) -> Option<String> {
        self.sources.iter().find_map(|source| {
            let value = source.get(key);
            if value.is_some() {
                trace!("配置键 {} 由 {} 提供", key, source.name());
            }
            value
        })
    }

    fn contains_key(&self, key: &str) -> bool {
        self.sources.iter().any(|source| source.contains_key(key))
    }

    fn keys(&self) -> Vec<String> {
        self.sources
            .iter()
            .flat_map(|source| source.keys())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn name(&self) -> &str {
        "composite"
    }
}

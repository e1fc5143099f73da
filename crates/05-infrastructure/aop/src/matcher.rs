//! 切面索引与匹配

use crate::chain::InterceptorChain;
use crate::pointcut::Pointcut;
use dashmap::DashMap;
use di_abstractions::{AdviceDeclaration, AdviceKind, BeanRegistry, JoinPoint};
use infrastructure_common::{BeanRef, ComponentError, ComponentResult, InterceptionError};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, trace};

/// 切面通知描述
///
/// 一个切面 Bean 上的一个通知方法，绑定了切面实例。
#[derive(Clone)]
pub struct AspectDescriptor {
    aspect: String,
    order: i32,
    sequence: usize,
    pointcut: Pointcut,
    advice: AdviceDeclaration,
    instance: BeanRef,
}

impl AspectDescriptor {
    /// 创建切面通知描述
    pub fn new(
        aspect: impl Into<String>,
        order: i32,
        sequence: usize,
        advice: AdviceDeclaration,
        instance: BeanRef,
    ) -> ComponentResult<Self> {
        let aspect = aspect.into();
        let pointcut = Pointcut::compile(advice.pointcut()).map_err(|e| {
            ComponentError::InvalidMetadata {
                message: format!(
                    "切点表达式无效: {}.{} '{}': {e}",
                    aspect,
                    advice.method(),
                    advice.pointcut()
                ),
            }
        })?;

        Ok(Self {
            aspect,
            order,
            sequence,
            pointcut,
            advice,
            instance,
        })
    }

    /// 切面 Bean 名称
    pub fn aspect(&self) -> &str {
        &self.aspect
    }

    /// 通知方法名
    pub fn method(&self) -> &str {
        self.advice.method()
    }

    /// 通知类型
    pub fn kind(&self) -> AdviceKind {
        self.advice.kind()
    }

    /// 执行顺序
    pub fn order(&self) -> i32 {
        self.order
    }

    /// 发现序号，顺序相同时按此排序
    pub fn sequence(&self) -> usize {
        self.sequence
    }

    /// 切点
    pub fn pointcut(&self) -> &Pointcut {
        &self.pointcut
    }

    /// 是否匹配方法标识符
    pub fn matches(&self, identifier: &str) -> bool {
        self.pointcut.matches(identifier)
    }

    /// 执行通知
    pub fn apply(&self, join_point: &JoinPoint) -> Result<(), InterceptionError> {
        self.advice
            .invoke(&self.instance, join_point)
            .map_err(|source| InterceptionError::AdviceFailed {
                aspect: self.aspect.clone(),
                method: self.advice.method().to_string(),
                identifier: join_point.identifier().to_string(),
                source,
            })
    }
}

impl fmt::Debug for AspectDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AspectDescriptor")
            .field("aspect", &self.aspect)
            .field("method", &self.advice.method())
            .field("kind", &self.advice.kind())
            .field("order", &self.order)
            .field("sequence", &self.sequence)
            .field("pointcut", &self.pointcut)
            .finish()
    }
}

/// 切面匹配器
///
/// 启动完成后只读，拦截链按方法标识符缓存，可被多个线程并发读取。
pub struct AspectMatcher {
    descriptors: Vec<AspectDescriptor>,
    cache: DashMap<String, Arc<InterceptorChain>>,
}

impl AspectMatcher {
    /// 由已排好发现顺序的通知创建
    pub fn new(descriptors: Vec<AspectDescriptor>) -> Self {
        Self {
            descriptors,
            cache: DashMap::new(),
        }
    }

    /// 扫描注册表中的切面 Bean 建立索引
    ///
    /// 切面按注册顺序、通知按声明顺序编号。
    pub fn from_registry(registry: &dyn BeanRegistry) -> ComponentResult<Self> {
        let mut descriptors = Vec::new();

        for bean in registry.all_beans() {
            if !bean.stereotype().is_aspect() {
                continue;
            }
            let Some(metadata) = bean.descriptor().aspect() else {
                continue;
            };

            for advice in &metadata.advice {
                let descriptor = AspectDescriptor::new(
                    bean.name(),
                    metadata.order,
                    descriptors.len(),
                    advice.clone(),
                    Arc::clone(bean.instance()),
                )?;
                debug!(
                    "索引通知: {}.{} ({}, order={}, pointcut={})",
                    bean.name(),
                    advice.method(),
                    advice.kind(),
                    metadata.order,
                    advice.pointcut()
                );
                descriptors.push(descriptor);
            }
        }

        info!("切面索引完成，共 {} 个通知", descriptors.len());
        Ok(Self::new(descriptors))
    }

    /// 获取方法的拦截链
    ///
    /// 过滤出匹配的通知后按 order 升序稳定排序，没有匹配时返回空链。
    pub fn chain_for(&self, identifier: &str) -> Arc<InterceptorChain> {
        if let Some(chain) = self.cache.get(identifier) {
            trace!("拦截链缓存命中: {}", identifier);
            return Arc::clone(chain.value());
        }

        let mut entries: Vec<AspectDescriptor> = self
            .descriptors
            .iter()
            .filter(|d| d.matches(identifier))
            .cloned()
            .collect();
        entries.sort_by_key(AspectDescriptor::order);
        debug!("构建拦截链: {} ({} 个通知)", identifier, entries.len());

        let chain = Arc::new(InterceptorChain::new(identifier, entries));
        Arc::clone(
            self.cache
                .entry(identifier.to_string())
                .or_insert(chain)
                .value(),
        )
    }

    /// 所有通知，按发现顺序
    pub fn descriptors(&self) -> &[AspectDescriptor] {
        &self.descriptors
    }

    /// 通知数量
    pub fn advice_count(&self) -> usize {
        self.descriptors.len()
    }

    /// 切面 Bean 数量
    pub fn aspect_count(&self) -> usize {
        let mut names: Vec<&str> = self.descriptors.iter().map(AspectDescriptor::aspect).collect();
        names.dedup();
        names.len()
    }

    /// 已缓存的拦截链数量
    pub fn cached_chains(&self) -> usize {
        self.cache.len()
    }
}

impl fmt::Debug for AspectMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AspectMatcher")
            .field("descriptors", &self.descriptors)
            .field("cached_chains", &self.cache.len())
            .finish()
    }
}

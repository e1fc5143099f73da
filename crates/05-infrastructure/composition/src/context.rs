//! 应用上下文

use config_abstractions::PropertySource;
use di_abstractions::{Bean, BeanRef, BeanRegistry, ContainerStats};
use di_aop::{method_identifier, AspectMatcher, InterceptorChain};
use di_impl::DefaultBeanRegistry;
use infrastructure_common::{DependencyResult, InterceptionError, TypeInfo};
use std::fmt;
use std::sync::Arc;

/// 应用上下文
///
/// 启动完成后的只读容器：按名称或类型获取单例，按方法标识符获取拦截链。
/// 所有操作都只读取启动时建立的状态，可在线程间共享。
pub struct ApplicationContext {
    registry: DefaultBeanRegistry,
    matcher: AspectMatcher,
    properties: Arc<dyn PropertySource>,
    stats: ContainerStats,
}

impl ApplicationContext {
    pub(crate) fn new(
        registry: DefaultBeanRegistry,
        matcher: AspectMatcher,
        properties: Arc<dyn PropertySource>,
        stats: ContainerStats,
    ) -> Self {
        Self {
            registry,
            matcher,
            properties,
            stats,
        }
    }

    /// 创建构建器
    pub fn builder() -> crate::ApplicationContextBuilder {
        crate::ApplicationContextBuilder::new()
    }

    /// 按类型获取唯一实例，类型可以是具体类型或能力类型
    pub fn get_bean<T: ?Sized + 'static>(&self) -> DependencyResult<Arc<T>> {
        self.registry().get::<T>()
    }

    /// 按名称获取 Bean
    pub fn get_bean_by_name(&self, name: &str) -> DependencyResult<Arc<Bean>> {
        self.registry.get_by_name(name)
    }

    /// 按名称获取并转换为指定类型
    pub fn get_bean_by_name_as<T: ?Sized + 'static>(&self, name: &str) -> DependencyResult<Arc<T>> {
        self.registry.get_by_name(name)?.get_as::<T>()
    }

    /// 所有可作为 `T` 使用的实例，按注册顺序
    pub fn get_beans_of_type<T: ?Sized + 'static>(&self) -> Vec<Arc<T>> {
        self.registry
            .beans_of_type(&TypeInfo::of::<T>())
            .iter()
            .filter_map(|bean| bean.get_as::<T>().ok())
            .collect()
    }

    /// 是否包含该名称的 Bean
    pub fn contains_bean(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    /// 所有 Bean 名称，按注册顺序
    pub fn bean_names(&self) -> Vec<String> {
        self.registry.bean_names()
    }

    /// 所有 Bean，按注册顺序
    pub fn all_beans(&self) -> Vec<Arc<Bean>> {
        self.registry.all_beans()
    }

    /// 底层注册表
    pub fn registry(&self) -> &dyn BeanRegistry {
        &self.registry
    }

    /// 切面索引
    pub fn aspects(&self) -> &AspectMatcher {
        &self.matcher
    }

    /// 获取方法标识符对应的拦截链
    pub fn chain_for(&self, identifier: &str) -> Arc<InterceptorChain> {
        self.matcher.chain_for(identifier)
    }

    /// 获取 `T` 上某个方法的拦截链
    pub fn chain_for_method<T: ?Sized + 'static>(&self, method: &str) -> Arc<InterceptorChain> {
        self.chain_for(&method_identifier::<T>(method))
    }

    /// 用拦截链包裹一次调用
    pub fn intercept<R, F>(
        &self,
        identifier: &str,
        target: Option<BeanRef>,
        call: F,
    ) -> Result<R, InterceptionError>
    where
        F: FnOnce() -> R,
    {
        self.chain_for(identifier).invoke(target, call)
    }

    /// 读取合并后的原始配置值
    pub fn property(&self, key: &str) -> Option<String> {
        self.properties.get(key)
    }

    /// 启动统计
    pub fn stats(&self) -> &ContainerStats {
        &self.stats
    }
}

impl fmt::Debug for ApplicationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplicationContext")
            .field("container_id", &self.stats.container_id)
            .field("beans", &self.registry.bean_names())
            .field("advice", &self.matcher.advice_count())
            .finish()
    }
}

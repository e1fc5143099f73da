//! 默认依赖解析器实现

use config_abstractions::ConfigurationBinder;
use di_abstractions::{Bean, BeanRegistry, DependencyResolver, InjectionPoint};
use infrastructure_common::{
    BeanRef, DependencyError, DependencyResult, InfrastructureResult, TypeInfo,
};
use std::sync::Arc;
use tracing::{debug, trace};

/// 默认依赖解析器
///
/// 依赖字段先按精确类型查找，找不到时按注册顺序取第一个能力匹配；
/// 配置值字段通过配置绑定器读取并转换。每个字段最多写入一次。
#[derive(Clone)]
pub struct DefaultDependencyResolver {
    binder: Arc<dyn ConfigurationBinder>,
}

impl DefaultDependencyResolver {
    /// 创建新的依赖解析器
    pub fn new(binder: Arc<dyn ConfigurationBinder>) -> Self {
        Self { binder }
    }

    fn type_mismatch(bean: &Bean, expected: &str) -> DependencyError {
        DependencyError::BeanTypeMismatch {
            bean: bean.name().to_string(),
            expected: expected.to_string(),
        }
    }
}

impl std::fmt::Debug for DefaultDependencyResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultDependencyResolver").finish_non_exhaustive()
    }
}

impl DependencyResolver for DefaultDependencyResolver {
    fn resolve_dependency(
        &self,
        registry: &dyn BeanRegistry,
        owner: &str,
        target: &TypeInfo,
    ) -> DependencyResult<BeanRef> {
        let candidate = registry.find_first_by_type(target).ok_or_else(|| {
            DependencyError::unresolved(owner, target.name, "没有匹配的 Bean")
        })?;

        if candidate.type_info() != *target {
            let matches = registry.beans_of_type(target);
            if matches.len() > 1 {
                debug!(
                    "{} 的依赖 {} 有 {} 个能力匹配，按注册顺序选择 {}",
                    owner,
                    target,
                    matches.len(),
                    candidate.name()
                );
            }
        }

        candidate
            .handle_for(target.id)
            .ok_or_else(|| Self::type_mismatch(&candidate, target.name))
    }

    fn inject(&self, registry: &dyn BeanRegistry, bean: &Bean) -> InfrastructureResult<usize> {
        let instance = bean.instance();
        let mut injected = 0;

        for field in bean.descriptor().fields() {
            match field {
                InjectionPoint::DependencyField { name, target, slot } => {
                    let filled = slot
                        .is_filled(instance)
                        .ok_or_else(|| Self::type_mismatch(bean, bean.type_info().name))?;
                    if filled {
                        trace!("字段已注入，跳过: {}.{}", bean.name(), name);
                        continue;
                    }

                    let handle = self.resolve_dependency(registry, bean.name(), target)?;
                    if slot
                        .fill(instance, handle)
                        .ok_or_else(|| Self::type_mismatch(bean, target.name))?
                    {
                        debug!("注入依赖: {}.{} <- {}", bean.name(), name, target);
                        injected += 1;
                    }
                }
                InjectionPoint::ValueField {
                    name,
                    key,
                    kind,
                    slot,
                } => {
                    let filled = slot
                        .is_filled(instance)
                        .ok_or_else(|| Self::type_mismatch(bean, bean.type_info().name))?;
                    if filled {
                        trace!("配置值已绑定，跳过: {}.{}", bean.name(), name);
                        continue;
                    }

                    let value = self
                        .binder
                        .bind_key(key, *kind)
                        .map_err(|e| e.for_bean(bean.name()))?;
                    if slot
                        .fill(instance, value)
                        .ok_or_else(|| Self::type_mismatch(bean, kind.as_str()))?
                    {
                        debug!("注入配置值: {}.{} <- {}", bean.name(), name, key);
                        injected += 1;
                    }
                }
                InjectionPoint::ConstructorParam { .. } => {}
            }
        }

        Ok(injected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DefaultBeanRegistry;
    use config_impl::{DefaultConfigurationBinder, MapPropertySource};
    use di_abstractions::{Autowired, ComponentDescriptor, Value};
    use infrastructure_common::{ConfigError, InfrastructureError, Stereotype};

    trait Clock: Send + Sync {
        fn now(&self) -> u64;
    }

    #[derive(Default)]
    struct FixedClock;
    impl Clock for FixedClock {
        fn now(&self) -> u64 {
            42
        }
    }

    #[derive(Default)]
    struct Scheduler {
        clock: Autowired<dyn Clock>,
        peer: Autowired<Worker>,
        interval: Value<i64>,
        enabled: Value<bool>,
    }

    #[derive(Default)]
    struct Worker {
        scheduler: Autowired<Scheduler>,
    }

    fn resolver(pairs: &[(&str, &str)]) -> DefaultDependencyResolver {
        let source = MapPropertySource::from_pairs("test", pairs.iter().copied());
        DefaultDependencyResolver::new(Arc::new(DefaultConfigurationBinder::new(Arc::new(source))))
    }

    fn registry() -> DefaultBeanRegistry {
        let mut registry = DefaultBeanRegistry::new();
        registry
            .register(Arc::new(
                ComponentDescriptor::builder::<FixedClock>(Stereotype::Generic)
                    .default_constructor(FixedClock::default)
                    .capability::<dyn Clock, _>(|c| c as Arc<dyn Clock>)
                    .build(),
            ))
            .unwrap();
        registry
            .register(Arc::new(
                ComponentDescriptor::builder::<Scheduler>(Stereotype::Service)
                    .default_constructor(Scheduler::default)
                    .autowired("clock", |s: &Scheduler| &s.clock)
                    .autowired("peer", |s: &Scheduler| &s.peer)
                    .value("interval", "scheduler.interval", |s: &Scheduler| &s.interval)
                    .value("enabled", "scheduler.enabled", |s: &Scheduler| &s.enabled)
                    .build(),
            ))
            .unwrap();
        registry
            .register(Arc::new(
                ComponentDescriptor::builder::<Worker>(Stereotype::Service)
                    .default_constructor(Worker::default)
                    .autowired("scheduler", |w: &Worker| &w.scheduler)
                    .build(),
            ))
            .unwrap();
        registry
    }

    #[test]
    fn test_inject_all_fills_fields_including_field_cycles() {
        let registry = registry();
        let resolver = resolver(&[("scheduler.interval", "1500"), ("scheduler.enabled", "TRUE")]);

        let injected = resolver.inject_all(&registry).unwrap();
        assert_eq!(injected, 5);

        let scheduler = registry
            .get_by_name("scheduler")
            .unwrap()
            .downcast::<Scheduler>()
            .unwrap();
        assert_eq!(scheduler.clock.get().unwrap().now(), 42);
        assert_eq!(scheduler.interval.get(), Some(&1500));
        assert_eq!(scheduler.enabled.get(), Some(&true));

        let worker = scheduler.peer.get().unwrap();
        assert!(Arc::ptr_eq(worker.scheduler.get().unwrap(), &scheduler));
    }

    #[test]
    fn test_injection_is_idempotent() {
        let registry = registry();
        let resolver = resolver(&[("scheduler.interval", "10"), ("scheduler.enabled", "no")]);

        assert_eq!(resolver.inject_all(&registry).unwrap(), 5);
        assert_eq!(resolver.inject_all(&registry).unwrap(), 0, "第二次注入不应写入任何字段");
    }

    #[test]
    fn test_missing_property_names_key_and_bean() {
        let registry = registry();
        let resolver = resolver(&[("scheduler.interval", "10")]);

        let err = resolver.inject_all(&registry).unwrap_err();
        assert!(matches!(
            err,
            InfrastructureError::ConfigError {
                source: ConfigError::MissingProperty { ref key, bean: Some(ref bean) }
            } if key == "scheduler.enabled" && bean == "scheduler"
        ));
    }

    #[test]
    fn test_type_conversion_failure() {
        let registry = registry();
        let resolver = resolver(&[("scheduler.interval", "soon"), ("scheduler.enabled", "true")]);

        let err = resolver.inject_all(&registry).unwrap_err();
        assert!(matches!(
            err,
            InfrastructureError::ConfigError {
                source: ConfigError::TypeConversion { .. }
            }
        ));
    }

    #[test]
    fn test_unresolved_field_dependency() {
        let mut registry = DefaultBeanRegistry::new();
        registry
            .register(Arc::new(
                ComponentDescriptor::builder::<Worker>(Stereotype::Service)
                    .default_constructor(Worker::default)
                    .autowired("scheduler", |w: &Worker| &w.scheduler)
                    .build(),
            ))
            .unwrap();

        let err = resolver(&[]).inject_all(&registry).unwrap_err();
        assert!(matches!(
            err,
            InfrastructureError::DependencyError {
                source: DependencyError::UnresolvedDependency { ref bean, .. }
            } if bean == "worker"
        ));
    }
}

//! 构造器注入、配置绑定与切面拦截测试

use crate::ApplicationContextBuilder;
use di_abstractions::{Autowired, BeanRef, ComponentDefinition, ComponentDescriptor, JoinPoint};
use di_impl::StaticDiscovery;
use infrastructure_common::{
    ConfigError, DependencyError, InfrastructureError, InterceptionError, Stereotype,
};
use std::sync::{Arc, Mutex};

mod shop {
    pub mod repository {
        use di_abstractions::{ComponentDefinition, ComponentDescriptor};
        use infrastructure_common::Stereotype;
        use std::sync::Arc;

        /// 商品仓储接口
        pub trait ProductRepository: Send + Sync {
            fn find(&self, id: u32) -> Option<String>;
        }

        #[derive(Default)]
        pub struct MemoryProductRepository;

        impl ProductRepository for MemoryProductRepository {
            fn find(&self, id: u32) -> Option<String> {
                (id == 1).then(|| "keyboard".to_string())
            }
        }

        impl ComponentDefinition for MemoryProductRepository {
            fn component_descriptor() -> ComponentDescriptor {
                ComponentDescriptor::builder::<Self>(Stereotype::Repository)
                    .default_constructor(Self::default)
                    .capability::<dyn ProductRepository, _>(|r| r as Arc<dyn ProductRepository>)
                    .build()
            }
        }
    }

    pub mod service {
        use super::repository::ProductRepository;
        use di_abstractions::{ComponentDefinition, ComponentDescriptor, Value};
        use infrastructure_common::Stereotype;
        use std::sync::Arc;

        /// 构造器注入的服务
        pub struct CatalogService {
            pub repository: Arc<dyn ProductRepository>,
            pub page_size: Value<i32>,
        }

        impl CatalogService {
            pub fn describe(&self, id: u32) -> String {
                self.repository
                    .find(id)
                    .unwrap_or_else(|| "unknown".to_string())
            }
        }

        impl ComponentDefinition for CatalogService {
            fn component_descriptor() -> ComponentDescriptor {
                ComponentDescriptor::builder::<Self>(Stereotype::Service)
                    .constructor_param::<dyn ProductRepository>("repository")
                    .autowired_constructor(|args| {
                        Ok(CatalogService {
                            repository: args.get::<dyn ProductRepository>(0)?,
                            page_size: Value::new(),
                        })
                    })
                    .value("page_size", "catalog.page-size", |s: &CatalogService| &s.page_size)
                    .build()
            }
        }
    }
}

use shop::repository::{MemoryProductRepository, ProductRepository};
use shop::service::CatalogService;

type Journal = Arc<Mutex<Vec<String>>>;

/// 记录调用的切面，常量参数区分不同的切面类型
struct JournalAspect<const N: usize> {
    journal: Journal,
}

fn journal_aspect<const N: usize>(
    journal: &Journal,
    order: i32,
    label: &'static str,
) -> ComponentDescriptor {
    let journal = Arc::clone(journal);
    ComponentDescriptor::builder::<JournalAspect<N>>(Stereotype::Aspect)
        .named(label)
        .default_constructor(move || JournalAspect {
            journal: Arc::clone(&journal),
        })
        .aspect(order)
        .before("logBefore", "*.service.*.*", move |a: &JournalAspect<N>, jp: &JoinPoint| {
            a.journal
                .lock()
                .unwrap()
                .push(format!("{label}.before {}", jp.method_name()));
            Ok(())
        })
        .after("logAfter", "*.service.*.*", move |a: &JournalAspect<N>, jp: &JoinPoint| {
            a.journal
                .lock()
                .unwrap()
                .push(format!("{label}.after {}", jp.method_name()));
            Ok(())
        })
        .build()
}

fn shop_discovery() -> StaticDiscovery {
    StaticDiscovery::new("shop")
        .with::<CatalogService>()
        .with::<MemoryProductRepository>()
}

/// 测试构造器注入与能力类型注入
#[test]
fn test_constructor_injection() {
    let context = ApplicationContextBuilder::new()
        .add_discovery(Box::new(shop_discovery()))
        .add_properties([("catalog.page-size", "25")])
        .build()
        .unwrap();

    let service = context.get_bean::<CatalogService>().unwrap();
    assert_eq!(service.describe(1), "keyboard");
    assert_eq!(service.page_size.get(), Some(&25));

    let repository = context.get_bean::<dyn ProductRepository>().unwrap();
    assert_eq!(repository.find(2), None);
    assert_eq!(context.get_beans_of_type::<dyn ProductRepository>().len(), 1);

    // 服务先声明，但仓储必须先注册
    assert_eq!(
        context.bean_names(),
        vec!["memoryProductRepository", "catalogService"]
    );
}

/// 测试缺失配置导致启动失败
#[test]
fn test_missing_property_aborts_startup() {
    let result = ApplicationContextBuilder::new()
        .add_discovery(Box::new(shop_discovery()))
        .build();

    match result {
        Err(InfrastructureError::ConfigError {
            source: ConfigError::MissingProperty { key, bean },
        }) => {
            assert_eq!(key, "catalog.page-size");
            assert_eq!(bean.as_deref(), Some("catalogService"));
        }
        other => panic!("应返回缺失配置错误, 实际: {other:?}"),
    }
}

/// 测试配置值类型转换失败
#[test]
fn test_conversion_failure_aborts_startup() {
    let result = ApplicationContextBuilder::new()
        .add_discovery(Box::new(shop_discovery()))
        .add_properties([("catalog.page-size", "many")])
        .build();

    assert!(matches!(
        result,
        Err(InfrastructureError::ConfigError {
            source: ConfigError::TypeConversion { .. }
        })
    ));
}

/// 测试缺失构造器依赖
#[test]
fn test_missing_constructor_dependency() {
    let result = ApplicationContextBuilder::new()
        .add_descriptor(CatalogService::component_descriptor())
        .add_properties([("catalog.page-size", "10")])
        .build();

    assert!(matches!(
        result,
        Err(InfrastructureError::DependencyError {
            source: DependencyError::UnresolvedDependency { .. }
        })
    ));
}

/// 互相引用的字段注入组件
#[derive(Default)]
struct Left {
    right: Autowired<Right>,
}

#[derive(Default)]
struct Right {
    left: Autowired<Left>,
}

impl ComponentDefinition for Left {
    fn component_descriptor() -> ComponentDescriptor {
        ComponentDescriptor::builder::<Self>(Stereotype::Generic)
            .default_constructor(Self::default)
            .autowired("right", |l: &Left| &l.right)
            .build()
    }
}

impl ComponentDefinition for Right {
    fn component_descriptor() -> ComponentDescriptor {
        ComponentDescriptor::builder::<Self>(Stereotype::Generic)
            .default_constructor(Self::default)
            .autowired("left", |r: &Right| &r.left)
            .build()
    }
}

/// 测试字段循环依赖可以完成注入
#[test]
fn test_field_cycle_is_wired() {
    let context = ApplicationContextBuilder::new()
        .add_descriptor(Left::component_descriptor())
        .add_descriptor(Right::component_descriptor())
        .build()
        .unwrap();

    let left = context.get_bean::<Left>().unwrap();
    let right = context.get_bean::<Right>().unwrap();
    assert!(Arc::ptr_eq(left.right.get().unwrap(), &right));
    assert!(Arc::ptr_eq(right.left.get().unwrap(), &left));
}

/// 测试拦截链按 order 执行前置和后置通知
#[test]
fn test_intercepted_call_runs_ordered_advice() {
    let journal: Journal = Arc::new(Mutex::new(Vec::new()));
    let context = ApplicationContextBuilder::new()
        .add_discovery(Box::new(shop_discovery()))
        .add_descriptor(journal_aspect::<1>(&journal, 5, "outer"))
        .add_descriptor(journal_aspect::<2>(&journal, 1, "inner"))
        .add_properties([("catalog.page-size", "10")])
        .build()
        .unwrap();

    assert_eq!(context.stats().aspect_count, 2);
    assert_eq!(context.stats().advice_count, 4);

    let service = context.get_bean::<CatalogService>().unwrap();
    let chain = context.chain_for_method::<CatalogService>("describe");
    assert_eq!(chain.len(), 4);

    let target: BeanRef = Arc::clone(&service) as BeanRef;
    let result = chain.invoke(Some(Arc::clone(&target)), || service.describe(1)).unwrap();
    assert_eq!(result, "keyboard");

    let identifier = di_aop::method_identifier::<CatalogService>("describe");
    let again = context
        .intercept(&identifier, Some(target), || service.describe(1))
        .unwrap();
    assert_eq!(again, "keyboard");

    assert_eq!(
        *journal.lock().unwrap(),
        vec![
            "inner.before describe",
            "outer.before describe",
            "inner.after describe",
            "outer.after describe",
            "inner.before describe",
            "outer.before describe",
            "inner.after describe",
            "outer.after describe",
        ]
    );

    // 仓储方法不匹配服务切点
    let repo_chain = context.chain_for_method::<MemoryProductRepository>("find");
    assert!(repo_chain.is_empty());
}

/// 测试通知失败时目标方法不会执行
#[test]
fn test_failing_advice_stops_call() {
    struct Guard;

    let context = ApplicationContextBuilder::new()
        .add_discovery(Box::new(shop_discovery()))
        .add_descriptor(
            ComponentDescriptor::builder::<Guard>(Stereotype::Aspect)
                .default_constructor(|| Guard)
                .aspect(0)
                .before("deny", "*.CatalogService.*", |_: &Guard, _: &JoinPoint| {
                    Err("只读模式".into())
                })
                .build(),
        )
        .add_properties([("catalog.page-size", "10")])
        .build()
        .unwrap();

    let identifier = di_aop::method_identifier::<CatalogService>("describe");
    let mut called = false;
    let result = context.intercept(&identifier, None, || called = true);

    assert!(!called, "通知失败后不应执行目标方法");
    match result {
        Err(InterceptionError::AdviceFailed { aspect, method, .. }) => {
            assert_eq!(aspect, "guard");
            assert_eq!(method, "deny");
        }
        Ok(()) => panic!("应返回通知失败错误"),
    }
}

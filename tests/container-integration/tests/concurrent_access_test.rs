//! 启动完成后的并发只读访问测试

use di_abstractions::{Autowired, ComponentDefinition, ComponentDescriptor, JoinPoint};
use infrastructure_common::Stereotype;
use infrastructure_composition::{ApplicationContext, ApplicationContextBuilder};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

mod catalog {
    pub mod service {
        use di_abstractions::Autowired;

        #[derive(Default)]
        pub struct PriceService {
            pub cache: Autowired<super::super::PriceCache>,
        }

        impl PriceService {
            pub fn quote(&self, sku: u32) -> u32 {
                sku + 100
            }
        }
    }
}

use catalog::service::PriceService;

#[derive(Default)]
pub struct PriceCache;

impl ComponentDefinition for PriceService {
    fn component_descriptor() -> ComponentDescriptor {
        ComponentDescriptor::builder::<Self>(Stereotype::Service)
            .default_constructor(Self::default)
            .autowired("cache", |s: &PriceService| &s.cache)
            .build()
    }
}

/// 统计调用次数的切面
#[derive(Default)]
struct CountingAspect {
    calls: AtomicUsize,
}

fn context() -> ApplicationContext {
    ApplicationContextBuilder::new()
        .add_descriptor(PriceService::component_descriptor())
        .add_descriptor(
            ComponentDescriptor::builder::<PriceCache>(Stereotype::Repository)
                .default_constructor(PriceCache::default)
                .build(),
        )
        .add_descriptor(
            ComponentDescriptor::builder::<CountingAspect>(Stereotype::Aspect)
                .default_constructor(CountingAspect::default)
                .aspect(1)
                .before("count", "*.service.PriceService.*", |a: &CountingAspect, _: &JoinPoint| {
                    a.calls.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                })
                .build(),
        )
        .build()
        .expect("上下文应构建成功")
}

/// 测试多个线程共享上下文时读取到同一单例和同一拦截链
#[test]
fn test_concurrent_readers_share_singletons() {
    let context = Arc::new(context());
    let expected = context.get_bean::<PriceService>().unwrap();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let context = Arc::clone(&context);
            thread::spawn(move || {
                let service = context.get_bean::<PriceService>().unwrap();
                let chain = context.chain_for_method::<PriceService>("quote");
                let quoted = chain.invoke(None, || service.quote(i)).unwrap();
                (service, chain, quoted)
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let first_chain = Arc::clone(&results[0].1);
    for (i, (service, chain, quoted)) in results.iter().enumerate() {
        assert!(Arc::ptr_eq(service, &expected), "所有线程应得到同一个实例");
        assert!(Arc::ptr_eq(chain, &first_chain), "所有线程应得到同一条拦截链");
        assert_eq!(*quoted, i as u32 + 100);
    }

    let aspect = context.get_bean::<CountingAspect>().unwrap();
    assert_eq!(aspect.calls.load(Ordering::SeqCst), 8);
    assert!(expected.cache.get().is_some(), "字段依赖应在交付前注入");
}

/// 测试上下文满足跨线程共享的约束
#[test]
fn test_context_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ApplicationContext>();
    assert_send_sync::<Autowired<PriceCache>>();
}

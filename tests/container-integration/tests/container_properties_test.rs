//! 容器行为的端到端测试：查找、命名、配置绑定与拦截链顺序

use di_abstractions::{Autowired, ComponentDefinition, ComponentDescriptor, JoinPoint, Value};
use di_impl::StaticDiscovery;
use infrastructure_common::{
    ComponentError, ConfigError, DependencyError, InfrastructureError, Stereotype,
};
use infrastructure_composition::{ApplicationContext, ApplicationContextBuilder};
use std::sync::{Arc, Mutex};

mod billing {
    pub mod service {
        /// 被拦截的目标服务
        #[derive(Default)]
        pub struct InvoiceService;

        impl InvoiceService {
            pub fn issue(&self, amount: u32) -> u32 {
                amount * 2
            }
        }
    }
}

use billing::service::InvoiceService;

/// 通知通道接口
trait Notifier: Send + Sync {
    fn channel(&self) -> &'static str;
}

#[derive(Default)]
struct EmailNotifier;

impl Notifier for EmailNotifier {
    fn channel(&self) -> &'static str {
        "email"
    }
}

#[derive(Default)]
struct SmsNotifier;

impl Notifier for SmsNotifier {
    fn channel(&self) -> &'static str {
        "sms"
    }
}

fn notifier_descriptor<C>() -> ComponentDescriptor
where
    C: Notifier + Default + Send + Sync + 'static,
{
    ComponentDescriptor::builder::<C>(Stereotype::Generic)
        .default_constructor(C::default)
        .capability::<dyn Notifier, _>(|n| n as Arc<dyn Notifier>)
        .build()
}

/// 通过能力类型注入通知器的组件
#[derive(Default)]
struct AlertCenter {
    notifier: Autowired<dyn Notifier>,
}

impl ComponentDefinition for AlertCenter {
    fn component_descriptor() -> ComponentDescriptor {
        ComponentDescriptor::builder::<Self>(Stereotype::Service)
            .default_constructor(Self::default)
            .autowired("notifier", |a: &AlertCenter| &a.notifier)
            .build()
    }
}

/// 绑定布尔配置的组件
#[derive(Default)]
struct Flags {
    upper: Value<bool>,
    mixed: Value<bool>,
    off: Value<bool>,
    nonsense: Value<bool>,
    answer: Value<i64>,
}

impl ComponentDefinition for Flags {
    fn component_descriptor() -> ComponentDescriptor {
        ComponentDescriptor::builder::<Self>(Stereotype::Configuration)
            .default_constructor(Self::default)
            .value("upper", "flag.upper", |f: &Flags| &f.upper)
            .value("mixed", "flag.mixed", |f: &Flags| &f.mixed)
            .value("off", "flag.off", |f: &Flags| &f.off)
            .value("nonsense", "flag.nonsense", |f: &Flags| &f.nonsense)
            .value("answer", "flag.answer", |f: &Flags| &f.answer)
            .build()
    }
}

/// 测试按类型查找：唯一匹配返回，零匹配报错
#[test]
fn test_get_by_type_unique_and_missing() {
    let context = ApplicationContextBuilder::new()
        .add_descriptor(notifier_descriptor::<EmailNotifier>())
        .build()
        .unwrap();

    let notifier = context.get_bean::<dyn Notifier>().unwrap();
    assert_eq!(notifier.channel(), "email");

    let missing = context.get_bean::<InvoiceService>();
    assert!(matches!(
        missing,
        Err(DependencyError::AmbiguousOrMissingBean { ref candidates, .. }) if candidates.is_empty()
    ));
}

/// 测试多个能力匹配：按类型获取报歧义，注入取注册顺序中的第一个
#[test]
fn test_ambiguous_capability_policy() {
    let context = ApplicationContextBuilder::new()
        .add_descriptor(notifier_descriptor::<SmsNotifier>())
        .add_descriptor(notifier_descriptor::<EmailNotifier>())
        .add_descriptor(AlertCenter::component_descriptor())
        .build()
        .unwrap();

    match context.get_bean::<dyn Notifier>() {
        Err(DependencyError::AmbiguousOrMissingBean { candidates, .. }) => {
            assert_eq!(candidates, vec!["smsNotifier", "emailNotifier"]);
        }
        Err(other) => panic!("应返回歧义错误, 实际: {other}"),
        Ok(_) => panic!("多个匹配时不应返回唯一实例"),
    }

    let center = context.get_bean::<AlertCenter>().unwrap();
    assert_eq!(center.notifier.get().unwrap().channel(), "sms");
    assert_eq!(context.get_beans_of_type::<dyn Notifier>().len(), 2);
}

/// 测试布尔配置宽松解析与整数转换
#[test]
fn test_value_binding_round_trip() {
    let context = ApplicationContextBuilder::new()
        .add_descriptor(Flags::component_descriptor())
        .add_properties([
            ("flag.upper", "TRUE"),
            ("flag.mixed", "true"),
            ("flag.off", "false"),
            ("flag.nonsense", "nonsense"),
            ("flag.answer", "42"),
        ])
        .build()
        .unwrap();

    let flags = context.get_bean::<Flags>().unwrap();
    assert_eq!(flags.upper.get(), Some(&true));
    assert_eq!(flags.mixed.get(), Some(&true));
    assert_eq!(flags.off.get(), Some(&false));
    assert_eq!(flags.nonsense.get(), Some(&false));
    assert_eq!(flags.answer.get(), Some(&42));
}

/// 缺失配置键的组件
#[derive(Default)]
struct NeedsMissing {
    value: Value<String>,
}

impl ComponentDefinition for NeedsMissing {
    fn component_descriptor() -> ComponentDescriptor {
        ComponentDescriptor::builder::<Self>(Stereotype::Generic)
            .default_constructor(Self::default)
            .value("value", "x.missing", |n: &NeedsMissing| &n.value)
            .build()
    }
}

/// 测试缺失配置键中止启动
#[test]
fn test_missing_property_aborts_container() {
    let result = ApplicationContextBuilder::new()
        .add_descriptor(NeedsMissing::component_descriptor())
        .build();

    assert!(matches!(
        result,
        Err(InfrastructureError::ConfigError {
            source: ConfigError::MissingProperty { ref key, .. }
        }) if key == "x.missing"
    ));
}

/// 测试默认名称冲突时回退到限定名称
#[test]
fn test_default_name_collision_falls_back_to_qualified_name() {
    mod first {
        #[derive(Default)]
        pub struct Widget;
    }
    mod second {
        #[derive(Default)]
        pub struct Widget;
    }

    let context = ApplicationContextBuilder::new()
        .add_descriptor(
            ComponentDescriptor::builder::<first::Widget>(Stereotype::Generic)
                .default_constructor(first::Widget::default)
                .build(),
        )
        .add_descriptor(
            ComponentDescriptor::builder::<second::Widget>(Stereotype::Generic)
                .default_constructor(second::Widget::default)
                .build(),
        )
        .build()
        .unwrap();

    let names = context.bean_names();
    assert_eq!(names[0], "widget");
    assert_ne!(names[1], "widget");
    assert!(context.get_bean_by_name_as::<second::Widget>(&names[1]).is_ok());
}

/// 测试构造器循环依赖中止启动
#[test]
fn test_constructor_cycle_aborts_container() {
    struct Ping;
    struct Pong;

    let result = ApplicationContextBuilder::new()
        .add_descriptor(
            ComponentDescriptor::builder::<Ping>(Stereotype::Generic)
                .constructor_param::<Pong>("pong")
                .autowired_constructor(|args| {
                    args.get::<Pong>(0)?;
                    Ok(Ping)
                })
                .build(),
        )
        .add_descriptor(
            ComponentDescriptor::builder::<Pong>(Stereotype::Generic)
                .constructor_param::<Ping>("ping")
                .autowired_constructor(|args| {
                    args.get::<Ping>(0)?;
                    Ok(Pong)
                })
                .build(),
        )
        .build();

    let err = result.err().expect("构造器循环应导致失败");
    assert!(
        matches!(
            err,
            InfrastructureError::DependencyError {
                source: DependencyError::UnresolvedDependency { .. }
            }
        ),
        "实际错误: {err}"
    );
    assert!(err.to_string().contains("ping -> pong -> ping"), "错误信息应描述循环: {err}");
}

/// 测试多个注入构造器
#[test]
fn test_multiple_designated_constructors_rejected() {
    struct Twice;

    let result = ApplicationContextBuilder::new()
        .add_descriptor(
            ComponentDescriptor::builder::<Twice>(Stereotype::Generic)
                .autowired_constructor(|_| Ok(Twice))
                .autowired_constructor(|_| Ok(Twice))
                .build(),
        )
        .build();

    assert!(matches!(
        result,
        Err(InfrastructureError::ComponentError {
            source: ComponentError::AmbiguousConstructor { .. }
        })
    ));
}

type Journal = Arc<Mutex<Vec<String>>>;

struct FirstAspect(Journal);
struct SecondAspect(Journal);

fn aspect_context(journal: &Journal) -> ApplicationContext {
    let second = Arc::clone(journal);
    let first = Arc::clone(journal);

    ApplicationContextBuilder::new()
        .add_discovery(Box::new(StaticDiscovery::new("billing").with_factory(|| {
            ComponentDescriptor::builder::<InvoiceService>(Stereotype::Service)
                .default_constructor(InvoiceService::default)
                .build()
        })))
        // 后注册但 order 更小的切面应排在前面
        .add_descriptor(
            ComponentDescriptor::builder::<SecondAspect>(Stereotype::Aspect)
                .default_constructor(move || SecondAspect(Arc::clone(&second)))
                .aspect(2)
                .before("before", "*.service.*.*", |a: &SecondAspect, _: &JoinPoint| {
                    a.0.lock().unwrap().push("second.before".to_string());
                    Ok(())
                })
                .after("after", "*.service.*.*", |a: &SecondAspect, _: &JoinPoint| {
                    a.0.lock().unwrap().push("second.after".to_string());
                    Ok(())
                })
                .build(),
        )
        .add_descriptor(
            ComponentDescriptor::builder::<FirstAspect>(Stereotype::Aspect)
                .default_constructor(move || FirstAspect(Arc::clone(&first)))
                .aspect(1)
                .after("after", "*.service.*.*", |a: &FirstAspect, _: &JoinPoint| {
                    a.0.lock().unwrap().push("first.after".to_string());
                    Ok(())
                })
                .before("before", "*.service.*.*", |a: &FirstAspect, jp: &JoinPoint| {
                    let issued = jp.target_as::<InvoiceService>().is_some();
                    a.0.lock().unwrap().push(format!("first.before target={issued}"));
                    Ok(())
                })
                .build(),
        )
        .build()
        .unwrap()
}

/// 测试拦截链按 order 分别排列前置和后置通知
#[test]
fn test_chain_ordering_for_before_and_after() {
    let journal: Journal = Arc::new(Mutex::new(Vec::new()));
    let context = aspect_context(&journal);

    let chain = context.chain_for_method::<InvoiceService>("issue");
    let before: Vec<&str> = chain.before().map(|d| d.aspect()).collect();
    let after: Vec<&str> = chain.after().map(|d| d.aspect()).collect();
    assert_eq!(before, vec!["firstAspect", "secondAspect"]);
    assert_eq!(after, vec!["firstAspect", "secondAspect"]);

    let bean = context.get_bean_by_name("invoiceService").unwrap();
    let service = bean.downcast::<InvoiceService>().unwrap();
    let doubled = chain
        .invoke(Some(Arc::clone(bean.instance())), || service.issue(21))
        .unwrap();
    assert_eq!(doubled, 42);

    assert_eq!(
        *journal.lock().unwrap(),
        vec![
            "first.before target=true",
            "second.before",
            "first.after",
            "second.after",
        ]
    );
}

/// 测试拦截链缓存与不匹配的方法
#[test]
fn test_chain_cache_and_empty_chain() {
    let journal: Journal = Arc::new(Mutex::new(Vec::new()));
    let context = aspect_context(&journal);

    let first = context.chain_for_method::<InvoiceService>("issue");
    let again = context.chain_for_method::<InvoiceService>("issue");
    assert!(Arc::ptr_eq(&first, &again), "同一标识符应返回缓存的拦截链");

    let empty = context.chain_for("billing.repository.InvoiceRepository.save");
    assert!(empty.is_empty());
    let value = context
        .intercept("billing.repository.InvoiceRepository.save", None, || 5)
        .unwrap();
    assert_eq!(value, 5);
    assert!(journal.lock().unwrap().is_empty());
}

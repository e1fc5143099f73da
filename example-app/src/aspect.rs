//! 日志切面

use di_abstractions::{ComponentDefinition, ComponentDescriptor, JoinPoint};
use infrastructure_common::{BoxError, Stereotype};
use tracing::info;

/// 记录服务层和仓储层方法调用的切面
#[derive(Debug, Default)]
pub struct LoggingAspect;

impl LoggingAspect {
    fn log(&self, phase: &str, layer: &str, join_point: &JoinPoint) -> Result<(), BoxError> {
        let declaring = join_point.declaring_type();
        let simple_name = declaring.rsplit('.').next().unwrap_or(declaring);
        info!("[AOP] {}{}方法: {}.{}", phase, layer, simple_name, join_point.method_name());
        Ok(())
    }
}

impl ComponentDefinition for LoggingAspect {
    fn component_descriptor() -> ComponentDescriptor {
        ComponentDescriptor::builder::<Self>(Stereotype::Aspect)
            .default_constructor(Self::default)
            .aspect(1)
            .before(
                "log_before_service",
                "example_app.service.*.*",
                |a: &LoggingAspect, jp: &JoinPoint| a.log("调用前 ", "服务", jp),
            )
            .after(
                "log_after_service",
                "example_app.service.*.*",
                |a: &LoggingAspect, jp: &JoinPoint| a.log("调用后 ", "服务", jp),
            )
            .before(
                "log_before_repository",
                "example_app.repository.*.*",
                |a: &LoggingAspect, jp: &JoinPoint| a.log("调用前 ", "仓储", jp),
            )
            .after(
                "log_after_repository",
                "example_app.repository.*.*",
                |a: &LoggingAspect, jp: &JoinPoint| a.log("调用后 ", "仓储", jp),
            )
            .build()
    }
}

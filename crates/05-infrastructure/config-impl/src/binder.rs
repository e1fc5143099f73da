//! 默认配置绑定器实现

use config_abstractions::{ConfigurationBinder, PropertySource};
use infrastructure_common::{ConfigError, ConfigResult, TypedValue, ValueKind};
use std::fmt::Display;
use std::sync::Arc;
use tracing::debug;

/// 默认配置绑定器
#[derive(Debug, Clone)]
pub struct DefaultConfigurationBinder {
    source: Arc<dyn PropertySource>,
}

impl DefaultConfigurationBinder {
    /// 创建新的配置绑定器
    pub fn new(source: Arc<dyn PropertySource>) -> Self {
        Self { source }
    }

    /// 获取底层配置源
    pub fn source(&self) -> &Arc<dyn PropertySource> {
        &self.source
    }
}

impl ConfigurationBinder for DefaultConfigurationBinder {
    fn get(&self, key: &str) -> Option<String> {
        self.source.get(key)
    }

    fn bind(&self, raw: &str, kind: ValueKind) -> ConfigResult<TypedValue> {
        convert(raw, kind)
    }
}

/// 将字符串转换为目标类型
///
/// 布尔值采用宽松规则：忽略大小写等于 `"true"` 时为 `true`，其余任何文本都是
/// `false`，不会报错。整数按原文解析（不去除空白），浮点数先去除两端空白。
pub fn convert(raw: &str, kind: ValueKind) -> ConfigResult<TypedValue> {
    debug!("转换配置值: '{}' -> {}", raw, kind);

    match kind {
        ValueKind::Text => Ok(TypedValue::Text(raw.to_string())),
        ValueKind::Integer => raw
            .parse::<i32>()
            .map(TypedValue::Integer)
            .map_err(|e| conversion_error(raw, kind, e)),
        ValueKind::Long => raw
            .parse::<i64>()
            .map(TypedValue::Long)
            .map_err(|e| conversion_error(raw, kind, e)),
        ValueKind::Boolean => Ok(TypedValue::Boolean(raw.eq_ignore_ascii_case("true"))),
        ValueKind::Double => raw
            .trim()
            .parse::<f64>()
            .map(TypedValue::Double)
            .map_err(|e| conversion_error(raw, kind, e)),
        ValueKind::Float => raw
            .trim()
            .parse::<f32>()
            .map(TypedValue::Float)
            .map_err(|e| conversion_error(raw, kind, e)),
    }
}

fn conversion_error(raw: &str, target: ValueKind, error: impl Display) -> ConfigError {
    ConfigError::TypeConversion {
        key: None,
        value: raw.to_string(),
        target,
        message: error.to_string(),
    }
}

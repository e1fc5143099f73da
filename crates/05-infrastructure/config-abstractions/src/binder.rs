//! 配置绑定器抽象接口

use infrastructure_common::{Bindable, ConfigError, ConfigResult, TypedValue, ValueKind};

/// 配置绑定器 trait
///
/// 读取字符串配置并转换为值注入点所需的类型。
pub trait ConfigurationBinder: Send + Sync {
    /// 获取原始配置值
    fn get(&self, key: &str) -> Option<String>;

    /// 将原始字符串转换为目标类型
    fn bind(&self, raw: &str, kind: ValueKind) -> ConfigResult<TypedValue>;

    /// 读取配置键并转换，键不存在时返回 [`ConfigError::MissingProperty`]
    fn bind_key(&self, key: &str, kind: ValueKind) -> ConfigResult<TypedValue> {
        let raw = self
            .get(key)
            .ok_or_else(|| ConfigError::missing_property(key))?;
        self.bind(&raw, kind).map_err(|e| e.with_key(key))
    }
}

impl dyn ConfigurationBinder + '_ {
    /// 读取配置键并转换为具体的 Rust 类型
    pub fn bind_value<T: Bindable>(&self, key: &str) -> ConfigResult<T> {
        let typed = self.bind_key(key, T::KIND)?;
        let kind = typed.kind();
        T::from_typed(typed).ok_or_else(|| ConfigError::TypeConversion {
            key: Some(key.to_string()),
            value: format!("{kind}"),
            target: T::KIND,
            message: "绑定器返回了不匹配的类型".to_string(),
        })
    }
}

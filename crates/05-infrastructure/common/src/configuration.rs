//! 配置值类型定义
//!
//! 值注入点的目标类型以及字符串配置转换后的结果

use std::fmt;

/// 值注入的目标类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// 文本
    Text,
    /// 32 位整数
    Integer,
    /// 64 位整数
    Long,
    /// 布尔值
    Boolean,
    /// 双精度浮点数
    Double,
    /// 单精度浮点数
    Float,
}

impl ValueKind {
    /// 类型名称
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Long => "long",
            Self::Boolean => "boolean",
            Self::Double => "double",
            Self::Float => "float",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 转换后的配置值
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Text(String),
    Integer(i32),
    Long(i64),
    Boolean(bool),
    Double(f64),
    Float(f32),
}

impl TypedValue {
    /// 值对应的目标类型
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Text(_) => ValueKind::Text,
            Self::Integer(_) => ValueKind::Integer,
            Self::Long(_) => ValueKind::Long,
            Self::Boolean(_) => ValueKind::Boolean,
            Self::Double(_) => ValueKind::Double,
            Self::Float(_) => ValueKind::Float,
        }
    }
}

/// 可绑定到值注入点的 Rust 类型
pub trait Bindable: Sized + Send + Sync + 'static {
    /// 对应的目标类型
    const KIND: ValueKind;

    /// 从转换结果中取出值，类型不符时返回 `None`
    fn from_typed(value: TypedValue) -> Option<Self>;
}

macro_rules! impl_bindable {
    ($ty:ty, $kind:ident) => {
        impl Bindable for $ty {
            const KIND: ValueKind = ValueKind::$kind;

            fn from_typed(value: TypedValue) -> Option<Self> {
                match value {
                    TypedValue::$kind(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

impl_bindable!(String, Text);
impl_bindable!(i32, Integer);
impl_bindable!(i64, Long);
impl_bindable!(bool, Boolean);
impl_bindable!(f64, Double);
impl_bindable!(f32, Float);

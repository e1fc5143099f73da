//! 切点表达式

use infrastructure_common::TypeInfo;
use regex::Regex;
use std::fmt;

/// 切点
///
/// 不含 `*` 时按字符串完全相等匹配；含 `*` 时 `*` 匹配任意字符序列，
/// 且必须匹配整个标识符而不是子串。
#[derive(Clone)]
pub struct Pointcut {
    pattern: String,
    glob: Option<Regex>,
}

impl Pointcut {
    /// 编译切点表达式
    pub fn compile(pattern: impl Into<String>) -> Result<Self, regex::Error> {
        let pattern = pattern.into();
        let glob = if pattern.contains('*') {
            let body = pattern
                .split('*')
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(".*");
            Some(Regex::new(&format!("(?s)^{body}$"))?)
        } else {
            None
        };

        Ok(Self { pattern, glob })
    }

    /// 是否匹配方法标识符
    pub fn matches(&self, identifier: &str) -> bool {
        match &self.glob {
            Some(regex) => regex.is_match(identifier),
            None => self.pattern == identifier,
        }
    }

    /// 原始表达式
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// 是否含通配符
    pub fn is_wildcard(&self) -> bool {
        self.glob.is_some()
    }
}

impl fmt::Debug for Pointcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pointcut").field(&self.pattern).finish()
    }
}

impl fmt::Display for Pointcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

/// 方法标识符：`<以点号分隔的类型路径>.<方法名>`
///
/// 例如 `method_identifier::<app::service::UserService>("find_all")`
/// 得到 `app.service.UserService.find_all`。
pub fn method_identifier<T: ?Sized + 'static>(method: &str) -> String {
    format!("{}.{}", TypeInfo::of::<T>().dotted_path(), method)
}

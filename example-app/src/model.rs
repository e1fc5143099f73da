//! 领域模型

use std::fmt;

/// 用户
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// 用户ID，未保存时为 `None`
    pub id: Option<u64>,
    /// 姓名
    pub name: String,
    /// 邮箱
    pub email: String,
}

impl User {
    /// 创建新用户
    pub fn new(id: Option<u64>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
        }
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "User{{id={}, name='{}', email='{}'}}", id, self.name, self.email),
            None => write!(f, "User{{id=?, name='{}', email='{}'}}", self.name, self.email),
        }
    }
}

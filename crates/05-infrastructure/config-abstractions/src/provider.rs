//! 配置源抽象接口

use std::fmt;

/// 配置源 trait
///
/// 定义从不同数据源读取字符串配置的统一接口。配置源在容器启动期间只读，
/// 所有操作均为同步的内存查找。
pub trait PropertySource: Send + Sync {
    /// 获取配置值
    fn get(&self, key: &str) -> Option<String>;

    /// 检查配置键是否存在
    fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// 获取所有配置键
    fn keys(&self) -> Vec<String>;

    /// 获取配置源名称
    fn name(&self) -> &str;

    /// 获取配置源优先级，数值越大越优先
    fn priority(&self) -> i32 {
        0
    }
}

impl fmt::Debug for dyn PropertySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertySource")
            .field("name", &self.name())
            .field("priority", &self.priority())
            .finish()
    }
}

/// 配置源优先级常量
pub mod priority {
    /// 默认配置文件
    pub const DEFAULT_FILE: i32 = 50;
    /// 显式指定的配置文件
    pub const FILE: i32 = 100;
    /// 环境变量
    pub const ENVIRONMENT: i32 = 200;
    /// 程序内覆盖
    pub const PROGRAMMATIC: i32 = 300;
}

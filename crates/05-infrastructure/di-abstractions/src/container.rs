//! 容器统计信息

use chrono::{DateTime, Utc};
use std::time::Duration;
use uuid::Uuid;

/// 容器统计信息
#[derive(Debug, Clone)]
pub struct ContainerStats {
    /// 容器标识
    pub container_id: Uuid,
    /// 启动时间
    pub started_at: DateTime<Utc>,
    /// Bean 数量
    pub bean_count: usize,
    /// 切面 Bean 数量
    pub aspect_count: usize,
    /// 已索引的通知数量
    pub advice_count: usize,
    /// 启动耗时
    pub startup_duration: Duration,
}

impl ContainerStats {
    /// 创建统计信息
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            container_id: Uuid::new_v4(),
            started_at,
            bean_count: 0,
            aspect_count: 0,
            advice_count: 0,
            startup_duration: Duration::ZERO,
        }
    }

    /// 启动耗时（毫秒）
    pub fn startup_millis(&self) -> u128 {
        self.startup_duration.as_millis()
    }
}

//! 应用配置 Bean

use di_abstractions::{ComponentDefinition, ComponentDescriptor, Value};
use infrastructure_common::Stereotype;

/// 应用配置，所有字段由配置值注入
#[derive(Debug, Default)]
pub struct AppConfig {
    app_name: Value<String>,
    app_version: Value<String>,
    debug_mode: Value<bool>,
    server_port: Value<i32>,
    user_management_enabled: Value<bool>,
    database_host: Value<String>,
    database_port: Value<i32>,
}

impl AppConfig {
    /// 应用名称
    pub fn app_name(&self) -> &str {
        self.app_name.get().map_or("", String::as_str)
    }

    /// 应用版本
    pub fn app_version(&self) -> &str {
        self.app_version.get().map_or("", String::as_str)
    }

    /// 是否调试模式
    pub fn is_debug_mode(&self) -> bool {
        self.debug_mode.get_or(false)
    }

    /// 服务端口
    pub fn server_port(&self) -> i32 {
        self.server_port.get_or(0)
    }

    /// 是否启用用户管理
    pub fn is_user_management_enabled(&self) -> bool {
        self.user_management_enabled.get_or(false)
    }

    /// 数据库主机
    pub fn database_host(&self) -> &str {
        self.database_host.get().map_or("", String::as_str)
    }

    /// 数据库端口
    pub fn database_port(&self) -> i32 {
        self.database_port.get_or(0)
    }

    /// 打印配置
    pub fn print_configuration(&self) {
        println!("=== 应用配置 ===");
        println!("应用名称: {}", self.app_name());
        println!("应用版本: {}", self.app_version());
        println!("调试模式: {}", self.is_debug_mode());
        println!("服务端口: {}", self.server_port());
        println!("用户管理: {}", self.is_user_management_enabled());
        println!("数据库主机: {}", self.database_host());
        println!("数据库端口: {}", self.database_port());
        println!("================");
    }
}

impl ComponentDefinition for AppConfig {
    fn component_descriptor() -> ComponentDescriptor {
        ComponentDescriptor::builder::<Self>(Stereotype::Configuration)
            .default_constructor(Self::default)
            .value("app_name", "app.name", |c: &AppConfig| &c.app_name)
            .value("app_version", "app.version", |c: &AppConfig| &c.app_version)
            .value("debug_mode", "app.debug", |c: &AppConfig| &c.debug_mode)
            .value("server_port", "server.port", |c: &AppConfig| &c.server_port)
            .value(
                "user_management_enabled",
                "feature.user.management",
                |c: &AppConfig| &c.user_management_enabled,
            )
            .value("database_host", "db.host", |c: &AppConfig| &c.database_host)
            .value("database_port", "db.port", |c: &AppConfig| &c.database_port)
            .build()
    }
}

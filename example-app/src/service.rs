//! 用户服务

use crate::config::AppConfig;
use crate::model::User;
use crate::repository::UserRepository;
use anyhow::{bail, Result};
use di_abstractions::{Autowired, ComponentDefinition, ComponentDescriptor};
use infrastructure_common::Stereotype;
use std::sync::Arc;

/// 用户业务逻辑
///
/// 仓储通过构造器注入，配置通过字段注入。
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    config: Autowired<AppConfig>,
}

impl UserService {
    /// 由仓储创建服务
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self {
            repository,
            config: Autowired::new(),
        }
    }

    /// 所有用户
    pub fn get_all_users(&self) -> Vec<User> {
        self.repository.find_all()
    }

    /// 按ID获取用户
    pub fn get_user_by_id(&self, id: u64) -> Option<User> {
        self.repository.find_by_id(id)
    }

    /// 创建用户
    pub fn create_user(&self, name: &str, email: &str) -> Result<User> {
        self.ensure_enabled()?;
        Ok(self.repository.save(User::new(None, name, email)))
    }

    /// 更新用户
    pub fn update_user(&self, id: u64, name: &str, email: &str) -> Result<User> {
        self.ensure_enabled()?;
        let Some(mut user) = self.repository.find_by_id(id) else {
            bail!("用户不存在: {}", id);
        };
        user.name = name.to_string();
        user.email = email.to_string();
        Ok(self.repository.save(user))
    }

    /// 删除用户
    pub fn delete_user(&self, id: u64) -> Result<()> {
        self.ensure_enabled()?;
        self.repository.delete_by_id(id);
        Ok(())
    }

    /// 按姓名搜索
    pub fn search_users_by_name(&self, name: &str) -> Vec<User> {
        self.repository.find_by_name(name)
    }

    /// 用户数量
    pub fn user_count(&self) -> usize {
        self.repository.find_all().len()
    }

    fn ensure_enabled(&self) -> Result<()> {
        match self.config.get() {
            Some(config) if config.is_user_management_enabled() => Ok(()),
            Some(_) => bail!("用户管理功能未启用 (feature.user.management=false)"),
            None => bail!("应用配置尚未注入"),
        }
    }
}

impl ComponentDefinition for UserService {
    fn component_descriptor() -> ComponentDescriptor {
        ComponentDescriptor::builder::<Self>(Stereotype::Service)
            .constructor_param::<dyn UserRepository>("repository")
            .autowired_constructor(|args| Ok(UserService::new(args.get::<dyn UserRepository>(0)?)))
            .autowired("config", |s: &UserService| &s.config)
            .build()
    }
}

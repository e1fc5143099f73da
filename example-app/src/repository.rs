//! 用户仓储

use crate::model::User;
use di_abstractions::{ComponentDefinition, ComponentDescriptor};
use infrastructure_common::Stereotype;
use std::sync::{Arc, PoisonError, RwLock};

/// 用户仓储接口
pub trait UserRepository: Send + Sync {
    /// 所有用户
    fn find_all(&self) -> Vec<User>;

    /// 按ID查找
    fn find_by_id(&self, id: u64) -> Option<User>;

    /// 保存用户，没有ID时分配新ID
    fn save(&self, user: User) -> User;

    /// 按ID删除
    fn delete_by_id(&self, id: u64);

    /// 按姓名模糊查找，忽略大小写
    fn find_by_name(&self, name: &str) -> Vec<User>;
}

/// 内存用户仓储
#[derive(Debug)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserRepository {
    /// 创建带示例数据的仓储
    pub fn new() -> Self {
        Self {
            users: RwLock::new(vec![
                User::new(Some(1), "John Doe", "john@example.com"),
                User::new(Some(2), "Jane Smith", "jane@example.com"),
                User::new(Some(3), "Bob Johnson", "bob@example.com"),
            ]),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl UserRepository for InMemoryUserRepository {
    fn find_all(&self) -> Vec<User> {
        self.users
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn find_by_id(&self, id: u64) -> Option<User> {
        self.users
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|user| user.id == Some(id))
            .cloned()
    }

    fn save(&self, mut user: User) -> User {
        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        match user.id {
            Some(id) => {
                if let Some(existing) = users.iter_mut().find(|u| u.id == Some(id)) {
                    *existing = user.clone();
                    return user;
                }
            }
            None => {
                let next = users.iter().filter_map(|u| u.id).max().unwrap_or(0) + 1;
                user.id = Some(next);
            }
        }
        users.push(user.clone());
        user
    }

    fn delete_by_id(&self, id: u64) {
        self.users
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|user| user.id != Some(id));
    }

    fn find_by_name(&self, name: &str) -> Vec<User> {
        let needle = name.to_lowercase();
        self.users
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|user| user.name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }
}

impl ComponentDefinition for InMemoryUserRepository {
    fn component_descriptor() -> ComponentDescriptor {
        ComponentDescriptor::builder::<Self>(Stereotype::Repository)
            .named("userRepository")
            .default_constructor(Self::new)
            .capability::<dyn UserRepository, _>(|r| r as Arc<dyn UserRepository>)
            .build()
    }
}

//! 命名约定
//!
//! Bean 默认名称的推导规则

use crate::metadata::TypeInfo;

/// 命名约定
#[derive(Debug)]
pub struct NamingConventions;

impl NamingConventions {
    /// 默认 Bean 名称：类型短名称首字母小写，例如 `UserService` -> `userService`
    pub fn default_bean_name(type_info: &TypeInfo) -> String {
        Self::lower_camel(type_info.short_name())
    }

    /// 带模块路径的 Bean 名称，用于默认名称冲突时，
    /// 例如 `app::repo::UserRepository` -> `app.repo.userRepository`
    ///
    /// 泛型参数保留在名称中，同一泛型的不同实例化互不冲突，
    /// 例如 `app::Wrapper<u8>` -> `app.wrapper<u8>`。
    pub fn qualified_bean_name(type_info: &TypeInfo) -> String {
        let mut name = Self::default_bean_name(type_info);
        name.push_str(&type_info.generic_args().replace("::", ".").replace(' ', ""));
        match type_info.module_path() {
            "" => name,
            module => format!("{}.{}", module.replace("::", "."), name),
        }
    }

    /// 首字母小写
    pub fn lower_camel(name: &str) -> String {
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_lowercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod repo {
        pub struct UserRepository;
        pub struct Page<T>(pub T);
    }

    #[test]
    fn test_default_bean_name() {
        let info = TypeInfo::of::<repo::UserRepository>();
        assert_eq!(NamingConventions::default_bean_name(&info), "userRepository");
    }

    #[test]
    fn test_qualified_bean_name() {
        let info = TypeInfo::of::<repo::UserRepository>();
        let name = NamingConventions::qualified_bean_name(&info);
        assert!(name.starts_with("infrastructure_common."));
        assert!(name.ends_with("tests.repo.userRepository"));
    }

    /// 测试泛型参数保留在带模块路径的名称中
    #[test]
    fn test_qualified_bean_name_keeps_generic_arguments() {
        let small = NamingConventions::qualified_bean_name(&TypeInfo::of::<repo::Page<u8>>());
        let wide = NamingConventions::qualified_bean_name(&TypeInfo::of::<repo::Page<u16>>());
        let nested = NamingConventions::qualified_bean_name(&TypeInfo::of::<repo::Page<repo::UserRepository>>());

        assert!(small.ends_with("tests.repo.page<u8>"), "实际名称: {small}");
        assert!(wide.ends_with("tests.repo.page<u16>"), "实际名称: {wide}");
        assert!(nested.ends_with("tests.repo.UserRepository>"), "实际名称: {nested}");
        assert!(!nested.contains("::"), "路径分隔符应统一为点号");
        assert_ne!(small, wide, "不同实例化的名称不应相同");
    }

    #[test]
    fn test_lower_camel_edge_cases() {
        assert_eq!(NamingConventions::lower_camel(""), "");
        assert_eq!(NamingConventions::lower_camel("A"), "a");
        assert_eq!(NamingConventions::lower_camel("URLFetcher"), "uRLFetcher");
    }
}

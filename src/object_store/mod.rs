//! 对象存储层
//!
//! 附件、提交文件与头像都以对象键寻址。后端通过注册表按名称选择：
//! - `local`: 本地文件系统目录
//! - `memory`: 进程内映射，用于测试与临时部署

pub mod backends;
pub mod keys;
pub mod register;

use async_trait::async_trait;

use crate::errors::{ClassroomError, Result};

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// 写入对象，已存在时覆盖
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<()>;

    /// 读取对象，不存在时返回 None
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// 删除对象，不存在视为成功
    async fn delete(&self, key: &str) -> Result<()>;

    /// 删除前缀下的全部对象，返回删除数量
    async fn delete_prefix(&self, prefix: &str) -> Result<usize>;

    /// 对象的公开访问地址
    fn public_url(&self, key: &str) -> String;
}

/// 校验对象键：相对路径、无空段、无 `..`
pub fn validate_object_key(key: &str) -> Result<()> {
    if key.is_empty() || key.len() > 1024 {
        return Err(ClassroomError::validation("Invalid object key length"));
    }
    if key.starts_with('/') || key.contains('\\') {
        return Err(ClassroomError::validation("Object key must be relative"));
    }
    if key
        .split('/')
        .any(|seg| seg.is_empty() || seg == "." || seg == "..")
    {
        return Err(ClassroomError::validation(format!(
            "Invalid object key: {key}"
        )));
    }
    if key.chars().any(|c| c.is_control()) {
        return Err(ClassroomError::validation(
            "Object key contains control characters",
        ));
    }
    Ok(())
}

/// 前缀必须以 `/` 结尾，避免 `classrooms/1` 误删 `classrooms/10`
pub fn validate_object_prefix(prefix: &str) -> Result<()> {
    if !prefix.ends_with('/') {
        return Err(ClassroomError::validation(format!(
            "Object prefix must end with '/': {prefix}"
        )));
    }
    validate_object_key(prefix.trim_end_matches('/'))
}

/// 根据配置的后端名称创建对象存储
pub async fn create_object_store(
    config: &crate::config::ObjectStoreConfig,
) -> Result<std::sync::Arc<dyn ObjectStore>> {
    register::debug_object_store_registry();

    let constructor = register::get_object_store_plugin(&config.backend).ok_or_else(|| {
        ClassroomError::object_store_plugin_not_found(format!(
            "Object store backend '{}' is not registered",
            config.backend
        ))
    })?;

    let store = constructor(config.clone()).await?;
    Ok(std::sync::Arc::from(store))
}

/// 声明对象存储插件，类型需提供 `async fn from_config(&ObjectStoreConfig) -> Result<Self>`
#[macro_export]
macro_rules! declare_object_store_plugin {
    ($name:expr, $ty:ty) => {
        const _: () = {
            #[::ctor::ctor]
            unsafe fn register() {
                $crate::object_store::register::register_object_store_plugin(
                    $name,
                    std::sync::Arc::new(
                        |config: $crate::config::ObjectStoreConfig|
                         -> $crate::object_store::register::BoxedObjectStoreFuture {
                        Box::pin(async move {
                            let store = <$ty>::from_config(&config).await?;
                            Ok(Box::new(store) as Box<dyn $crate::object_store::ObjectStore>)
                        })
                    }),
                );
            }
        };
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_object_key() {
        assert!(validate_object_key("avatars/1/abc.png").is_ok());
        assert!(validate_object_key("").is_err());
        assert!(validate_object_key("/etc/passwd").is_err());
        assert!(validate_object_key("avatars/../secret").is_err());
        assert!(validate_object_key("avatars//x").is_err());
        assert!(validate_object_key("a\\b").is_err());
    }

    #[test]
    fn test_validate_object_prefix() {
        assert!(validate_object_prefix("classrooms/1/").is_ok());
        assert!(validate_object_prefix("classrooms/1").is_err());
        assert!(validate_object_prefix("/").is_err());
    }

    #[tokio::test]
    async fn test_create_memory_store_from_registry() {
        let config = crate::config::ObjectStoreConfig {
            backend: "memory".to_string(),
            root: String::new(),
            public_base_url: "http://localhost/public".to_string(),
            max_size: 1024,
            allowed_types: vec![],
        };
        let store = create_object_store(&config).await.unwrap();
        store.put("avatars/1/a.png", vec![1]).await.unwrap();
        assert_eq!(store.get("avatars/1/a.png").await.unwrap(), Some(vec![1]));
        assert_eq!(
            store.public_url("avatars/1/a.png"),
            "http://localhost/public/avatars/1/a.png"
        );
    }

    #[tokio::test]
    async fn test_unknown_backend() {
        let config = crate::config::ObjectStoreConfig {
            backend: "s3".to_string(),
            root: String::new(),
            public_base_url: String::new(),
            max_size: 1024,
            allowed_types: vec![],
        };
        let err = create_object_store(&config).await.err().unwrap();
        assert_eq!(err.code(), "E010");
    }
}

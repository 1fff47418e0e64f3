use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::config::ObjectStoreConfig;
use crate::declare_object_store_plugin;
use crate::errors::{ClassroomError, Result};
use crate::object_store::{ObjectStore, validate_object_key, validate_object_prefix};

declare_object_store_plugin!("local", LocalObjectStore);

/// 本地文件系统对象存储，对象键即根目录下的相对路径
pub struct LocalObjectStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalObjectStore {
    pub async fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await.map_err(|e| {
            ClassroomError::object_store(format!(
                "Failed to create object store root {}: {e}",
                root.display()
            ))
        })?;
        debug!("Local object store rooted at {}", root.display());

        Ok(Self {
            root,
            public_base_url: public_base_url.into(),
        })
    }

    pub async fn from_config(config: &ObjectStoreConfig) -> Result<Self> {
        Self::new(&config.root, config.public_base_url.clone()).await
    }

    fn path_of(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

/// 删除后向上清理空目录，直到根目录
async fn prune_empty_dirs(root: &Path, start: Option<&Path>) {
    let mut current = start.map(Path::to_path_buf);
    while let Some(dir) = current {
        if dir == root || !dir.starts_with(root) {
            break;
        }
        // 非空目录删除失败即停止
        if tokio::fs::remove_dir(&dir).await.is_err() {
            break;
        }
        current = dir.parent().map(Path::to_path_buf);
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<()> {
        validate_object_key(key)?;
        let path = self.path_of(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                ClassroomError::object_store(format!("Failed to create directory for {key}: {e}"))
            })?;
        }
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| ClassroomError::object_store(format!("Failed to write {key}: {e}")))
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        validate_object_key(key)?;
        match tokio::fs::read(self.path_of(key)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ClassroomError::object_store(format!(
                "Failed to read {key}: {e}"
            ))),
        }
    }

    async fn delete(&self, key: &str) -> Result<()> {
        validate_object_key(key)?;
        let path = self.path_of(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                prune_empty_dirs(&self.root, path.parent()).await;
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ClassroomError::object_store(format!(
                "Failed to delete {key}: {e}"
            ))),
        }
    }

    async fn delete_prefix(&self, prefix: &str) -> Result<usize> {
        validate_object_prefix(prefix)?;
        let dir = self.path_of(prefix.trim_end_matches('/'));

        // 先统计文件数量再整体删除
        let mut count = 0;
        let mut pending = vec![dir.clone()];
        while let Some(current) = pending.pop() {
            let mut entries = match tokio::fs::read_dir(&current).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => {
                    return Err(ClassroomError::object_store(format!(
                        "Failed to list {prefix}: {e}"
                    )));
                }
            };
            while let Some(entry) = entries.next_entry().await? {
                if entry.file_type().await?.is_dir() {
                    pending.push(entry.path());
                } else {
                    count += 1;
                }
            }
        }

        match tokio::fs::remove_dir_all(&dir).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => {
                return Err(ClassroomError::object_store(format!(
                    "Failed to delete prefix {prefix}: {e}"
                )));
            }
        }
        prune_empty_dirs(&self.root, dir.parent()).await;
        Ok(count)
    }

    fn public_url(&self, key: &str) -> String {
        super::join_public_url(&self.public_base_url, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("classroom-objects-{name}-{}", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_put_get_delete() {
        let root = temp_root("basic");
        let store = LocalObjectStore::new(&root, "http://localhost").await.unwrap();

        store
            .put("classrooms/1/assignments/2/attachments/x-a.txt", b"hi".to_vec())
            .await
            .unwrap();
        assert_eq!(
            store
                .get("classrooms/1/assignments/2/attachments/x-a.txt")
                .await
                .unwrap(),
            Some(b"hi".to_vec())
        );

        store
            .delete("classrooms/1/assignments/2/attachments/x-a.txt")
            .await
            .unwrap();
        assert_eq!(
            store
                .get("classrooms/1/assignments/2/attachments/x-a.txt")
                .await
                .unwrap(),
            None
        );
        // 空目录被清理
        assert!(!root.join("classrooms").exists());

        let _ = tokio::fs::remove_dir_all(&root).await;
    }

    #[tokio::test]
    async fn test_delete_prefix() {
        let root = temp_root("prefix");
        let store = LocalObjectStore::new(&root, "http://localhost").await.unwrap();

        store.put("classrooms/1/a/x", vec![1]).await.unwrap();
        store.put("classrooms/1/b/y", vec![2]).await.unwrap();
        store.put("classrooms/10/a/z", vec![3]).await.unwrap();

        assert_eq!(store.delete_prefix("classrooms/1/").await.unwrap(), 2);
        assert_eq!(store.get("classrooms/10/a/z").await.unwrap(), Some(vec![3]));
        assert_eq!(store.delete_prefix("classrooms/99/").await.unwrap(), 0);

        let _ = tokio::fs::remove_dir_all(&root).await;
    }

    #[tokio::test]
    async fn test_put_key_from_longest_filename() {
        use crate::object_store::keys::{attachment_key, submission_key};
        use crate::object_store::validate_object_key;
        use crate::utils::validate::{MAX_FILENAME_BYTES, sanitize_filename};

        let root = temp_root("long-name");
        let store = LocalObjectStore::new(&root, "http://localhost").await.unwrap();

        let filename =
            sanitize_filename(&format!("{}.pdf", "a".repeat(MAX_FILENAME_BYTES - 4))).unwrap();
        assert_eq!(filename.len(), MAX_FILENAME_BYTES);

        for key in [attachment_key(1, 2, &filename), submission_key(1, 2, 3, &filename)] {
            validate_object_key(&key).unwrap();
            store.put(&key, b"pdf".to_vec()).await.unwrap();
            assert_eq!(store.get(&key).await.unwrap(), Some(b"pdf".to_vec()));
        }

        let _ = tokio::fs::remove_dir_all(&root).await;
    }

    #[tokio::test]
    async fn test_rejects_traversal() {
        let root = temp_root("traversal");
        let store = LocalObjectStore::new(&root, "http://localhost").await.unwrap();
        assert!(store.put("../escape", vec![1]).await.is_err());
        let _ = tokio::fs::remove_dir_all(&root).await;
    }
}

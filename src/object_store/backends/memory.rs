use async_trait::async_trait;
use dashmap::DashMap;

use crate::config::ObjectStoreConfig;
use crate::declare_object_store_plugin;
use crate::errors::Result;
use crate::object_store::{ObjectStore, validate_object_key, validate_object_prefix};

declare_object_store_plugin!("memory", MemoryObjectStore);

/// 进程内对象存储，重启即丢失
pub struct MemoryObjectStore {
    objects: DashMap<String, Vec<u8>>,
    public_base_url: String,
}

impl MemoryObjectStore {
    pub fn new(public_base_url: impl Into<String>) -> Self {
        Self {
            objects: DashMap::new(),
            public_base_url: public_base_url.into(),
        }
    }

    pub async fn from_config(config: &ObjectStoreConfig) -> Result<Self> {
        Ok(Self::new(config.public_base_url.clone()))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.contains_key(key)
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<()> {
        validate_object_key(key)?;
        self.objects.insert(key.to_string(), bytes);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        validate_object_key(key)?;
        Ok(self.objects.get(key).map(|v| v.value().clone()))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        validate_object_key(key)?;
        self.objects.remove(key);
        Ok(())
    }

    async fn delete_prefix(&self, prefix: &str) -> Result<usize> {
        validate_object_prefix(prefix)?;
        let before = self.objects.len();
        self.objects.retain(|k, _| !k.starts_with(prefix));
        Ok(before - self.objects.len())
    }

    fn public_url(&self, key: &str) -> String {
        super::join_public_url(&self.public_base_url, key)
    }
}

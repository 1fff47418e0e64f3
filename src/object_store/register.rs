use crate::config::ObjectStoreConfig;
use crate::errors::Result;
use crate::object_store::ObjectStore;
use once_cell::sync::Lazy;
use std::{
    collections::HashMap,
    future::Future,
    pin::Pin,
    sync::{Arc, RwLock},
};

pub type BoxedObjectStoreFuture =
    Pin<Box<dyn Future<Output = Result<Box<dyn ObjectStore>>> + Send>>;
pub type ObjectStoreConstructor =
    Arc<dyn Fn(ObjectStoreConfig) -> BoxedObjectStoreFuture + Send + Sync>;

static OBJECT_STORE_REGISTRY: Lazy<RwLock<HashMap<String, ObjectStoreConstructor>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

pub fn register_object_store_plugin<S: Into<String>>(name: S, constructor: ObjectStoreConstructor) {
    let mut registry = OBJECT_STORE_REGISTRY
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    registry.insert(name.into(), constructor);
}

pub fn get_object_store_plugin(name: &str) -> Option<ObjectStoreConstructor> {
    OBJECT_STORE_REGISTRY
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .get(name)
        .cloned()
}

pub fn debug_object_store_registry() {
    let registry = OBJECT_STORE_REGISTRY
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if registry.is_empty() {
        tracing::debug!("No object store plugins registered.");
    } else {
        let mut names: Vec<&String> = registry.keys().collect();
        names.sort();
        tracing::debug!("Registered object store plugins: {:?}", names);
    }
}

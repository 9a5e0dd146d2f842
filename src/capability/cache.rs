//! Caching of processed group content.

use std::collections::HashMap;

use parking_lot::RwLock;

use super::ResourceType;
use crate::injector::InjectionTarget;
use crate::proxy::Proxy;

/// Identifies one processed variant of a group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub group_name: String,
    pub kind: ResourceType,
    pub minimize: bool,
}

impl CacheKey {
    pub fn new(group_name: impl Into<String>, kind: ResourceType, minimize: bool) -> Self {
        Self {
            group_name: group_name.into(),
            kind,
            minimize,
        }
    }
}

/// Processed content together with its fingerprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheValue {
    pub content: String,
    pub hash: String,
}

pub trait CacheStrategy: Send + Sync {
    fn get(&self, key: &CacheKey) -> Option<CacheValue>;

    fn put(&self, key: CacheKey, value: CacheValue);

    fn clear(&self);

    fn destroy(&self) {
        self.clear();
    }

    fn as_target(&self) -> Option<&dyn InjectionTarget> {
        None
    }
}

impl CacheStrategy for Proxy<dyn CacheStrategy> {
    fn get(&self, key: &CacheKey) -> Option<CacheValue> {
        self.delegate().get(key)
    }

    fn put(&self, key: CacheKey, value: CacheValue) {
        self.delegate().put(key, value)
    }

    fn clear(&self) {
        self.delegate().clear()
    }

    fn destroy(&self) {
        self.delegate().destroy()
    }

    fn as_target(&self) -> Option<&dyn InjectionTarget> {
        self.delegate().as_target()
    }
}

crate::forwarding!(CacheStrategy);

/// Unbounded in-memory cache.
#[derive(Default)]
pub struct MemoryCacheStrategy {
    entries: RwLock<HashMap<CacheKey, CacheValue>>,
}

impl MemoryCacheStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheStrategy for MemoryCacheStrategy {
    fn get(&self, key: &CacheKey) -> Option<CacheValue> {
        self.entries.read().get(key).cloned()
    }

    fn put(&self, key: CacheKey, value: CacheValue) {
        self.entries.write().insert(key, value);
    }

    fn clear(&self) {
        self.entries.write().clear();
    }
}

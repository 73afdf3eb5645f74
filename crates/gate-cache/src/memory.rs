//! In-memory certificate cache.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::CacheResult;
use crate::provider::{CertKeyCacheReader, CertKeyCacheWriter};

/// Process-local certificate cache.
///
/// Entries never expire; suitable for tests and single-process deployments
/// where key rotation is handled by restarting or by an explicit
/// [`InMemoryCertKeyCache::clear`].
#[derive(Debug, Default)]
pub struct InMemoryCertKeyCache {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryCertKeyCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl CertKeyCacheReader for InMemoryCertKeyCache {
    async fn read(&self, key: &str) -> CacheResult<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }
}

#[async_trait]
impl CertKeyCacheWriter for InMemoryCertKeyCache {
    async fn write(&self, key: &str, value: &str) -> CacheResult<()> {
        self.entries.write().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

//! Certificate-cache collaborator traits.

use async_trait::async_trait;

use crate::error::CacheResult;

/// Builds the cache key under which a realm's signing certificate is stored.
#[must_use]
pub fn cert_cache_key(realm_id: &str) -> String {
    format!("{realm_id}:certKey")
}

/// Read side of the certificate cache.
///
/// Implementations must be thread-safe; the gate shares one reader across
/// all in-flight requests. Returning `Ok(None)` means a miss.
#[async_trait]
pub trait CertKeyCacheReader: Send + Sync {
    /// Reads a cached certificate key.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::CacheError`] when the backend is unreachable.
    async fn read(&self, key: &str) -> CacheResult<Option<String>>;
}

/// Write side of the certificate cache.
///
/// Expiration and invalidation policy belong to the implementation; the gate
/// writes without a TTL hint.
#[async_trait]
pub trait CertKeyCacheWriter: Send + Sync {
    /// Stores a resolved certificate key.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::CacheError`] when the backend rejects the write.
    async fn write(&self, key: &str, value: &str) -> CacheResult<()>;
}

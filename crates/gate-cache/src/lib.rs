//! # gate-cache
//!
//! Certificate-cache abstraction for the OIDC gate.
//!
//! The certificate resolver consults an optional external cache before
//! falling back to network discovery; this crate defines the reader/writer
//! collaborator traits and ships an in-memory implementation for tests and
//! single-process deployments. Distributed backends (Redis and the like)
//! implement the same traits and bring their own concurrency and expiration
//! guarantees.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod error;
pub mod memory;
pub mod provider;

pub use error::{CacheError, CacheResult};
pub use memory::InMemoryCertKeyCache;
pub use provider::{cert_cache_key, CertKeyCacheReader, CertKeyCacheWriter};

//! # gate-oidc
//!
//! OpenID Connect plumbing for the OIDC gate: provider metadata discovery,
//! JWKS retrieval and certificate resolution, token parsing and validation,
//! and the claim-based authorization check.
//!
//! ## Modules
//!
//! - [`authorize`] - Route-policy evaluation against a parsed token
//! - [`certkey`] - Signing-certificate resolution with cache collaborators
//! - [`discovery`] - `.well-known/openid-configuration` client
//! - [`jwks`] - JSON Web Key Set document model
//! - [`token`] - Token model and the signature/claims validator

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod authorize;
pub mod certkey;
pub mod discovery;
pub mod jwks;
pub mod token;

pub use authorize::is_authorized;
pub use certkey::CertKeyService;
pub use discovery::{DiscoveryClient, ProviderMetadata, DEFAULT_HTTP_TIMEOUT};
pub use jwks::{JsonWebKey, JsonWebKeySet, KeyType};
pub use token::{Token, TokenHeader, RESERVED_CLAIMS};

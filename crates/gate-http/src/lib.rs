//! # gate-http
//!
//! Axum middleware that authenticates and authorizes inbound requests
//! against an OpenID Connect identity provider.
//!
//! Per request, the middleware looks up the route's policy, extracts the
//! bearer token, resolves the provider's signing certificate (through the
//! optional cache collaborators), validates the token, evaluates the claim
//! policy, and publishes the token's claims into the request extensions for
//! downstream handlers.
//!
//! ```ignore
//! use axum::{middleware, routing::get, Router};
//! use gate_http::{oidc_guard, AuthInformation, OidcGate};
//!
//! let gate = OidcGate::builder(settings).build()?;
//! let app = Router::new()
//!     .route("/orders", get(list_orders))
//!     .layer(middleware::from_fn_with_state(gate, oidc_guard));
//!
//! async fn list_orders(auth: AuthInformation) -> String {
//!     format!("hello {:?}", auth.claim("preferred_username"))
//! }
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod auth_info;
pub mod middleware;

pub use auth_info::AuthInformation;
pub use middleware::{oidc_guard, OidcGate, OidcGateBuilder};

// Re-export the pieces applications wire into the builder.
pub use gate_cache::{CertKeyCacheReader, CertKeyCacheWriter, InMemoryCertKeyCache};
pub use gate_core::{
    AuthError, AuthResultHandler, AuthServiceSettings, ConfigError, ErrorOverrides, GateSettings,
    RoutePolicy, RouteTable, ValidationResult,
};

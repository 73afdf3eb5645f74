//! `OpenID` Connect Discovery client.
//!
//! Fetches the identity provider's published metadata from
//! `{realm_url}/.well-known/openid-configuration`. Every call performs
//! network I/O; the document is not cached, and retry policy belongs to the
//! caller.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use gate_core::{AuthError, Configuration};

/// Bounded timeout applied to outbound identity-provider calls.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Status codes accepted from the identity provider.
pub(crate) const SUCCESS_RANGE: std::ops::RangeInclusive<u16> = 200..=209;

/// Identity-provider endpoints published via the discovery document.
///
/// All fields are required; a document missing any of them fails to parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderMetadata {
    /// URL of the authorization endpoint.
    pub authorization_endpoint: String,

    /// URL of the end session (logout) endpoint.
    pub end_session_endpoint: String,

    /// URL of the introspection endpoint.
    pub introspection_endpoint: String,

    /// Issuer identifier of the provider.
    pub issuer: String,

    /// URL of the JSON Web Key Set document.
    pub jwks_uri: String,

    /// URL of the token endpoint.
    pub token_endpoint: String,

    /// URL of the token introspection endpoint.
    pub token_introspection_endpoint: String,

    /// URL of the `UserInfo` endpoint.
    pub userinfo_endpoint: String,
}

/// Client for the `.well-known/openid-configuration` endpoint.
#[derive(Debug, Clone)]
pub struct DiscoveryClient {
    http: reqwest::Client,
}

impl DiscoveryClient {
    /// Creates a discovery client wrapping the given HTTP client.
    ///
    /// The client is expected to carry a bounded timeout; see
    /// [`DEFAULT_HTTP_TIMEOUT`].
    #[must_use]
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Fetches and parses the provider metadata for the configured realm.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Discovery`] when the request fails, the response
    /// status falls outside `[200, 209]`, or the body is missing required
    /// fields.
    pub async fn discover(
        &self,
        configuration: &Configuration,
    ) -> Result<ProviderMetadata, AuthError> {
        let url = format!(
            "{}/.well-known/openid-configuration",
            configuration.realm_url()
        );

        tracing::debug!(url = %url, "Fetching OIDC provider metadata");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| AuthError::Discovery(e.to_string()))?;

        let status = response.status().as_u16();
        if !SUCCESS_RANGE.contains(&status) {
            return Err(AuthError::Discovery(format!(
                "discovery endpoint returned status {status}"
            )));
        }

        response
            .json::<ProviderMetadata>()
            .await
            .map_err(|e| AuthError::Discovery(format!("malformed discovery document: {e}")))
    }
}

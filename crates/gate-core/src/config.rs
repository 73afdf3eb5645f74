//! Auth-service configuration.
//!
//! Settings are deserialized from the host application's configuration and
//! validated into an immutable [`Configuration`] when the gate is built. The
//! resolved signing key is attached per request with
//! [`Configuration::with_public_key`]; the base configuration is never
//! mutated.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::policy::RouteTable;

/// Raw auth-service settings as they appear in application configuration.
///
/// Field names mirror the configuration keys consumed by the gate; only
/// `public_key` may be left empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthServiceSettings {
    /// Base URL of the identity provider, e.g. `https://auth.example.com`.
    pub auth_service_url: String,

    /// Realm identifier at the identity provider.
    #[serde(rename = "realmId")]
    pub realm_id: String,

    /// Client identifier registered at the identity provider.
    pub client_id: String,

    /// Expected audience of accepted tokens.
    pub audience: String,

    /// Statically configured public key, normally left empty and resolved
    /// from the provider's JWKS endpoint per request.
    #[serde(default)]
    pub public_key: String,
}

/// Top-level gate settings: the auth-service block plus the route table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GateSettings {
    /// Identity-provider connection settings.
    pub auth_service: AuthServiceSettings,

    /// Per-route authorization policies, keyed by exact request path.
    #[serde(default)]
    pub routes: RouteTable,
}

/// Validated, immutable auth-service configuration.
///
/// `realm_id`, `auth_service_url`, and `audience` are guaranteed non-empty.
#[derive(Debug, Clone)]
pub struct Configuration {
    realm_id: String,
    client_id: String,
    audience: String,
    auth_service_url: String,
    public_key: Option<String>,
}

impl Configuration {
    /// Validates settings into a configuration.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] naming the first missing field when
    /// `realm_id`, `auth_service_url`, or `audience` is empty.
    pub fn from_settings(settings: &AuthServiceSettings) -> Result<Self, ConfigError> {
        if settings.auth_service_url.is_empty() {
            return Err(ConfigError::MissingServiceUrl);
        }
        if settings.realm_id.is_empty() {
            return Err(ConfigError::MissingRealm);
        }
        if settings.audience.is_empty() {
            return Err(ConfigError::MissingAudience);
        }

        Ok(Self {
            realm_id: settings.realm_id.clone(),
            client_id: settings.client_id.clone(),
            audience: settings.audience.clone(),
            auth_service_url: settings.auth_service_url.clone(),
            public_key: if settings.public_key.is_empty() {
                None
            } else {
                Some(settings.public_key.clone())
            },
        })
    }

    /// Realm identifier.
    #[must_use]
    pub fn realm_id(&self) -> &str {
        &self.realm_id
    }

    /// Client identifier.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Expected token audience.
    #[must_use]
    pub fn audience(&self) -> &str {
        &self.audience
    }

    /// Identity-provider base URL.
    #[must_use]
    pub fn auth_service_url(&self) -> &str {
        &self.auth_service_url
    }

    /// Realm URL, which doubles as the expected token issuer.
    #[must_use]
    pub fn realm_url(&self) -> String {
        format!("{}/auth/realms/{}", self.auth_service_url, self.realm_id)
    }

    /// The signing public key attached to this configuration, if resolved.
    #[must_use]
    pub fn public_key(&self) -> Option<&str> {
        self.public_key.as_deref()
    }

    /// Returns a copy of this configuration carrying the resolved signing
    /// key. Called once per request after certificate resolution.
    #[must_use]
    pub fn with_public_key(mut self, public_key: impl Into<String>) -> Self {
        self.public_key = Some(public_key.into());
        self
    }
}

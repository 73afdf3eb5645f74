//! Error taxonomy for the authentication pipeline.
//!
//! Every per-request failure is a variant of [`AuthError`]; the host
//! application may override the surfaced error type for the invalid-token,
//! expired-token, and forbidden outcomes through [`ErrorOverrides`]. The
//! pipeline hands either form to the framework boundary as an
//! [`AuthFailure`], which keeps the HTTP status of the underlying kind.

use std::sync::Arc;

use thiserror::Error;

/// Boxed error type carried across the override boundary.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Fatal configuration errors, raised when the gate is built.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// `realmId` missing or empty.
    #[error("auth service configuration has no realmId")]
    MissingRealm,

    /// `auth_service_url` missing or empty.
    #[error("auth service configuration has no auth_service_url")]
    MissingServiceUrl,

    /// `audience` missing or empty.
    #[error("auth service configuration has no audience")]
    MissingAudience,

    /// Outbound HTTP client could not be constructed.
    #[error("http client construction failed: {0}")]
    HttpClient(String),
}

/// Per-request authentication/authorization errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No `Authorization` header on the request.
    #[error("authorization header missing")]
    MissingAuthorization,

    /// The bearer token is not a parseable compact JWT.
    #[error("malformed authorization token: {0}")]
    MalformedToken(String),

    /// Token header lacks `kid` or `alg`.
    #[error("token header missing kid or alg")]
    InvalidTokenHeader,

    /// Discovery of the provider's OIDC metadata failed.
    #[error("OpenID Connect configuration discovery error: {0}")]
    Discovery(String),

    /// The JWKS document could not be fetched or parsed.
    #[error("JWK recovery error: {0}")]
    JwkRecovery(String),

    /// No JWKS entry matches the token header's `kid` and `alg`.
    #[error("no signing certificate matches the token header")]
    MissingCertificateKey,

    /// The matched certificate yielded no usable public key.
    #[error("failed to retrieve the token certificate key: {0}")]
    CertificateKey(String),

    /// Signature or standard-claim validation failed.
    #[error("invalid authorization token")]
    InvalidToken,

    /// The token is past its expiry (signature otherwise valid).
    #[error("expired authorization token")]
    ExpiredToken,

    /// The route's claim policy is not satisfied.
    #[error("authorization failed")]
    Forbidden,

    /// No authorization policy is configured for the request path.
    #[error("no authorization policy configured for {0}")]
    MissingPolicy(String),
}

impl AuthError {
    /// HTTP status code surfaced for this error.
    ///
    /// Caller faults map to 401, authorization and policy faults to 403, and
    /// upstream identity-provider faults to 502.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::MissingAuthorization
            | Self::MalformedToken(_)
            | Self::InvalidTokenHeader
            | Self::InvalidToken
            | Self::ExpiredToken => 401,
            Self::Forbidden | Self::MissingPolicy(_) => 403,
            Self::Discovery(_)
            | Self::JwkRecovery(_)
            | Self::MissingCertificateKey
            | Self::CertificateKey(_) => 502,
        }
    }
}

/// Factory producing an application-defined error from the stock message.
type ErrorFactory = Arc<dyn Fn(&str) -> BoxError + Send + Sync>;

/// Override slots mapping pipeline outcomes to application error types.
///
/// Each slot is resolved when the gate is built; an unset slot falls back to
/// the stock [`AuthError`] variant. The stock message text is passed to the
/// factory so the surfaced error keeps the literal failure message.
#[derive(Clone, Default)]
pub struct ErrorOverrides {
    invalid_token: Option<ErrorFactory>,
    expired_token: Option<ErrorFactory>,
    forbidden: Option<ErrorFactory>,
}

impl ErrorOverrides {
    /// Creates an empty override table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the error surfaced for an invalid token.
    #[must_use]
    pub fn invalid_token<F, E>(mut self, factory: F) -> Self
    where
        F: Fn(&str) -> E + Send + Sync + 'static,
        E: std::error::Error + Send + Sync + 'static,
    {
        self.invalid_token = Some(Arc::new(move |msg| Box::new(factory(msg))));
        self
    }

    /// Overrides the error surfaced for an expired token.
    #[must_use]
    pub fn expired_token<F, E>(mut self, factory: F) -> Self
    where
        F: Fn(&str) -> E + Send + Sync + 'static,
        E: std::error::Error + Send + Sync + 'static,
    {
        self.expired_token = Some(Arc::new(move |msg| Box::new(factory(msg))));
        self
    }

    /// Overrides the error surfaced for a failed claim policy.
    #[must_use]
    pub fn forbidden<F, E>(mut self, factory: F) -> Self
    where
        F: Fn(&str) -> E + Send + Sync + 'static,
        E: std::error::Error + Send + Sync + 'static,
    {
        self.forbidden = Some(Arc::new(move |msg| Box::new(factory(msg))));
        self
    }

    /// Resolves an error through the override table.
    ///
    /// Only the invalid-token, expired-token, and forbidden outcomes have
    /// override slots; every other kind passes through as its stock form.
    #[must_use]
    pub fn resolve(&self, error: AuthError) -> AuthFailure {
        let slot = match &error {
            AuthError::InvalidToken => self.invalid_token.as_ref(),
            AuthError::ExpiredToken => self.expired_token.as_ref(),
            AuthError::Forbidden => self.forbidden.as_ref(),
            _ => None,
        };

        let status = error.http_status();
        match slot {
            Some(factory) => AuthFailure {
                status,
                source: factory(&error.to_string()),
            },
            None => AuthFailure {
                status,
                source: Box::new(error),
            },
        }
    }
}

impl std::fmt::Debug for ErrorOverrides {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorOverrides")
            .field("invalid_token", &self.invalid_token.is_some())
            .field("expired_token", &self.expired_token.is_some())
            .field("forbidden", &self.forbidden.is_some())
            .finish()
    }
}

/// A pipeline failure ready for the framework's error boundary.
///
/// Carries the HTTP status of the underlying error kind and the error itself,
/// which is either the stock [`AuthError`] or the application's override.
#[derive(Debug)]
pub struct AuthFailure {
    status: u16,
    source: BoxError,
}

impl AuthFailure {
    /// Wraps an error produced outside the override table, e.g. by a
    /// terminal result handler.
    #[must_use]
    pub fn custom(status: u16, source: BoxError) -> Self {
        Self { status, source }
    }

    /// HTTP status to surface.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// The underlying error.
    #[must_use]
    pub fn inner(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.source.as_ref()
    }
}

impl std::fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl std::error::Error for AuthFailure {}

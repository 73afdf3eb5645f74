//! Request pipeline orchestration.
//!
//! Per inbound request: policy lookup → bearer extraction → certificate
//! resolution → token validation → claim authorization → claim publication.
//! Anonymous routes skip verification entirely; any failure aborts the
//! pipeline and is surfaced as an HTTP response with the status of the
//! underlying error kind.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Request, State};
use axum::http::{header::AUTHORIZATION, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use gate_cache::{CertKeyCacheReader, CertKeyCacheWriter};
use gate_core::{
    AuthError, AuthFailure, AuthResultHandler, ConfigError, Configuration, ErrorOverrides,
    GateSettings, RouteTable, ValidationResult,
};
use gate_oidc::{is_authorized, CertKeyService, DiscoveryClient, Token, DEFAULT_HTTP_TIMEOUT};

use crate::auth_info::AuthInformation;

/// Shared state of the authentication middleware.
///
/// Cheap to clone; all per-request mutation happens on request-scoped copies.
#[derive(Clone)]
pub struct OidcGate {
    inner: Arc<GateInner>,
}

struct GateInner {
    configuration: Configuration,
    routes: RouteTable,
    cert_keys: CertKeyService,
    cache_reader: Option<Arc<dyn CertKeyCacheReader>>,
    cache_writer: Option<Arc<dyn CertKeyCacheWriter>>,
    result_handler: Option<Arc<dyn AuthResultHandler>>,
    overrides: ErrorOverrides,
}

impl OidcGate {
    /// Starts building a gate from application settings.
    #[must_use]
    pub fn builder(settings: GateSettings) -> OidcGateBuilder {
        OidcGateBuilder {
            settings,
            cache_reader: None,
            cache_writer: None,
            result_handler: None,
            overrides: ErrorOverrides::new(),
            http_timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }

    /// The validated auth-service configuration.
    #[must_use]
    pub fn configuration(&self) -> &Configuration {
        &self.inner.configuration
    }

    /// Drives the pipeline for one request.
    ///
    /// On success the returned request carries the published
    /// [`AuthInformation`] extension.
    ///
    /// # Errors
    ///
    /// Returns the [`AuthFailure`] aborting the pipeline, already resolved
    /// through the configured error overrides.
    pub async fn authorize(&self, mut request: Request) -> Result<Request, AuthFailure> {
        let inner = &self.inner;
        let path = request.uri().path().to_string();

        // Fail closed: a path without a policy is never served.
        let Some(policy) = inner.routes.policy(&path).cloned() else {
            return Err(self.raise(AuthError::MissingPolicy(path)));
        };

        if policy.is_anonymous() {
            // No verification at all; claims from a parseable token are
            // still published for downstream consumption.
            let token = extract_bearer_token(&request).and_then(|raw| Token::parse(raw).ok());
            if let Some(token) = token {
                request
                    .extensions_mut()
                    .insert(AuthInformation::new(token.claims()));
            }
            tracing::debug!(path = %path, "Anonymous route, skipping token verification");
            return Ok(request);
        }

        let raw = extract_bearer_token(&request)
            .ok_or_else(|| self.raise(AuthError::MissingAuthorization))?;
        let token = Token::parse(raw).map_err(|e| self.raise(e))?;

        let cert_key = inner
            .cert_keys
            .resolve_certificate(
                &inner.configuration,
                token.header(),
                inner.cache_reader.as_deref(),
                inner.cache_writer.as_deref(),
            )
            .await
            .map_err(|e| self.raise(e))?;

        let configuration = inner.configuration.clone().with_public_key(cert_key);
        let result = token.validate(&configuration);
        let authorized = is_authorized(&policy, &token);

        if let Some(handler) = &inner.result_handler {
            // A registered terminal handler owns both outcomes.
            handler
                .handle(result, authorized)
                .await
                .map_err(|e| AuthFailure::custom(403, e))?;
        } else {
            match result {
                ValidationResult::Invalid => return Err(self.raise(AuthError::InvalidToken)),
                ValidationResult::Expired => return Err(self.raise(AuthError::ExpiredToken)),
                ValidationResult::Valid | ValidationResult::Forbidden => {}
            }
            if !authorized {
                return Err(self.raise(AuthError::Forbidden));
            }
        }

        request
            .extensions_mut()
            .insert(AuthInformation::new(token.claims()));

        Ok(request)
    }

    fn raise(&self, error: AuthError) -> AuthFailure {
        self.inner.overrides.resolve(error)
    }
}

/// Builder wiring configuration and collaborators into an [`OidcGate`].
pub struct OidcGateBuilder {
    settings: GateSettings,
    cache_reader: Option<Arc<dyn CertKeyCacheReader>>,
    cache_writer: Option<Arc<dyn CertKeyCacheWriter>>,
    result_handler: Option<Arc<dyn AuthResultHandler>>,
    overrides: ErrorOverrides,
    http_timeout: Duration,
}

impl OidcGateBuilder {
    /// Registers the certificate-cache reader.
    #[must_use]
    pub fn cache_reader(mut self, reader: Arc<dyn CertKeyCacheReader>) -> Self {
        self.cache_reader = Some(reader);
        self
    }

    /// Registers the certificate-cache writer.
    #[must_use]
    pub fn cache_writer(mut self, writer: Arc<dyn CertKeyCacheWriter>) -> Self {
        self.cache_writer = Some(writer);
        self
    }

    /// Registers one cache implementation as both reader and writer.
    #[must_use]
    pub fn cache<C>(mut self, cache: Arc<C>) -> Self
    where
        C: CertKeyCacheReader + CertKeyCacheWriter + 'static,
    {
        self.cache_reader = Some(cache.clone());
        self.cache_writer = Some(cache);
        self
    }

    /// Registers a terminal auth-result handler, replacing the stock
    /// error-raising behavior for the validation and authorization steps.
    #[must_use]
    pub fn result_handler(mut self, handler: Arc<dyn AuthResultHandler>) -> Self {
        self.result_handler = Some(handler);
        self
    }

    /// Installs error-type overrides.
    #[must_use]
    pub fn error_overrides(mut self, overrides: ErrorOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Overrides the timeout applied to outbound identity-provider calls.
    #[must_use]
    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    /// Validates the settings and builds the gate.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a required setting is missing or the
    /// HTTP client cannot be constructed.
    pub fn build(self) -> Result<OidcGate, ConfigError> {
        let configuration = Configuration::from_settings(&self.settings.auth_service)?;

        let http = reqwest::Client::builder()
            .timeout(self.http_timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        let cert_keys = CertKeyService::new(DiscoveryClient::new(http.clone()), http);

        Ok(OidcGate {
            inner: Arc::new(GateInner {
                configuration,
                routes: self.settings.routes,
                cert_keys,
                cache_reader: self.cache_reader,
                cache_writer: self.cache_writer,
                result_handler: self.result_handler,
                overrides: self.overrides,
            }),
        })
    }
}

/// Authentication middleware entry point.
///
/// Wire it with `axum::middleware::from_fn_with_state(gate, oidc_guard)`.
pub async fn oidc_guard(State(gate): State<OidcGate>, request: Request, next: Next) -> Response {
    match gate.authorize(request).await {
        Ok(request) => next.run(request).await,
        Err(failure) => reject(&failure),
    }
}

/// Extracts the bearer token from the `Authorization` header.
fn extract_bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
}

/// Maps a pipeline failure onto the HTTP error boundary.
fn reject(failure: &AuthFailure) -> Response {
    let status =
        StatusCode::from_u16(failure.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    tracing::warn!(status = %status, error = %failure, "Request rejected");

    let mut response = (status, failure.to_string()).into_response();
    if status == StatusCode::UNAUTHORIZED {
        response
            .headers_mut()
            .insert("WWW-Authenticate", HeaderValue::from_static("Bearer"));
    }
    response
}

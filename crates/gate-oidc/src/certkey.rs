//! Signing-certificate resolution.
//!
//! Resolves the public key verifying a token's signature: an external cache
//! is consulted first, then the provider's JWKS document is fetched via
//! discovery, scanned for the entry matching the token header, and its
//! `x5c` certificate is decoded into a PEM public key. A fresh resolution is
//! written back to the cache.
//!
//! A cached value is returned as-is, with no check that it still corresponds
//! to the token's `kid`; eviction on key rotation belongs to the external
//! cache implementation.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use pem::{EncodeConfig, LineEnding, Pem};
use x509_parser::certificate::X509Certificate;
use x509_parser::prelude::FromDer;

use gate_cache::{cert_cache_key, CertKeyCacheReader, CertKeyCacheWriter};
use gate_core::{AuthError, Configuration};

use crate::discovery::{DiscoveryClient, SUCCESS_RANGE};
use crate::jwks::JsonWebKeySet;
use crate::token::TokenHeader;

/// Resolves signing certificates for token verification.
#[derive(Debug, Clone)]
pub struct CertKeyService {
    discovery: DiscoveryClient,
    http: reqwest::Client,
}

impl CertKeyService {
    /// Creates a resolver from a discovery client and an HTTP client for the
    /// JWKS fetch.
    #[must_use]
    pub fn new(discovery: DiscoveryClient, http: reqwest::Client) -> Self {
        Self { discovery, http }
    }

    /// Resolves the PEM public key for the given token header.
    ///
    /// A non-empty cached value short-circuits the network path entirely.
    /// Cache backend failures degrade to a miss (read) or a skipped
    /// write-back (write) rather than failing the request.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidTokenHeader`] when the header lacks `kid` or `alg`
    /// - [`AuthError::Discovery`] when provider metadata cannot be fetched
    /// - [`AuthError::JwkRecovery`] when the JWKS fetch fails or the key set
    ///   is empty or malformed
    /// - [`AuthError::MissingCertificateKey`] when no entry matches the header
    /// - [`AuthError::CertificateKey`] when the certificate cannot be decoded
    ///   or carries no public key
    pub async fn resolve_certificate(
        &self,
        configuration: &Configuration,
        header: &TokenHeader,
        reader: Option<&dyn CertKeyCacheReader>,
        writer: Option<&dyn CertKeyCacheWriter>,
    ) -> Result<String, AuthError> {
        let cache_key = cert_cache_key(configuration.realm_id());

        if let Some(reader) = reader {
            match reader.read(&cache_key).await {
                Ok(Some(cached)) if !cached.is_empty() => {
                    tracing::debug!(key = %cache_key, "Certificate cache hit");
                    return Ok(cached);
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(
                        key = %cache_key,
                        error = %e,
                        "Certificate cache read failed, falling back to discovery"
                    );
                }
            }
        }

        let cert_key = self.fetch_from_provider(configuration, header).await?;

        if let Some(writer) = writer {
            if let Err(e) = writer.write(&cache_key, &cert_key).await {
                tracing::warn!(key = %cache_key, error = %e, "Certificate cache write failed");
            }
        }

        Ok(cert_key)
    }

    async fn fetch_from_provider(
        &self,
        configuration: &Configuration,
        header: &TokenHeader,
    ) -> Result<String, AuthError> {
        let (kid, alg) = header.require_kid_and_alg()?;

        let metadata = self.discovery.discover(configuration).await?;
        let jwks = self.fetch_jwks(&metadata.jwks_uri).await?;

        if jwks.keys.is_empty() {
            return Err(AuthError::JwkRecovery("key set is empty".to_string()));
        }

        let key = jwks
            .find_signing_key(kid, alg)
            .ok_or(AuthError::MissingCertificateKey)?;

        let certificate = key
            .leaf_certificate()
            .ok_or(AuthError::MissingCertificateKey)?;

        let pem = public_key_from_x5c(certificate)?;
        tracing::debug!(kid = %kid, alg = %alg, "Resolved signing certificate from JWKS");

        Ok(pem)
    }

    async fn fetch_jwks(&self, jwks_uri: &str) -> Result<JsonWebKeySet, AuthError> {
        let response = self
            .http
            .get(jwks_uri)
            .send()
            .await
            .map_err(|e| AuthError::JwkRecovery(e.to_string()))?;

        let status = response.status().as_u16();
        if !SUCCESS_RANGE.contains(&status) {
            return Err(AuthError::JwkRecovery(format!(
                "JWKS endpoint returned status {status}"
            )));
        }

        response
            .json::<JsonWebKeySet>()
            .await
            .map_err(|e| AuthError::JwkRecovery(format!("malformed key set: {e}")))
    }
}

/// Decodes a base64 `x5c` entry into the certificate's public key, PEM form.
fn public_key_from_x5c(x5c: &str) -> Result<String, AuthError> {
    let der = STANDARD
        .decode(x5c)
        .map_err(|e| AuthError::CertificateKey(format!("certificate is not base64: {e}")))?;

    let (_, certificate) = X509Certificate::from_der(&der)
        .map_err(|e| AuthError::CertificateKey(format!("certificate does not parse: {e}")))?;

    let spki = certificate.public_key().raw;
    if spki.is_empty() {
        return Err(AuthError::CertificateKey(
            "certificate carries no public key".to_string(),
        ));
    }

    let pem = pem::encode_config(
        &Pem::new("PUBLIC KEY", spki.to_vec()),
        EncodeConfig::new().set_line_ending(LineEnding::LF),
    );

    Ok(pem)
}

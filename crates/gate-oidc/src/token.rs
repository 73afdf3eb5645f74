//! Token model and validator.
//!
//! A [`Token`] wraps the raw compact JWT and exposes its header fields and
//! claim map; parsing never verifies anything. Validation is a pure function
//! of the token and a configuration carrying the resolved public key, and
//! classifies the token per the rule in [`Token::validate`].

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey};
use serde::Deserialize;
use serde_json::{Map, Value};

use gate_core::{AuthError, Configuration, ValidationResult};

/// Registered claims excluded from the published claim snapshot.
pub const RESERVED_CLAIMS: [&str; 6] = ["aud", "iss", "nbf", "nonce", "iat", "exp"];

/// Decoded JWT header fields used for key selection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenHeader {
    /// Key identifier.
    pub kid: Option<String>,

    /// Signing algorithm name.
    pub alg: Option<String>,
}

impl TokenHeader {
    /// Returns `kid` and `alg`, failing when either is absent.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidTokenHeader`] when `kid` or `alg` is
    /// missing.
    pub fn require_kid_and_alg(&self) -> Result<(&str, &str), AuthError> {
        match (self.kid.as_deref(), self.alg.as_deref()) {
            (Some(kid), Some(alg)) => Ok((kid, alg)),
            _ => Err(AuthError::InvalidTokenHeader),
        }
    }
}

/// A parsed bearer token.
///
/// Immutable after parse; validation does not mutate the token.
#[derive(Debug, Clone)]
pub struct Token {
    raw: String,
    header: TokenHeader,
    claims: Map<String, Value>,
}

impl Token {
    /// Parses a compact JWT without verifying it.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MalformedToken`] when the input is not three
    /// base64url segments with a JSON object header and payload.
    pub fn parse(raw: impl Into<String>) -> Result<Self, AuthError> {
        let raw = raw.into();

        let mut segments = raw.split('.');
        let (header, payload, signature) =
            match (segments.next(), segments.next(), segments.next(), segments.next()) {
                (Some(h), Some(p), Some(s), None) => (h, p, s),
                _ => {
                    return Err(AuthError::MalformedToken(
                        "expected three dot-separated segments".to_string(),
                    ))
                }
            };

        if signature.is_empty() {
            return Err(AuthError::MalformedToken("empty signature segment".to_string()));
        }

        let header: TokenHeader = decode_segment(header, "header")?;
        let claims: Map<String, Value> = decode_segment(payload, "payload")?;

        Ok(Self { raw, header, claims })
    }

    /// The raw compact JWT this token was parsed from.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Header fields used for key selection.
    #[must_use]
    pub fn header(&self) -> &TokenHeader {
        &self.header
    }

    /// Validates the token against the configuration.
    ///
    /// Classification: with `signature_valid` (RSA-SHA256 against the
    /// configuration's public key), `claims_valid` (issuer equals the realm
    /// URL, audience contains the configured audience, and the current time
    /// lies within the token's validity window), and `expired` (current time
    /// at or past `exp`):
    ///
    /// - `signature_valid && claims_valid` → [`ValidationResult::Valid`]
    /// - `signature_valid && expired` → [`ValidationResult::Expired`]
    /// - otherwise → [`ValidationResult::Invalid`]
    ///
    /// A signature failure therefore always classifies as `Invalid`,
    /// regardless of the time claims.
    #[must_use]
    pub fn validate(&self, configuration: &Configuration) -> ValidationResult {
        let now = Utc::now().timestamp();

        let signature_valid = self.verify_signature(configuration.public_key().unwrap_or(""));
        let claims_valid = self.claims_valid(configuration, now);
        let expired = self.expired(now);

        if signature_valid && claims_valid {
            ValidationResult::Valid
        } else if signature_valid && expired {
            ValidationResult::Expired
        } else {
            ValidationResult::Invalid
        }
    }

    /// Whether the named claim exists and its stringified value equals
    /// `value` exactly.
    ///
    /// String claims compare directly; numbers and booleans compare against
    /// their canonical rendering; arrays and objects compare against their
    /// compact JSON serialization as a whole (no contains semantics).
    #[must_use]
    pub fn has_claim(&self, name: &str, value: &str) -> bool {
        match self.claims.get(name) {
            Some(Value::String(s)) => s == value,
            Some(Value::Number(n)) => n.to_string() == value,
            Some(Value::Bool(b)) => b.to_string() == value,
            Some(other) => serde_json::to_string(other).is_ok_and(|s| s == value),
            None => false,
        }
    }

    /// All claims except the reserved set ([`RESERVED_CLAIMS`]).
    #[must_use]
    pub fn claims(&self) -> Map<String, Value> {
        self.claims
            .iter()
            .filter(|(name, _)| !RESERVED_CLAIMS.contains(&name.as_str()))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    fn verify_signature(&self, public_key_pem: &str) -> bool {
        let Ok(key) = DecodingKey::from_rsa_pem(public_key_pem.as_bytes()) else {
            return false;
        };

        // The signed message is everything before the final dot.
        let Some((message, signature)) = self.raw.rsplit_once('.') else {
            return false;
        };

        jsonwebtoken::crypto::verify(signature, message.as_bytes(), &key, Algorithm::RS256)
            .unwrap_or(false)
    }

    fn claims_valid(&self, configuration: &Configuration, now: i64) -> bool {
        let issuer_matches = self
            .claims
            .get("iss")
            .and_then(Value::as_str)
            .is_some_and(|iss| iss == configuration.realm_url());

        let audience_matches = self.audience_contains(configuration.audience());

        // iat and nbf only bound the window when present; exp must exist.
        let issued_ok = self.claim_i64("iat").is_none_or(|iat| now >= iat);
        let not_before_ok = self.claim_i64("nbf").is_none_or(|nbf| now >= nbf);
        let not_expired = self.claim_i64("exp").is_some_and(|exp| now < exp);

        issuer_matches && audience_matches && issued_ok && not_before_ok && not_expired
    }

    fn expired(&self, now: i64) -> bool {
        self.claim_i64("exp").is_some_and(|exp| now >= exp)
    }

    fn audience_contains(&self, audience: &str) -> bool {
        match self.claims.get("aud") {
            Some(Value::String(aud)) => aud == audience,
            Some(Value::Array(auds)) => auds
                .iter()
                .any(|aud| aud.as_str() == Some(audience)),
            _ => false,
        }
    }

    fn claim_i64(&self, name: &str) -> Option<i64> {
        self.claims.get(name).and_then(Value::as_i64)
    }
}

fn decode_segment<T: serde::de::DeserializeOwned>(
    segment: &str,
    what: &str,
) -> Result<T, AuthError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| AuthError::MalformedToken(format!("{what} is not base64url: {e}")))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| AuthError::MalformedToken(format!("{what} is not valid JSON: {e}")))
}

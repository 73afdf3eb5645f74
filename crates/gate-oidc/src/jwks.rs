//! JSON Web Key Set (JWKS) document model.
//!
//! Covers the subset of RFC 7517 the certificate resolver needs: key
//! identification (`kid`/`alg`/`use`) and the `x5c` certificate chain the
//! provider publishes for signature verification.

use serde::{Deserialize, Serialize};

/// JSON Web Key Set, as returned by the provider's JWKS endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonWebKeySet {
    /// Array of JSON Web Keys.
    pub keys: Vec<JsonWebKey>,
}

impl JsonWebKeySet {
    /// Finds the signing key matching the token header.
    ///
    /// Scans every entry; a match requires `kid` and `alg` to both equal the
    /// token header's values and the entry to carry at least one `x5c`
    /// certificate.
    #[must_use]
    pub fn find_signing_key(&self, kid: &str, alg: &str) -> Option<&JsonWebKey> {
        self.keys.iter().find(|key| {
            key.kid.as_deref() == Some(kid)
                && key.alg.as_deref() == Some(alg)
                && key.has_certificate_chain()
        })
    }
}

/// A single JSON Web Key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonWebKey {
    /// Key type (e.g. "RSA", "EC").
    pub kty: KeyType,

    /// Public key use ("sig" for signature, "enc" for encryption).
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub key_use: Option<String>,

    /// Algorithm intended for use with the key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,

    /// Key ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,

    /// X.509 certificate chain; the first entry carries the verification
    /// certificate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x5c: Option<Vec<String>>,

    /// X.509 certificate SHA-1 thumbprint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x5t: Option<String>,

    /// X.509 certificate SHA-256 thumbprint.
    #[serde(rename = "x5t#S256", skip_serializing_if = "Option::is_none")]
    pub x5t_s256: Option<String>,

    /// RSA modulus (base64url encoded).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,

    /// RSA exponent (base64url encoded).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub e: Option<String>,
}

impl JsonWebKey {
    /// Whether the entry carries at least one `x5c` certificate.
    #[must_use]
    pub fn has_certificate_chain(&self) -> bool {
        self.x5c.as_ref().is_some_and(|chain| !chain.is_empty())
    }

    /// The first certificate of the `x5c` chain, if present.
    #[must_use]
    pub fn leaf_certificate(&self) -> Option<&str> {
        self.x5c.as_ref()?.first().map(String::as_str)
    }
}

/// Key type for JWK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyType {
    /// RSA key.
    #[serde(rename = "RSA")]
    Rsa,

    /// Elliptic Curve key.
    #[serde(rename = "EC")]
    Ec,

    /// Octet sequence (symmetric key).
    #[serde(rename = "oct")]
    Oct,

    /// Octet Key Pair (Ed25519, X25519).
    #[serde(rename = "OKP")]
    Okp,
}

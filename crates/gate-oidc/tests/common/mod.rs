//! Shared fixtures for the gate-oidc integration tests.
//!
//! The key material is a fixed 2048-bit RSA keypair with a matching
//! self-signed certificate (`cert_der.b64` is the DER certificate in base64,
//! i.e. a JWKS `x5c` entry). `other_private.pem` is an unrelated keypair for
//! wrong-signature cases.

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gate_core::{AuthServiceSettings, Configuration};

/// Signing key the fixture certificate belongs to.
pub const RSA_PRIVATE_PEM: &str = include_str!("keys/rsa_private.pem");

/// Public half of the fixture keypair, SPKI PEM.
pub const RSA_PUBLIC_PEM: &str = include_str!("keys/rsa_public.pem");

/// A second keypair unrelated to the certificate.
pub const OTHER_PRIVATE_PEM: &str = include_str!("keys/other_private.pem");

/// Base64 DER of the self-signed certificate for the fixture keypair.
pub const CERT_DER_BASE64: &str = include_str!("keys/cert_der.b64");

/// `kid` advertised for the fixture key.
pub const KID: &str = "fixture-key";

/// Realm used throughout the tests.
pub const REALM: &str = "demo";

/// Audience accepted by the test configuration.
pub const AUDIENCE: &str = "orders-api";

/// Builds a validated configuration pointing at the given provider base URL.
pub fn configuration(auth_service_url: &str) -> Configuration {
    Configuration::from_settings(&AuthServiceSettings {
        auth_service_url: auth_service_url.to_string(),
        realm_id: REALM.to_string(),
        client_id: "demo-app".to_string(),
        audience: AUDIENCE.to_string(),
        public_key: String::new(),
    })
    .unwrap()
}

/// Mints an RS256 token with the given `kid` and claims.
pub fn mint_token(private_pem: &str, kid: &str, claims: &Value) -> String {
    let mut header = jsonwebtoken::Header::new(jsonwebtoken::Algorithm::RS256);
    header.kid = Some(kid.to_string());
    let key = jsonwebtoken::EncodingKey::from_rsa_pem(private_pem.as_bytes()).unwrap();
    jsonwebtoken::encode(&header, claims, &key).unwrap()
}

/// Standard well-formed claims for the given issuer, valid for an hour.
pub fn standard_claims(issuer: &str) -> Value {
    let now = chrono::Utc::now().timestamp();
    json!({
        "iss": issuer,
        "aud": AUDIENCE,
        "sub": "user-1",
        "iat": now - 60,
        "nbf": now - 60,
        "exp": now + 3600,
        "preferred_username": "alice",
        "user_roles": "Administrator"
    })
}

/// Discovery document advertising a JWKS endpoint under the realm URL.
pub fn discovery_document(realm_url: &str) -> Value {
    json!({
        "authorization_endpoint": format!("{realm_url}/protocol/openid-connect/auth"),
        "end_session_endpoint": format!("{realm_url}/protocol/openid-connect/logout"),
        "introspection_endpoint": format!("{realm_url}/protocol/openid-connect/token/introspect"),
        "issuer": realm_url,
        "jwks_uri": format!("{realm_url}/protocol/openid-connect/certs"),
        "token_endpoint": format!("{realm_url}/protocol/openid-connect/token"),
        "token_introspection_endpoint": format!("{realm_url}/protocol/openid-connect/token/introspect"),
        "userinfo_endpoint": format!("{realm_url}/protocol/openid-connect/userinfo")
    })
}

/// JWKS document carrying the fixture certificate under the given `kid`.
pub fn jwks_document(kid: &str) -> Value {
    json!({
        "keys": [{
            "kid": kid,
            "kty": "RSA",
            "alg": "RS256",
            "use": "sig",
            "x5c": [CERT_DER_BASE64.trim()]
        }]
    })
}

/// Mounts the discovery and JWKS endpoints on the mock provider.
pub async fn mount_provider(server: &MockServer, jwks: Value) {
    let realm_url = format!("{}/auth/realms/{REALM}", server.uri());

    Mock::given(method("GET"))
        .and(path(format!(
            "/auth/realms/{REALM}/.well-known/openid-configuration"
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(discovery_document(&realm_url)))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!(
            "/auth/realms/{REALM}/protocol/openid-connect/certs"
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(jwks))
        .mount(server)
        .await;
}

//! Shared fixtures for the middleware integration tests.

use axum::body::Body;
use axum::extract::Request;
use axum::http::header::AUTHORIZATION;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gate_core::{AuthServiceSettings, GateSettings, RoutePolicy, RouteTable};
use gate_http::{oidc_guard, AuthInformation, OidcGate};

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

/// Gate settings guarding `/orders` (claim policy) and `/health` (anonymous).
pub fn settings(auth_service_url: &str) -> GateSettings {
    GateSettings {
        auth_service: AuthServiceSettings {
            auth_service_url: auth_service_url.to_string(),
            realm_id: REALM.to_string(),
            client_id: "demo-app".to_string(),
            audience: AUDIENCE.to_string(),
            public_key: String::new(),
        },
        routes: RouteTable::new()
            .with_route(
                "/orders",
                RoutePolicy::require_claim("user_roles", ["Administrator", "SpecialPerson"]),
            )
            .with_route("/health", RoutePolicy::allow_anonymous()),
    }
}

/// Router with the gate layered over a guarded, an anonymous, and an
/// uncovered route.
pub fn app(gate: OidcGate) -> Router {
    Router::new()
        .route("/orders", get(orders))
        .route("/health", get(health))
        .route("/uncovered", get(health))
        .layer(axum::middleware::from_fn_with_state(gate, oidc_guard))
}

/// Guarded handler exercising the [`AuthInformation`] extractor.
async fn orders(auth: AuthInformation) -> String {
    auth.claim("preferred_username")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string()
}

/// Anonymous handler reading the snapshot directly off the extensions.
async fn health(request: Request) -> String {
    request
        .extensions()
        .get::<AuthInformation>()
        .and_then(|info| info.claim("preferred_username"))
        .and_then(Value::as_str)
        .unwrap_or("anonymous")
        .to_string()
}

/// Issues a GET with an optional bearer token and returns the response.
pub async fn send(app: Router, uri: &str, token: Option<&str>) -> Response {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    app.oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Collects a response body into a string.
pub async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Mints an RS256 token with the given `kid` and claims.
pub fn mint_token(private_pem: &str, kid: &str, claims: &Value) -> String {
    let mut header = jsonwebtoken::Header::new(jsonwebtoken::Algorithm::RS256);
    header.kid = Some(kid.to_string());
    let key = jsonwebtoken::EncodingKey::from_rsa_pem(private_pem.as_bytes()).unwrap();
    jsonwebtoken::encode(&header, claims, &key).unwrap()
}

/// Standard well-formed claims for the given provider base URL.
pub fn standard_claims(auth_service_url: &str) -> Value {
    let now = chrono::Utc::now().timestamp();
    json!({
        "iss": format!("{auth_service_url}/auth/realms/{REALM}"),
        "aud": AUDIENCE,
        "sub": "user-1",
        "iat": now - 60,
        "nbf": now - 60,
        "exp": now + 3600,
        "preferred_username": "alice",
        "user_roles": "Administrator"
    })
}

/// Mounts the discovery and JWKS endpoints on the mock provider.
pub async fn mount_provider(server: &MockServer) {
    let realm_url = format!("{}/auth/realms/{REALM}", server.uri());

    Mock::given(method("GET"))
        .and(path(format!(
            "/auth/realms/{REALM}/.well-known/openid-configuration"
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "authorization_endpoint": format!("{realm_url}/protocol/openid-connect/auth"),
            "end_session_endpoint": format!("{realm_url}/protocol/openid-connect/logout"),
            "introspection_endpoint": format!("{realm_url}/protocol/openid-connect/token/introspect"),
            "issuer": realm_url,
            "jwks_uri": format!("{realm_url}/protocol/openid-connect/certs"),
            "token_endpoint": format!("{realm_url}/protocol/openid-connect/token"),
            "token_introspection_endpoint": format!("{realm_url}/protocol/openid-connect/token/introspect"),
            "userinfo_endpoint": format!("{realm_url}/protocol/openid-connect/userinfo")
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!(
            "/auth/realms/{REALM}/protocol/openid-connect/certs"
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "keys": [{
                "kid": KID,
                "kty": "RSA",
                "alg": "RS256",
                "use": "sig",
                "x5c": [CERT_DER_BASE64.trim()]
            }]
        })))
        .mount(server)
        .await;
}

//! Published claims snapshot.

use axum::extract::FromRequestParts;
use axum::http::{request::Parts, StatusCode};
use serde_json::{Map, Value};

/// Read-only snapshot of an authenticated token's claims.
///
/// Built from the token's claim map (registered claims already filtered out)
/// and published into the request extensions after the pipeline accepts the
/// request. Handlers receive it through the extractor implementation below.
#[derive(Debug, Clone, Default)]
pub struct AuthInformation {
    claims: Map<String, Value>,
}

impl AuthInformation {
    /// Creates a snapshot from a claim map.
    #[must_use]
    pub fn new(claims: Map<String, Value>) -> Self {
        Self { claims }
    }

    /// Whether the named claim is present.
    #[must_use]
    pub fn has_claim(&self, name: &str) -> bool {
        self.claims.contains_key(name)
    }

    /// The named claim's value, if present.
    #[must_use]
    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.claims.get(name)
    }

    /// The full claim map.
    #[must_use]
    pub fn claims(&self) -> &Map<String, Value> {
        &self.claims
    }
}

/// Axum extractor for [`AuthInformation`].
///
/// Rejects with 401 when the middleware did not publish a snapshot, i.e. the
/// route was not guarded or an anonymous request carried no token.
impl<S> FromRequestParts<S> for AuthInformation
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthInformation>()
            .cloned()
            .ok_or((StatusCode::UNAUTHORIZED, "Not authenticated"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_lookup() {
        let mut claims = Map::new();
        claims.insert("user_roles".to_string(), Value::String("admin".to_string()));

        let info = AuthInformation::new(claims);
        assert!(info.has_claim("user_roles"));
        assert_eq!(
            info.claim("user_roles"),
            Some(&Value::String("admin".to_string()))
        );
        assert!(!info.has_claim("missing"));
        assert_eq!(info.claim("missing"), None);
    }
}

//! Per-route authorization policies.
//!
//! Routes are configured either with a claim requirement:
//!
//! ```json
//! { "requireClaim": "user_roles", "values": ["Administrator"] }
//! ```
//!
//! or with the anonymous sentinel list `["allowAnonymous"]`. Paths with no
//! configured policy fail closed.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Sentinel flag marking a route as anonymously accessible.
pub const ALLOW_ANONYMOUS: &str = "allowAnonymous";

/// A claim requirement: the named claim must hold one of the listed values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimPolicy {
    /// Name of the required claim.
    #[serde(rename = "requireClaim")]
    pub require_claim: String,

    /// Accepted values, checked in order.
    pub values: Vec<String>,
}

/// Authorization policy attached to a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoutePolicy {
    /// Claim requirement form.
    Claim(ClaimPolicy),

    /// Flag list form, e.g. `["allowAnonymous"]`.
    Flags(Vec<String>),
}

impl RoutePolicy {
    /// Builds a claim-requirement policy.
    #[must_use]
    pub fn require_claim(
        claim: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self::Claim(ClaimPolicy {
            require_claim: claim.into(),
            values: values.into_iter().map(Into::into).collect(),
        })
    }

    /// Builds the anonymous sentinel policy.
    #[must_use]
    pub fn allow_anonymous() -> Self {
        Self::Flags(vec![ALLOW_ANONYMOUS.to_string()])
    }

    /// Whether this policy bypasses authentication entirely.
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        match self {
            Self::Flags(flags) => flags.first().map(String::as_str) == Some(ALLOW_ANONYMOUS),
            Self::Claim(_) => false,
        }
    }
}

/// Route table mapping exact request paths to policies.
///
/// Lookup is string equality on the path; no pattern or prefix matching.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteTable {
    routes: HashMap<String, RoutePolicy>,
}

impl RouteTable {
    /// Creates an empty route table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a policy for a path, replacing any existing entry.
    pub fn insert(&mut self, path: impl Into<String>, policy: RoutePolicy) {
        self.routes.insert(path.into(), policy);
    }

    /// Registers a policy for a path, builder style.
    #[must_use]
    pub fn with_route(mut self, path: impl Into<String>, policy: RoutePolicy) -> Self {
        self.insert(path, policy);
        self
    }

    /// Looks up the policy for a path.
    #[must_use]
    pub fn policy(&self, path: &str) -> Option<&RoutePolicy> {
        self.routes.get(path)
    }

    /// Number of configured routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether any routes are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

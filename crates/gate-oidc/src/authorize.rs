//! Claim-based authorization.
//!
//! A route's policy is an OR over accepted claim values: the token is
//! authorized as soon as one accepted value matches the required claim.

use gate_core::RoutePolicy;

use crate::token::Token;

/// Evaluates a route policy against a parsed token.
///
/// The anonymous sentinel authorizes without consulting the token. A claim
/// policy walks its accepted values in order and authorizes on the first one
/// the token holds; an empty value list never authorizes. A flag list other
/// than the anonymous sentinel grants nothing.
#[must_use]
pub fn is_authorized(policy: &RoutePolicy, token: &Token) -> bool {
    if policy.is_anonymous() {
        return true;
    }

    match policy {
        RoutePolicy::Claim(claim) => claim
            .values
            .iter()
            .any(|value| token.has_claim(&claim.require_claim, value)),
        RoutePolicy::Flags(_) => false,
    }
}

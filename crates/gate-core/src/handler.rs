//! Terminal auth-result handler collaborator.

use async_trait::async_trait;

use crate::error::BoxError;
use crate::validation::ValidationResult;

/// Application-supplied terminal handler for authentication outcomes.
///
/// When registered on the gate, the handler fully replaces the stock
/// error-raising behavior for the validation and authorization steps: the
/// pipeline computes both outcomes, defers to `handle`, and proceeds only if
/// it returns `Ok(())`. An `Err` aborts the request with the handler's error.
#[async_trait]
pub trait AuthResultHandler: Send + Sync {
    /// Decides the fate of the request given both pipeline outcomes.
    ///
    /// # Errors
    ///
    /// Returns the application's error when the request must be rejected.
    async fn handle(&self, result: ValidationResult, authorized: bool) -> Result<(), BoxError>;
}

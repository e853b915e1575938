use std::time::Duration;

use thiserror::Error;
use tracing::{debug, instrument};

use super::client::VmcTransport;
use super::types::{RetrySuggestion, VmcValidationResult};

#[derive(Debug, Error)]
pub enum VmcError {
    /// Transport-level failure: the service was unreachable.
    #[error("VMC request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The service answered with a non-success HTTP status.
    #[error("VMC API returned HTTP {status}")]
    Api { status: u16 },
    /// The service responded, but the body does not match the expected
    /// shape.
    #[error("malformed VMC response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Drives VMC validation, including the bounded revocation retry loop.
///
/// When the API reports `indeterminate_revocation` together with a retry
/// suggestion, the validator sleeps and re-fetches up to `max_retries`
/// times, stopping early once revocation is confirmed clean. The last
/// fetched response is always the final one; an exhausted loop returns the
/// still-indeterminate payload as `Ok`, not as an error.
///
/// Transport errors and malformed responses abort immediately at any
/// stage; only the semantic indeterminate state is retried. Dropping the
/// returned future cancels the loop, so no further retries are scheduled.
pub struct VmcValidator<T: VmcTransport> {
    transport: T,
}

impl<T: VmcTransport> VmcValidator<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    #[instrument(skip(self))]
    pub async fn validate(&self, domain: &str) -> Result<VmcValidationResult, VmcError> {
        let first = self.fetch_validated(domain).await?;

        let suggestion: RetrySuggestion = match (
            first.is_indeterminate_revocation(),
            first.retry_suggestion(),
        ) {
            (true, Some(suggestion)) => suggestion.clone(),
            _ => return Ok(first),
        };

        let mut last = first;
        for attempt in 1..=suggestion.max_retries {
            tokio::time::sleep(Duration::from_secs(suggestion.retry_after_seconds)).await;
            debug!(attempt, max = suggestion.max_retries, "re-checking VMC revocation");
            last = self.fetch_validated(domain).await?;
            if last.revocation_ok() == Some(true) {
                debug!(attempt, "revocation confirmed clean");
                break;
            }
        }

        Ok(last)
    }

    async fn fetch_validated(&self, domain: &str) -> Result<VmcValidationResult, VmcError> {
        let raw = self.transport.fetch_validation(domain).await?;
        Ok(serde_json::from_value(raw)?)
    }
}

//! Request-level retries for OpenSearch calls.
//!
//! The `opensearch` transport sends each request once. This module re-sends a
//! request through `tokio-retry` according to a [`RetryPolicy`]: transport
//! failures and gateway statuses (502, 503, 504) are retried immediately,
//! timeouts only when the policy says so.

use std::future::Future;

use opensearch::http::response::Response;
use tokio_retry::{strategy::FixedInterval, RetryIf};
use tracing::warn;

use crate::config::RetryPolicy;

/// Why a single attempt did not succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The request hit the configured timeout.
    Timeout,
    /// The request never produced a response (connection refused, reset, DNS...).
    Transport,
    /// The cluster answered with a non-success status.
    Status(u16),
}

impl FailureKind {
    /// Classify a response status; `None` for a success.
    pub fn from_status(status: u16) -> Option<Self> {
        if (200..300).contains(&status) {
            None
        } else {
            Some(Self::Status(status))
        }
    }

    /// Classify a client error.
    pub fn from_error(error: &opensearch::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if let Some(status) = error.status_code() {
            Self::Status(status.as_u16())
        } else {
            Self::Transport
        }
    }
}

impl RetryPolicy {
    /// Whether an attempt that failed with `failure` should be sent again.
    pub fn should_retry(&self, failure: FailureKind) -> bool {
        match failure {
            FailureKind::Timeout => self.retry_on_timeout,
            FailureKind::Transport => true,
            FailureKind::Status(status) => matches!(status, 502 | 503 | 504),
        }
    }
}

/// A failed attempt, kept whole so the final one can be handed back.
enum AttemptError {
    Send(opensearch::Error),
    Status(Response),
}

impl AttemptError {
    fn kind(&self) -> FailureKind {
        match self {
            Self::Send(e) => FailureKind::from_error(e),
            Self::Status(response) => FailureKind::Status(response.status_code().as_u16()),
        }
    }
}

/// Send a request, re-sending it while the policy allows.
///
/// `send` builds and sends a fresh request on every call. The last result is
/// returned as-is once retries are exhausted or the failure is not retryable,
/// so callers still see the final status or error.
pub(crate) async fn send_with_retry<F, Fut>(
    policy: &RetryPolicy,
    operation: &'static str,
    mut send: F,
) -> Result<Response, opensearch::Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Response, opensearch::Error>>,
{
    let strategy = FixedInterval::from_millis(0).take(policy.max_retries as usize);

    let action = || {
        let attempt = send();
        async move {
            match attempt.await {
                Ok(response) => match FailureKind::from_status(response.status_code().as_u16()) {
                    Some(_) => Err(AttemptError::Status(response)),
                    None => Ok(response),
                },
                Err(e) => Err(AttemptError::Send(e)),
            }
        }
    };

    let mut retries = 0u32;
    let condition = |failure: &AttemptError| {
        let kind = failure.kind();
        if !policy.should_retry(kind) {
            return false;
        }

        retries += 1;
        if retries <= policy.max_retries {
            warn!(
                operation,
                attempt = retries,
                max_retries = policy.max_retries,
                failure = ?kind,
                "OpenSearch request failed, retrying"
            );
        }
        true
    };

    match RetryIf::spawn(strategy, action, condition).await {
        Ok(response) | Err(AttemptError::Status(response)) => Ok(response),
        Err(AttemptError::Send(e)) => Err(e),
    }
}

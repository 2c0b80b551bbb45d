// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Wharf Contributors

//! Bounded exponential backoff for transient backend errors.

use crate::error::InfraError;
use rand::Rng;
use std::future::Future;
use std::time::Duration;

/// Retry budget for one backend operation.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// No retries; the first failure is final.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay before the given retry (1-based), capped at `max_delay`,
    /// with up to 50% added jitter to spread competing retries.
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exp = self.base_delay.saturating_mul(1u32 << retry.min(16).saturating_sub(1));
        let capped = exp.min(self.max_delay);
        let jitter_ms = capped.as_millis() as u64 / 2;
        if jitter_ms == 0 {
            return capped;
        }
        capped + Duration::from_millis(rand::rng().random_range(0..jitter_ms))
    }
}

/// Run `op`, retrying transient failures per `policy`.
///
/// Transient failures that outlive the budget are reclassified as fatal so
/// callers above the adapter never see a retryable error. Fatal errors,
/// interruptions, and not-found pass through on first occurrence.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    description: &str,
    mut op: F,
) -> Result<T, InfraError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, InfraError>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt < policy.max_attempts => {
                let delay = policy.delay_for(attempt);
                tracing::warn!(
                    %description,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "transient backend error, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(InfraError::Transient(msg)) => {
                return Err(InfraError::Fatal(format!(
                    "{description} failed after {attempt} attempts: {msg}"
                )));
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
#[path = "backoff_tests.rs"]
mod tests;

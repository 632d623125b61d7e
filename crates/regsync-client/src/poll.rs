//! Waiting for the register to finish background processing.
//!
//! The register offers no completion signal for uploads, so callers re-read
//! until a condition holds, backing off exponentially between reads.

use std::future::Future;
use std::time::{Duration, Instant};

use crate::error::RegisterError;

/// Bounded exponential backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Total reads, including the first. Values below 1 are treated as 1.
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl PollPolicy {
    /// Delay before read number `attempt + 1` (0-based `attempt`).
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.initial_delay
            .checked_mul(factor)
            .map_or(self.max_delay, |d| d.min(self.max_delay))
    }

    /// A policy that reads once and never sleeps.
    #[must_use]
    pub const fn immediate() -> Self {
        Self {
            max_attempts: 1,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 8,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(16),
        }
    }
}

/// Call `fetch` until `ready` accepts its output.
///
/// Errors from `fetch` propagate immediately.
///
/// # Errors
///
/// Returns [`RegisterError::PollTimeout`] once `policy.max_attempts` reads
/// have all been rejected.
pub async fn poll_until<T, F, Fut, P>(
    policy: &PollPolicy,
    mut fetch: F,
    ready: P,
) -> Result<T, RegisterError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RegisterError>>,
    P: Fn(&T) -> bool,
{
    let started = Instant::now();
    let attempts = policy.max_attempts.max(1);

    for attempt in 0..attempts {
        let value = fetch().await?;
        if ready(&value) {
            return Ok(value);
        }
        if attempt + 1 < attempts {
            let delay = policy.delay_for(attempt);
            tracing::debug!(attempt = attempt + 1, ?delay, "register not settled, backing off");
            tokio::time::sleep(delay).await;
        }
    }

    tracing::warn!(attempts, "register did not settle");
    Err(RegisterError::PollTimeout {
        attempts,
        waited_ms: started.elapsed().as_millis(),
    })
}

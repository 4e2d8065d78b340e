use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Retry bound and inter-attempt delay.
///
/// `max_retries` counts re-attempts, so a request is sent at most
/// `max_retries + 1` times. The delay is fixed: no backoff, no jitter.
///
/// ```
/// use std::time::Duration;
/// use roundtrip::RetryPolicy;
///
/// let policy = RetryPolicy::builder()
///     .max_retries(5)
///     .delay(Duration::from_millis(250))
///     .build();
/// assert_eq!(policy.max_attempts(), 6);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq)]
pub struct RetryPolicy {
    /// Re-attempts after the first call.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Wait between attempts (e.g. "1s", "250ms").
    #[serde(default = "default_delay", with = "humantime_serde")]
    pub delay: Duration,
}

fn default_max_retries() -> u32 {
    3
}

fn default_delay() -> Duration {
    Duration::from_secs(1)
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            delay: default_delay(),
        }
    }
}

impl RetryPolicy {
    /// Creates a policy from its two parameters.
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    /// Starts from the defaults: 3 retries, 1 second apart.
    pub fn builder() -> RetryPolicyBuilder {
        RetryPolicyBuilder {
            policy: Self::default(),
        }
    }

    /// Upper bound on calls to the inner transport per round-trip.
    pub fn max_attempts(&self) -> u64 {
        u64::from(self.max_retries) + 1
    }
}

/// Builder for [`RetryPolicy`].
#[derive(Debug, Clone)]
pub struct RetryPolicyBuilder {
    policy: RetryPolicy,
}

impl RetryPolicyBuilder {
    /// Sets the number of re-attempts.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.policy.max_retries = max_retries;
        self
    }

    /// Sets the fixed wait between attempts.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.policy.delay = delay;
        self
    }

    /// Finishes the policy.
    pub fn build(self) -> RetryPolicy {
        self.policy
    }
}

//! Retry configuration for eventually-consistent IAM calls.

use std::time::Duration;

/// Configuration for the retry engine.
///
/// SeaweedFS applies IAM writes asynchronously, so a user created a moment ago
/// may still answer `NoSuchEntity`, and access-key creation intermittently
/// fails with `ServiceFailure`. The retry engine absorbs both with bounded
/// exponential backoff.
///
/// ## Default Values
///
/// - `max_attempts`: 5
/// - `initial_delay`: 200ms
/// - `max_delay`: 2s
/// - `multiplier`: 2.0
///
/// ## Example
///
/// ```rust
/// use seaweedfs_provider::RetryConfig;
/// use std::time::Duration;
///
/// let config = RetryConfig::new()
///     .with_max_attempts(3)
///     .with_initial_delay(Duration::from_millis(100));
/// assert_eq!(config.delay_for_attempt(1), Duration::from_millis(100));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of invocations, including the first one.
    pub max_attempts: u32,

    /// Delay before the first retry.
    pub initial_delay: Duration,

    /// Maximum delay between retries.
    pub max_delay: Duration,

    /// Multiplier for exponential backoff.
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(2),
            multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Creates a new retry configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration that invokes the operation exactly once.
    pub fn disabled() -> Self {
        Self {
            max_attempts: 1,
            ..Default::default()
        }
    }

    /// Sets the maximum number of attempts. Values below 1 are coerced to 1.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Sets the delay before the first retry.
    #[must_use]
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Sets the maximum delay between retries.
    #[must_use]
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Sets the exponential backoff multiplier.
    #[must_use]
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Returns the attempt budget, never less than 1.
    #[inline]
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Calculates the delay before retry number `retry` (1-based).
    ///
    /// Uses exponential backoff: `initial_delay * multiplier^(retry - 1)`
    /// capped at `max_delay`.
    pub fn delay_for_attempt(&self, retry: u32) -> Duration {
        if retry == 0 {
            return Duration::ZERO;
        }

        let exponent = i32::try_from(retry - 1).unwrap_or(i32::MAX);
        let base_delay = self.initial_delay.as_secs_f64() * self.multiplier.powi(exponent);
        let capped_delay = base_delay.min(self.max_delay.as_secs_f64());

        Duration::from_secs_f64(capped_delay.max(0.0))
    }

    /// Returns the longest total time the engine can spend sleeping.
    pub fn max_total_delay(&self) -> Duration {
        (1..self.attempts()).map(|retry| self.delay_for_attempt(retry)).sum()
    }
}

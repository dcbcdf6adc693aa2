//! Retry policy types and delay computation.

use std::time::Duration;

/// The backoff mode governing waits between retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Every wait uses the same delay.
    Fixed(Duration),
    /// Waits double on each retry: base, 2*base, 4*base, ...
    Exponential(Duration),
}

/// A retry policy describing how long to wait between attempts and when
/// to give up.
///
/// Policies are pure data - they describe retry behavior but don't execute
/// it. This makes them easy to test, clone, and inspect.
///
/// A `limit` of `None` means the sequence never gives up; `Some(n)` means
/// it fails once `n` gate evaluations have come back false.
///
/// # Examples
///
/// ```rust
/// use persevere::{Backoff, Policy};
/// use std::time::Duration;
///
/// let policy = Policy::exponential(Duration::from_millis(100))
///     .with_limit(5);
///
/// assert_eq!(policy.backoff(), Backoff::Exponential(Duration::from_millis(100)));
/// assert_eq!(policy.limit(), Some(5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
    backoff: Backoff,
    limit: Option<u32>,
}

impl Policy {
    /// Create a policy with a constant delay between retries.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persevere::Policy;
    /// use std::time::Duration;
    ///
    /// let policy = Policy::fixed(Duration::from_millis(500));
    ///
    /// // Every retry waits 500ms
    /// assert_eq!(policy.delay_for_retry(0), Duration::from_millis(500));
    /// assert_eq!(policy.delay_for_retry(1), Duration::from_millis(500));
    /// assert_eq!(policy.delay_for_retry(7), Duration::from_millis(500));
    /// ```
    pub fn fixed(delay: Duration) -> Self {
        Self {
            backoff: Backoff::Fixed(delay),
            limit: None,
        }
    }

    /// Create a policy whose delay doubles on each retry.
    ///
    /// The first retry waits exactly `base`; later retries compound it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persevere::Policy;
    /// use std::time::Duration;
    ///
    /// let policy = Policy::exponential(Duration::from_millis(100));
    ///
    /// // Delay doubles: 100ms, 200ms, 400ms, 800ms, ...
    /// assert_eq!(policy.delay_for_retry(0), Duration::from_millis(100));
    /// assert_eq!(policy.delay_for_retry(1), Duration::from_millis(200));
    /// assert_eq!(policy.delay_for_retry(2), Duration::from_millis(400));
    /// assert_eq!(policy.delay_for_retry(3), Duration::from_millis(800));
    /// ```
    pub fn exponential(base: Duration) -> Self {
        Self {
            backoff: Backoff::Exponential(base),
            limit: None,
        }
    }

    /// Set the attempt limit.
    ///
    /// The limit counts *failed gate evaluations*, whichever gate produced
    /// them. Once the count reaches the limit the sequence fails.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persevere::Policy;
    /// use std::time::Duration;
    ///
    /// let policy = Policy::fixed(Duration::from_millis(100)).with_limit(3);
    ///
    /// assert!(!policy.exhausted(2));
    /// assert!(policy.exhausted(3));
    /// ```
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Remove the attempt limit; the sequence will retry forever.
    pub fn unlimited(mut self) -> Self {
        self.limit = None;
        self
    }

    /// Get the backoff mode.
    pub fn backoff(&self) -> Backoff {
        self.backoff
    }

    /// Get the attempt limit, if any.
    pub fn limit(&self) -> Option<u32> {
        self.limit
    }

    /// Calculate the delay before the Nth retry (0-indexed).
    ///
    /// Uses saturating arithmetic, so large retry counts cap out rather
    /// than overflow.
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        match self.backoff {
            Backoff::Fixed(delay) => delay,
            Backoff::Exponential(base) => base.saturating_mul(2u32.saturating_pow(retry)),
        }
    }

    /// Whether `attempts` failed gate evaluations exhaust this policy.
    ///
    /// Always false for unlimited policies.
    pub fn exhausted(&self, attempts: u32) -> bool {
        self.limit.is_some_and(|limit| attempts >= limit)
    }
}

impl Default for Policy {
    /// Exponential backoff from one second, no attempt limit.
    fn default() -> Self {
        Self::exponential(Duration::from_secs(1))
    }
}

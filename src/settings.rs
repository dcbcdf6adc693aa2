//! Loosely-specified configuration knobs and their normalization.
//!
//! [`Settings`] preserves the compact signed-integer encoding that retry
//! configuration has traditionally been written in: a negative interval
//! means "double the wait each retry", a negative limit means "never give
//! up". [`Settings::normalize`] turns that into a canonical [`Policy`] by
//! substituting defaults field by field and then decoding the sign flags.
//!
//! Normalization is total: any combination of present, absent, or
//! out-of-range fields produces a policy, never an error.

use std::time::Duration;

use crate::policy::{Backoff, Policy};

/// Default interval: exponential backoff from one second.
pub const DEFAULT_INTERVAL_MS: i64 = -1000;

/// Default limit: retry indefinitely.
pub const DEFAULT_LIMIT: i64 = -1;

/// Raw retry knobs, before normalization.
///
/// Both fields are optional; absent fields fall back to their documented
/// defaults. With the `serde` feature enabled, `Settings` can be read
/// straight out of a configuration document.
///
/// # Encoding
///
/// - `interval`: wait between retries in milliseconds. Negative values
///   select exponential backoff with the magnitude as the base; values
///   `>= 0` select a fixed delay. Defaults to [`DEFAULT_INTERVAL_MS`].
/// - `limit`: maximum number of failed gate evaluations before the
///   sequence fails. Negative values mean unbounded. Defaults to
///   [`DEFAULT_LIMIT`].
///
/// # Examples
///
/// ```rust
/// use persevere::{Backoff, Policy, Settings};
/// use std::time::Duration;
///
/// let settings = Settings {
///     interval: Some(-250),
///     limit: Some(10),
/// };
///
/// let policy = settings.normalize();
/// assert_eq!(policy.backoff(), Backoff::Exponential(Duration::from_millis(250)));
/// assert_eq!(policy.limit(), Some(10));
///
/// // Absent fields fall back to defaults
/// assert_eq!(Settings::default().normalize(), Policy::default());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Settings {
    /// Retry interval in milliseconds; negative selects exponential mode.
    pub interval: Option<i64>,
    /// Attempt limit; negative means unbounded.
    pub limit: Option<i64>,
}

impl Settings {
    /// Normalize into a canonical [`Policy`].
    ///
    /// Pure and total: defaults are substituted for absent fields, then
    /// the sign flags are decoded. Normalizing the re-encoding of a
    /// policy yields the same policy back.
    pub fn normalize(&self) -> Policy {
        let interval = self.interval.unwrap_or(DEFAULT_INTERVAL_MS);
        let base = Duration::from_millis(interval.unsigned_abs());
        let policy = if interval < 0 {
            Policy::exponential(base)
        } else {
            Policy::fixed(base)
        };

        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);
        if limit < 0 {
            policy
        } else {
            policy.with_limit(limit.min(u32::MAX as i64) as u32)
        }
    }
}

impl From<&Policy> for Settings {
    /// Re-encode a canonical policy in the raw signed form.
    ///
    /// An exponential policy with a zero base re-encodes as fixed; the
    /// two are behaviorally identical (every wait is zero either way).
    fn from(policy: &Policy) -> Self {
        let interval = match policy.backoff() {
            Backoff::Fixed(delay) => delay.as_millis() as i64,
            Backoff::Exponential(base) => -(base.as_millis() as i64),
        };
        let limit = match policy.limit() {
            Some(limit) => limit as i64,
            None => DEFAULT_LIMIT,
        };
        Settings {
            interval: Some(interval),
            limit: Some(limit),
        }
    }
}

impl From<Policy> for Settings {
    fn from(policy: Policy) -> Self {
        Settings::from(&policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_settings_normalize_to_defaults() {
        let policy = Settings::default().normalize();
        assert_eq!(policy, Policy::default());
        assert_eq!(policy.backoff(), Backoff::Exponential(Duration::from_secs(1)));
        assert_eq!(policy.limit(), None);
    }

    #[test]
    fn negative_interval_selects_exponential_mode() {
        let settings = Settings {
            interval: Some(-500),
            ..Settings::default()
        };
        assert_eq!(
            settings.normalize().backoff(),
            Backoff::Exponential(Duration::from_millis(500))
        );
    }

    #[test]
    fn non_negative_interval_selects_fixed_mode() {
        let settings = Settings {
            interval: Some(500),
            ..Settings::default()
        };
        assert_eq!(
            settings.normalize().backoff(),
            Backoff::Fixed(Duration::from_millis(500))
        );

        let zero = Settings {
            interval: Some(0),
            ..Settings::default()
        };
        assert_eq!(zero.normalize().backoff(), Backoff::Fixed(Duration::ZERO));
    }

    #[test]
    fn negative_limit_means_unbounded() {
        let settings = Settings {
            limit: Some(-1),
            ..Settings::default()
        };
        assert_eq!(settings.normalize().limit(), None);
    }

    #[test]
    fn non_negative_limit_is_kept() {
        let settings = Settings {
            limit: Some(0),
            ..Settings::default()
        };
        assert_eq!(settings.normalize().limit(), Some(0));

        let settings = Settings {
            limit: Some(7),
            ..Settings::default()
        };
        assert_eq!(settings.normalize().limit(), Some(7));
    }

    #[test]
    fn normalization_is_idempotent() {
        let policy = Policy::exponential(Duration::from_millis(250)).with_limit(10);
        assert_eq!(Settings::from(&policy).normalize(), policy);

        let policy = Policy::fixed(Duration::from_millis(40));
        assert_eq!(Settings::from(&policy).normalize(), policy);
    }

    proptest! {
        #[test]
        fn round_trip_preserves_exponential_policies(
            base_ms in 1u64..1_000_000,
            limit in proptest::option::of(0u32..100_000),
        ) {
            let mut policy = Policy::exponential(Duration::from_millis(base_ms));
            if let Some(limit) = limit {
                policy = policy.with_limit(limit);
            }
            prop_assert_eq!(Settings::from(&policy).normalize(), policy);
        }

        #[test]
        fn round_trip_preserves_fixed_policies(
            base_ms in 0u64..1_000_000,
            limit in proptest::option::of(0u32..100_000),
        ) {
            let mut policy = Policy::fixed(Duration::from_millis(base_ms));
            if let Some(limit) = limit {
                policy = policy.with_limit(limit);
            }
            prop_assert_eq!(Settings::from(&policy).normalize(), policy);
        }

        #[test]
        fn normalize_is_total(interval in any::<i64>(), limit in any::<i64>()) {
            let settings = Settings {
                interval: Some(interval),
                limit: Some(limit),
            };
            let _ = settings.normalize();
        }
    }

    #[cfg(feature = "serde")]
    mod serde_tests {
        use super::*;

        #[test]
        fn deserializes_from_a_partial_document() {
            let settings: Settings = serde_json::from_str(r#"{"interval": -500}"#).unwrap();
            assert_eq!(settings.interval, Some(-500));
            assert_eq!(settings.limit, None);
        }

        #[test]
        fn deserializes_from_an_empty_document() {
            let settings: Settings = serde_json::from_str("{}").unwrap();
            assert_eq!(settings, Settings::default());
        }

        #[test]
        fn rejects_a_non_map_document() {
            assert!(serde_json::from_str::<Settings>("42").is_err());
            assert!(serde_json::from_str::<Settings>("null").is_err());
        }
    }
}

//! Testing utilities.
//!
//! The engine takes its delays from an injected [`Timer`], so tests can
//! substitute one that never touches the clock. [`RecordingTimer`]
//! resolves every sleep immediately and remembers the requested delays,
//! making backoff schedules assertable without wall-clock waits.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::BoxFuture;

use crate::timer::Timer;

/// A [`Timer`] that completes immediately and records every requested
/// delay.
///
/// Clones share the same recording, so a test can hand one clone to an
/// [`crate::Attempt`] and keep another to inspect afterwards.
///
/// # Examples
///
/// ```rust
/// use persevere::testing::RecordingTimer;
/// use persevere::{Attempt, Policy};
/// use std::time::Duration;
///
/// # tokio_test::block_on(async {
/// let timer = RecordingTimer::new();
///
/// Attempt::new(0u32)
///     .action(|count: &mut u32| *count += 1)
///     .until(|count: &u32| *count >= 3)
///     .policy(Policy::exponential(Duration::from_millis(10)))
///     .timer(timer.clone())
///     .run()
///     .await;
///
/// assert_eq!(
///     timer.delays(),
///     vec![Duration::from_millis(10), Duration::from_millis(20)]
/// );
/// # });
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingTimer {
    delays: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingTimer {
    /// Create a timer with an empty recording.
    pub fn new() -> Self {
        Self::default()
    }

    /// The delays requested so far, in order.
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().expect("recording timer poisoned").clone()
    }

    /// How many waits have been scheduled so far.
    pub fn wait_count(&self) -> usize {
        self.delays.lock().expect("recording timer poisoned").len()
    }
}

impl Timer for RecordingTimer {
    fn sleep(&self, delay: Duration) -> BoxFuture<'static, ()> {
        self.delays
            .lock()
            .expect("recording timer poisoned")
            .push(delay);
        Box::pin(futures::future::ready(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_delays_in_order() {
        let timer = RecordingTimer::new();

        timer.sleep(Duration::from_millis(5)).await;
        timer.sleep(Duration::from_millis(9)).await;

        assert_eq!(
            timer.delays(),
            vec![Duration::from_millis(5), Duration::from_millis(9)]
        );
        assert_eq!(timer.wait_count(), 2);
    }

    #[tokio::test]
    async fn clones_share_the_recording() {
        let timer = RecordingTimer::new();
        let clone = timer.clone();

        clone.sleep(Duration::from_millis(1)).await;

        assert_eq!(timer.wait_count(), 1);
    }
}

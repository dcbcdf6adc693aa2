//! Injected delay scheduling.
//!
//! The engine never touches the clock directly; it asks a [`Timer`] to
//! wait between retries. Production code uses [`TokioTimer`]; tests can
//! substitute [`crate::testing::RecordingTimer`] to observe the backoff
//! schedule without real waits.

use std::time::Duration;

use futures::future::BoxFuture;

/// A source of deferred wake-ups: "resume no sooner than `delay` from now".
///
/// Resolution and drift are whatever the underlying scheduler provides.
pub trait Timer: Send + Sync {
    /// Return a future that resolves after `delay` has elapsed.
    fn sleep(&self, delay: Duration) -> BoxFuture<'static, ()>;
}

/// The default [`Timer`], backed by [`tokio::time::sleep`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimer;

impl Timer for TokioTimer {
    fn sleep(&self, delay: Duration) -> BoxFuture<'static, ()> {
        Box::pin(tokio::time::sleep(delay))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn tokio_timer_waits_the_requested_delay() {
        let start = Instant::now();
        TokioTimer.sleep(Duration::from_secs(60)).await;

        // Paused time auto-advances, so this returns immediately in real
        // time while still honoring the virtual delay.
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_timer_orders_wakeups_by_delay() {
        let first = TokioTimer.sleep(Duration::from_millis(10));
        let second = TokioTimer.sleep(Duration::from_millis(20));

        let (_, index, _) = futures::future::select_all([second, first]).await;
        assert_eq!(index, 1, "the shorter sleep should resolve first");
    }
}

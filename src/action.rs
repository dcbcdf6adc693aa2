//! The unit of work performed on each cycle.

use std::fmt;

use futures::future::BoxFuture;

/// The action a retry sequence performs, tagged by execution mode.
///
/// - [`Action::Sync`] runs to completion inline; the postcondition is
///   tested as soon as it returns.
/// - [`Action::Async`] produces a future; the postcondition is tested
///   only once that future resolves. The engine imposes no timeout: an
///   action whose future never resolves stalls its session silently.
///
/// The context value is passed `&mut` so the action can record progress
/// for the predicates to observe.
///
/// # Examples
///
/// ```rust
/// use futures::FutureExt;
/// use persevere::Action;
///
/// let sync = Action::sync(|count: &mut u32| *count += 1);
/// assert!(sync.is_sync());
///
/// let done = Action::<u32>::from_async(|count| {
///     *count += 1;
///     async {}.boxed()
/// });
/// assert!(!done.is_sync());
/// ```
pub enum Action<C> {
    /// A synchronous unit of work.
    Sync(Box<dyn FnMut(&mut C) + Send>),
    /// An asynchronous unit of work; the returned future signals completion.
    Async(Box<dyn for<'a> FnMut(&'a mut C) -> BoxFuture<'a, ()> + Send>),
}

impl<C> Action<C> {
    /// Wrap a synchronous closure.
    pub fn sync<F>(f: F) -> Self
    where
        F: FnMut(&mut C) + Send + 'static,
    {
        Action::Sync(Box::new(f))
    }

    /// Wrap an asynchronous closure.
    ///
    /// The closure receives the mutable context and returns a boxed
    /// future; the sequence proceeds to its postcondition only when that
    /// future resolves.
    pub fn from_async<F>(f: F) -> Self
    where
        F: for<'a> FnMut(&'a mut C) -> BoxFuture<'a, ()> + Send + 'static,
    {
        Action::Async(Box::new(f))
    }

    /// The do-nothing synchronous action.
    pub fn noop() -> Self {
        Action::sync(|_| {})
    }

    /// Whether this action runs synchronously.
    pub fn is_sync(&self) -> bool {
        matches!(self, Action::Sync(_))
    }

    /// Perform one invocation, resolving any returned future.
    pub(crate) async fn perform(&mut self, context: &mut C) {
        match self {
            Action::Sync(f) => f(context),
            Action::Async(f) => f(context).await,
        }
    }
}

impl<C> Default for Action<C> {
    fn default() -> Self {
        Action::noop()
    }
}

impl<C> fmt::Debug for Action<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Sync(_) => f.write_str("Action::Sync"),
            Action::Async(_) => f.write_str("Action::Async"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;

    #[tokio::test]
    async fn sync_action_runs_inline() {
        let mut action = Action::sync(|count: &mut u32| *count += 1);
        let mut count = 0;

        action.perform(&mut count).await;
        action.perform(&mut count).await;

        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn async_action_completes_with_its_future() {
        let mut action = Action::<u32>::from_async(|count| {
            async move {
                tokio::task::yield_now().await;
                *count += 1;
            }
            .boxed()
        });
        let mut count = 0;

        action.perform(&mut count).await;

        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn noop_action_leaves_context_alone() {
        let mut action = Action::<u32>::default();
        let mut count = 7;

        action.perform(&mut count).await;

        assert_eq!(count, 7);
        assert!(action.is_sync());
    }

    #[test]
    fn debug_names_the_mode() {
        assert_eq!(format!("{:?}", Action::<()>::noop()), "Action::Sync");
        let action = Action::<()>::from_async(|_| async {}.boxed());
        assert_eq!(format!("{:?}", action), "Action::Async");
    }
}

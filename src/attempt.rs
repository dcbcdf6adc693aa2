//! The public entry point: configure and start a retry sequence.

use std::fmt;
use std::sync::Arc;

use crate::action::Action;
use crate::policy::Policy;
use crate::session::{Callback, Outcome, Predicate, Session};
use crate::settings::Settings;
use crate::timer::{Timer, TokioTimer};

/// A fully-defaulted retry sequence, ready to run.
///
/// Every field has a documented default, so `Attempt::new(context)` is
/// already a valid (if pointless) sequence:
///
/// - `when` / `until`: always true
/// - `action`: no-op
/// - `on_success` / `on_failure`: no-op
/// - policy: [`Policy::default()`] (exponential from 1s, unbounded)
/// - timer: [`TokioTimer`]
///
/// The context value is owned by the sequence. Predicates see it as
/// `&C`; the action and the terminal callbacks get `&mut C`, so state
/// recorded by the action is visible to the gates.
///
/// The engine never catches panics: a panic in any caller-supplied
/// closure unwinds through `run` (or tears down the spawned task) with
/// no retry around it. Only a false predicate result triggers a retry.
///
/// # Examples
///
/// Poll until a condition holds, giving up after ten tries:
///
/// ```rust
/// use persevere::{Attempt, Policy};
/// use std::time::Duration;
///
/// # tokio_test::block_on(async {
/// #[derive(Default)]
/// struct Job {
///     polls: u32,
///     done: bool,
/// }
///
/// let outcome = Attempt::new(Job::default())
///     .action(|job: &mut Job| {
///         job.polls += 1;
///         job.done = job.polls >= 3;
///     })
///     .until(|job: &Job| job.done)
///     .on_failure(|_job: &mut Job| panic!("gave up"))
///     .policy(Policy::fixed(Duration::from_millis(1)).with_limit(10))
///     .run()
///     .await;
///
/// assert!(outcome.is_success());
/// # });
/// ```
///
/// An asynchronous action; the postcondition is tested only once the
/// action's future resolves:
///
/// ```rust
/// use futures::FutureExt;
/// use persevere::{Attempt, Policy};
/// use std::time::Duration;
///
/// # tokio_test::block_on(async {
/// let outcome = Attempt::new(0u32)
///     .action_async(|sent: &mut u32| {
///         *sent += 1;
///         async {}.boxed()
///     })
///     .until(|sent: &u32| *sent >= 2)
///     .policy(Policy::fixed(Duration::ZERO).with_limit(5))
///     .run()
///     .await;
///
/// assert!(outcome.is_success());
/// # });
/// ```
pub struct Attempt<C> {
    when: Predicate<C>,
    until: Predicate<C>,
    action: Action<C>,
    on_success: Callback<C>,
    on_failure: Callback<C>,
    context: C,
    policy: Policy,
    timer: Arc<dyn Timer>,
}

impl<C> Attempt<C> {
    /// Start configuring a sequence around an owned context value.
    pub fn new(context: C) -> Self {
        Self {
            when: Box::new(|_| true),
            until: Box::new(|_| true),
            action: Action::noop(),
            on_success: Box::new(|_| {}),
            on_failure: Box::new(|_| {}),
            context,
            policy: Policy::default(),
            timer: Arc::new(TokioTimer),
        }
    }

    /// Set the precondition: the action may only run once this holds.
    ///
    /// While it returns false the sequence waits and re-tests, burning
    /// attempts against the policy's limit. The action is never invoked
    /// on a false precondition.
    pub fn when<P>(mut self, predicate: P) -> Self
    where
        P: FnMut(&C) -> bool + Send + 'static,
    {
        self.when = Box::new(predicate);
        self
    }

    /// Set the postcondition: the sequence stops once this holds.
    ///
    /// Tested after each action invocation; false results burn attempts
    /// and schedule a retry of the whole cycle.
    pub fn until<P>(mut self, predicate: P) -> Self
    where
        P: FnMut(&C) -> bool + Send + 'static,
    {
        self.until = Box::new(predicate);
        self
    }

    /// Set a synchronous action.
    pub fn action<F>(mut self, action: F) -> Self
    where
        F: FnMut(&mut C) + Send + 'static,
    {
        self.action = Action::sync(action);
        self
    }

    /// Set an asynchronous action.
    ///
    /// See [`Action::from_async`] for the completion contract.
    pub fn action_async<F>(mut self, action: F) -> Self
    where
        F: for<'a> FnMut(&'a mut C) -> futures::future::BoxFuture<'a, ()> + Send + 'static,
    {
        self.action = Action::from_async(action);
        self
    }

    /// Set the callback fired exactly once if the postcondition finally holds.
    pub fn on_success<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(&mut C) + Send + 'static,
    {
        self.on_success = Box::new(callback);
        self
    }

    /// Set the callback fired exactly once if the attempt limit is reached.
    pub fn on_failure<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(&mut C) + Send + 'static,
    {
        self.on_failure = Box::new(callback);
        self
    }

    /// Set the retry policy.
    pub fn policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    /// Apply raw [`Settings`], normalizing them into a policy.
    pub fn settings(mut self, settings: Settings) -> Self {
        self.policy = settings.normalize();
        self
    }

    /// Substitute the delay scheduler.
    pub fn timer<T>(mut self, timer: T) -> Self
    where
        T: Timer + 'static,
    {
        self.timer = Arc::new(timer);
        self
    }

    /// Drive the sequence to a terminal state on the current task.
    ///
    /// Success and failure also reach the configured callbacks; the
    /// returned [`Outcome`] only reports which terminal state was hit.
    pub async fn run(self) -> Outcome {
        self.into_session().run().await
    }

    fn into_session(self) -> Session<C> {
        Session {
            when: self.when,
            until: self.until,
            action: self.action,
            on_success: self.on_success,
            on_failure: self.on_failure,
            context: self.context,
            policy: self.policy,
            timer: self.timer,
            attempts: 0,
        }
    }
}

impl<C> Attempt<C>
where
    C: Send + 'static,
{
    /// Start the sequence as a detached background task and return
    /// immediately.
    ///
    /// Fire-and-forget: no handle is returned, so there is no way to
    /// cancel a pending wait or an in-flight action. The terminal
    /// callbacks are the only way to observe the result.
    pub fn spawn(self) {
        let _ = tokio::spawn(self.run());
    }
}

impl<C> fmt::Debug for Attempt<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attempt")
            .field("action", &self.action)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

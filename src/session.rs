//! The retry state machine.
//!
//! A session owns everything one retry sequence needs: the two gate
//! predicates, the action, the terminal callbacks, the context value, the
//! normalized policy, and the injected timer. It is created by
//! [`crate::Attempt`], driven to a terminal state exactly once, and then
//! dropped.
//!
//! The cycle is strict: precondition, action, postcondition. A false
//! gate increments the shared attempt counter and either exhausts the
//! policy (terminal failure) or schedules a re-entry after the policy's
//! next delay. Both gates advance the same counter and the same backoff
//! progression, so the wait after the k-th false gate - whichever gate
//! produced it - is `delay_for_retry(k - 1)`.

use std::sync::Arc;
use std::time::Duration;

use crate::action::Action;
use crate::policy::Policy;
use crate::timer::Timer;

/// Terminal state of a retry sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The postcondition held; `on_success` has fired.
    Succeeded,
    /// The attempt limit was reached; `on_failure` has fired.
    Failed,
}

impl Outcome {
    /// Whether the sequence terminated successfully.
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Succeeded)
    }
}

pub(crate) type Predicate<C> = Box<dyn FnMut(&C) -> bool + Send>;
pub(crate) type Callback<C> = Box<dyn FnOnce(&mut C) + Send>;

/// One independent run of the retry engine.
pub(crate) struct Session<C> {
    pub(crate) when: Predicate<C>,
    pub(crate) until: Predicate<C>,
    pub(crate) action: Action<C>,
    pub(crate) on_success: Callback<C>,
    pub(crate) on_failure: Callback<C>,
    pub(crate) context: C,
    pub(crate) policy: Policy,
    pub(crate) timer: Arc<dyn Timer>,
    pub(crate) attempts: u32,
}

/// Which gate is being evaluated.
enum Gate {
    When,
    Until,
}

/// Result of a gate evaluation.
enum Verdict {
    /// The predicate held; proceed to the next stage.
    Holds,
    /// The predicate failed; re-enter the cycle after this delay.
    Wait(Duration),
    /// The predicate failed and the policy is exhausted.
    GiveUp,
}

impl<C> Session<C> {
    /// Drive the sequence to a terminal state.
    pub(crate) async fn run(mut self) -> Outcome {
        loop {
            // PRECHECK: a false precondition never invokes the action.
            match self.evaluate(Gate::When) {
                Verdict::Holds => {}
                Verdict::Wait(delay) => {
                    self.wait(delay).await;
                    continue;
                }
                Verdict::GiveUp => return self.fail(),
            }

            // ACTING: for async actions this resumes only when the
            // action's own future resolves.
            self.action.perform(&mut self.context).await;

            // POSTCHECK
            match self.evaluate(Gate::Until) {
                Verdict::Holds => return self.succeed(),
                Verdict::Wait(delay) => self.wait(delay).await,
                Verdict::GiveUp => return self.fail(),
            }
        }
    }

    fn evaluate(&mut self, gate: Gate) -> Verdict {
        let holds = match gate {
            Gate::When => (self.when)(&self.context),
            Gate::Until => (self.until)(&self.context),
        };
        if holds {
            return Verdict::Holds;
        }

        self.attempts += 1;
        if self.policy.exhausted(self.attempts) {
            Verdict::GiveUp
        } else {
            Verdict::Wait(self.policy.delay_for_retry(self.attempts - 1))
        }
    }

    async fn wait(&mut self, delay: Duration) {
        #[cfg(feature = "tracing")]
        tracing::debug!(attempts = self.attempts, ?delay, "retry scheduled");

        self.timer.sleep(delay).await;
    }

    fn succeed(self) -> Outcome {
        #[cfg(feature = "tracing")]
        tracing::debug!(attempts = self.attempts, "sequence succeeded");

        let Session {
            on_success,
            mut context,
            ..
        } = self;
        on_success(&mut context);
        Outcome::Succeeded
    }

    fn fail(self) -> Outcome {
        #[cfg(feature = "tracing")]
        tracing::debug!(attempts = self.attempts, "attempt limit reached");

        let Session {
            on_failure,
            mut context,
            ..
        } = self;
        on_failure(&mut context);
        Outcome::Failed
    }
}

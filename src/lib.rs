//! # Persevere
//!
//! > *"Try, try, and try again"*
//!
//! Guarded, repeatable task invocation with fixed or exponential backoff
//! for Tokio.
//!
//! ## Philosophy
//!
//! **Persevere** keeps its core pure and its shell thin:
//! - [`Policy`] and [`Settings`] are plain data - backoff schedules and
//!   attempt limits are computed, cloned, and tested without a clock.
//! - One small state machine drives every sequence: precondition
//!   (`when`), action, postcondition (`until`), with a shared attempt
//!   counter and a wait between retries.
//! - The clock is injected through the [`Timer`] trait, so retry
//!   schedules are assertable in tests without real waits.
//!
//! ## Quick Example
//!
//! ```rust
//! use persevere::{Attempt, Policy};
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! struct Outbox {
//!     connected: bool,
//!     sent: bool,
//! }
//!
//! let outcome = Attempt::new(Outbox { connected: true, sent: false })
//!     .when(|outbox: &Outbox| outbox.connected)
//!     .action(|outbox: &mut Outbox| outbox.sent = true)
//!     .until(|outbox: &Outbox| outbox.sent)
//!     .policy(Policy::exponential(Duration::from_millis(100)).with_limit(10))
//!     .run()
//!     .await;
//!
//! assert!(outcome.is_success());
//! # });
//! ```
//!
//! For fire-and-forget use, [`Attempt::spawn`] starts the sequence as a
//! detached task; the `on_success` / `on_failure` callbacks are then the
//! only way to observe the result.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod action;
pub mod attempt;
pub mod policy;
pub mod session;
pub mod settings;
pub mod testing;
pub mod timer;

// Re-exports
pub use action::Action;
pub use attempt::Attempt;
pub use policy::{Backoff, Policy};
pub use session::Outcome;
pub use settings::Settings;
pub use timer::{Timer, TokioTimer};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::action::Action;
    pub use crate::attempt::Attempt;
    pub use crate::policy::{Backoff, Policy};
    pub use crate::session::Outcome;
    pub use crate::settings::Settings;
    pub use crate::timer::{Timer, TokioTimer};
}

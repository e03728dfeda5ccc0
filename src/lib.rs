//! # quiesce
//!
//! Block a test until an asynchronous condition converges.
//!
//! `quiesce` repeatedly evaluates a user-supplied predicate until it becomes
//! true, a required minimum duration elapses, or a deadline is exceeded, then
//! reports the outcome with enough detail to explain *why* polling stopped:
//!
//! - a success returns the elapsed evaluation duration;
//! - a failure carries a structured [`TimeoutReport`] whose [`TimeoutReason`]
//!   distinguishes "gave up too early" ([`ConditionMetTooEarly`]) from "gave
//!   up too late" ([`ConditionNotMet`], [`ConditionNotHeld`]).
//!
//! ## Quick start
//!
//! ```no_run
//! use std::time::Duration;
//! use quiesce::{PollSchedule, Poller, WaitConstraints};
//!
//! let elapsed = Poller::new(
//!     WaitConstraints::new()
//!         .at_least(Duration::from_millis(100))
//!         .at_most(Duration::from_secs(5)),
//!     PollSchedule::fixed(Duration::from_millis(50)),
//! )
//! .alias("messages flushed")
//! .on_timeout(|report| eprintln!("{}", report.message()))
//! .run_fn(|| queue_len() == 0)?;
//!
//! println!("flushed after {elapsed:?}");
//! # fn queue_len() -> usize { 0 }
//! # Ok::<(), quiesce::WaitError>(())
//! ```
//!
//! ## Constraints
//!
//! [`WaitConstraints`] combines three optional bounds: `at_least` (success
//! earlier than this fails the run), `at_most` (the deadline, default 10 s),
//! and `hold_for` (the condition must stay *continuously* true for this long
//! before it counts). [`PollSchedule`] controls when evaluations happen: a
//! poll delay before the first tick, then a fixed, incrementing, or custom
//! interval between ticks.
//!
//! ## Predicate errors
//!
//! Fallible predicates go through [`Poller::run`]; an [`IgnorePolicy`]
//! decides which errors count as "condition false this tick" and which abort
//! the run immediately without a report.
//!
//! Each run owns its own constraints, schedule, and evaluator; concurrent
//! runs on different threads share nothing and need no locking.
//!
//! [`ConditionMetTooEarly`]: TimeoutReason::ConditionMetTooEarly
//! [`ConditionNotMet`]: TimeoutReason::ConditionNotMet
//! [`ConditionNotHeld`]: TimeoutReason::ConditionNotHeld

#![warn(missing_docs)]
#![warn(clippy::all)]

mod classifier;
mod constraints;
mod error;
mod evaluator;
mod poller;
mod report;
mod schedule;

pub use constraints::{WaitConstraints, DEFAULT_DEADLINE};
pub use error::{BoxError, ConstraintError, WaitError};
pub use evaluator::{ConditionEvaluator, ErrorPredicate, Evaluation, IgnorePolicy};
pub use poller::Poller;
pub use report::{TimeoutReason, TimeoutReport};
pub use schedule::{IntervalStrategy, PollSchedule};

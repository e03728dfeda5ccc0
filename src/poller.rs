//! The poll loop: drives scheduled evaluations to a verdict.

use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::classifier::{build_report, classify, RunState};
use crate::constraints::WaitConstraints;
use crate::error::{BoxError, WaitError};
use crate::evaluator::{ConditionEvaluator, Evaluation, IgnorePolicy};
use crate::report::TimeoutReport;
use crate::schedule::PollSchedule;

type TimeoutCallback = Box<dyn FnOnce(&TimeoutReport) + Send>;

/// One blocking poll run: constraints, schedule, and evaluation settings.
///
/// A `Poller` owns everything for a single invocation and is consumed by
/// [`run`](Poller::run); independent runs share no state. Between ticks the
/// calling thread sleeps for the wait the schedule yields, and that sleep is
/// the only blocking point; a long-running predicate simply stretches the
/// effective interval.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use quiesce::{PollSchedule, Poller, WaitConstraints};
///
/// let elapsed = Poller::new(
///     WaitConstraints::new().at_most(Duration::from_secs(2)),
///     PollSchedule::fixed(Duration::from_millis(50)),
/// )
/// .alias("replica caught up")
/// .run_fn(|| replica_lag() == 0)?;
/// # fn replica_lag() -> u64 { 0 }
/// # Ok::<(), quiesce::WaitError>(())
/// ```
pub struct Poller {
    constraints: WaitConstraints,
    schedule: PollSchedule,
    ignore: IgnorePolicy,
    alias: Option<String>,
    on_timeout: Option<TimeoutCallback>,
}

impl Poller {
    /// Create a poller from constraints and a fresh schedule.
    pub fn new(constraints: WaitConstraints, schedule: PollSchedule) -> Self {
        Self {
            constraints,
            schedule,
            ignore: IgnorePolicy::default(),
            alias: None,
            on_timeout: None,
        }
    }

    /// Attach a human label to this run for diagnostics.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Set which predicate errors are tolerated as "condition false".
    pub fn ignore(mut self, policy: IgnorePolicy) -> Self {
        self.ignore = policy;
        self
    }

    /// Register a callback invoked with the report when the run fails.
    ///
    /// The callback fires at most once, synchronously on the polling thread,
    /// before the error is returned. It never fires on success, and never on
    /// an untolerated evaluation error (no report exists on that path). It
    /// must not block indefinitely, as doing so delays failure reporting.
    pub fn on_timeout<C>(mut self, callback: C) -> Self
    where
        C: FnOnce(&TimeoutReport) + Send + 'static,
    {
        self.on_timeout = Some(Box::new(callback));
        self
    }

    /// Poll `predicate` until it converges or a constraint stops the run.
    ///
    /// On success returns the elapsed wall-clock time from poll start to the
    /// decision. The failure paths are:
    ///
    /// - satisfied before `at_least` elapsed: fails immediately with reason
    ///   [`ConditionMetTooEarly`](crate::TimeoutReason::ConditionMetTooEarly);
    /// - `at_most` elapsed without the condition ever holding: reason
    ///   [`ConditionNotMet`](crate::TimeoutReason::ConditionNotMet);
    /// - `at_most` elapsed with a hold window that was engaged but never
    ///   completed: reason
    ///   [`ConditionNotHeld`](crate::TimeoutReason::ConditionNotHeld);
    /// - an untolerated predicate error:
    ///   [`WaitError::Evaluation`], bypassing classification.
    ///
    /// The deadline is checked against wall-clock time, not tick count, and
    /// the pre-deadline sleep is capped so the final evaluation lands at the
    /// deadline; a result that comes back satisfied on that last tick still
    /// succeeds.
    pub fn run<F>(mut self, predicate: F) -> Result<Duration, WaitError>
    where
        F: FnMut() -> Result<bool, BoxError>,
    {
        self.constraints.validate()?;
        self.schedule.validate()?;

        debug!(
            alias = self.alias.as_deref().unwrap_or(""),
            constraints = ?self.constraints,
            schedule = ?self.schedule,
            "starting poll run"
        );

        let mut evaluator = ConditionEvaluator::new(predicate, self.ignore.clone());
        let mut state = RunState::default();
        let mut tick: u64 = 0;
        let start = Instant::now();
        let mut wait = self.schedule.next(Duration::ZERO);

        loop {
            if let Some(deadline) = self.constraints.at_most {
                wait = wait.min(deadline.saturating_sub(start.elapsed()));
            }
            if !wait.is_zero() {
                std::thread::sleep(wait);
            }
            tick += 1;

            let verdict = evaluator.evaluate();
            let now = Instant::now();
            let elapsed = now.duration_since(start);

            let holds = match verdict {
                Evaluation::Holds => true,
                Evaluation::DoesNotHold => false,
                Evaluation::Failed(source) => {
                    debug!(tick, ?elapsed, error = %source, "aborting: untolerated predicate error");
                    return Err(WaitError::Evaluation { source });
                }
            };
            state.observe(holds, now);
            let satisfied = state.satisfied(self.constraints.hold_for, now);
            trace!(tick, holds, satisfied, ?elapsed, "poll tick");

            if satisfied {
                if self.constraints.at_least.is_some_and(|min| elapsed < min) {
                    return Err(self.fail(true, elapsed, &state));
                }
                debug!(tick, ?elapsed, "condition satisfied");
                return Ok(elapsed);
            }

            if let Some(deadline) = self.constraints.at_most {
                if elapsed >= deadline {
                    return Err(self.fail(false, elapsed, &state));
                }
            }

            wait = self.schedule.next(elapsed);
        }
    }

    /// [`run`](Poller::run) for predicates that cannot fail.
    pub fn run_fn<F>(self, mut predicate: F) -> Result<Duration, WaitError>
    where
        F: FnMut() -> bool,
    {
        self.run(move || Ok(predicate()))
    }

    fn fail(&mut self, satisfied: bool, elapsed: Duration, state: &RunState) -> WaitError {
        let reason = classify(satisfied, elapsed, &self.constraints, state);
        let report = build_report(reason, self.alias.take(), &self.constraints, elapsed);
        debug!(?reason, ?elapsed, "poll run failed");
        if let Some(callback) = self.on_timeout.take() {
            callback(&report);
        }
        WaitError::Timeout { report }
    }
}

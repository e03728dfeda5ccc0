//! Error types for condition polling.

use thiserror::Error;

use crate::report::TimeoutReport;

/// Boxed error type accepted from condition predicates.
///
/// Predicates may fail with any error; whether a failure aborts the run or
/// counts as "condition false this tick" is decided by the configured
/// [`IgnorePolicy`](crate::IgnorePolicy).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Invalid configuration, detected before polling starts.
///
/// Constraint errors are fatal and never retried: a run that would be
/// guaranteed to fail (or to misbehave mid-run) is rejected up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConstraintError {
    /// `at_least` exceeds `at_most`, so no success instant exists.
    #[error("at_least ({at_least:?}) must not exceed at_most ({at_most:?})")]
    MinimumExceedsDeadline {
        /// The configured minimum wait.
        at_least: std::time::Duration,
        /// The configured deadline.
        at_most: std::time::Duration,
    },

    /// The hold window is longer than the deadline, so it can never complete.
    #[error("hold_for ({hold_for:?}) can never complete within at_most ({at_most:?})")]
    HoldExceedsDeadline {
        /// The configured hold window.
        hold_for: std::time::Duration,
        /// The configured deadline.
        at_most: std::time::Duration,
    },

    /// The interval strategy produces a zero wait after the first tick.
    ///
    /// A zero interval would turn the poll loop into a busy-wait, so it is
    /// rejected at configuration time rather than mid-run.
    #[error("poll interval must be positive after the first tick (zero at tick {tick})")]
    ZeroInterval {
        /// The first tick at which the strategy produced a zero interval.
        tick: u64,
    },
}

/// Error returned when a poll run does not succeed.
///
/// The three variants correspond to the three terminal failure paths: bad
/// configuration (before any polling), an untolerated predicate error
/// (mid-run, no report), and a classified timeout (carrying the full
/// [`TimeoutReport`]).
#[derive(Debug, Error)]
pub enum WaitError {
    /// The constraints or schedule were invalid; no polling happened.
    #[error(transparent)]
    Constraint(#[from] ConstraintError),

    /// The predicate failed with an error not covered by the ignore policy.
    ///
    /// The run aborts immediately: no timeout report is built and the
    /// on-timeout callback does not fire. The original error is preserved
    /// as the source.
    #[error("condition evaluation failed: {source}")]
    Evaluation {
        /// The predicate's original error.
        #[source]
        source: BoxError,
    },

    /// The condition did not converge as required within the constraints.
    ///
    /// The `Display` output of this variant equals the report's message.
    #[error("{}", .report.message())]
    Timeout {
        /// The structured description of why polling stopped.
        report: TimeoutReport,
    },
}

impl WaitError {
    /// The timeout report, if this error is a classified timeout.
    pub fn report(&self) -> Option<&TimeoutReport> {
        match self {
            WaitError::Timeout { report } => Some(report),
            _ => None,
        }
    }
}

//! Timeout report: the immutable record handed out when polling fails.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Why a poll run stopped without success.
///
/// Exactly one reason applies per failed run; successful runs produce no
/// reason at all. The three reasons partition into "early" (the condition
/// converged faster than allowed) and "late" (it never converged as
/// required); see [`TimeoutReason::is_early`] and [`TimeoutReason::is_late`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeoutReason {
    /// The condition was satisfied before `at_least` elapsed.
    ///
    /// When a hold window is configured, satisfaction means the window
    /// completed; a window completing before `at_least` still reports this
    /// reason (the too-early check wins over [`ConditionNotHeld`]).
    ///
    /// [`ConditionNotHeld`]: TimeoutReason::ConditionNotHeld
    ConditionMetTooEarly,

    /// The condition was never observed true before `at_most` elapsed.
    ConditionNotMet,

    /// The condition was observed true, but never stayed true for the full
    /// hold window before `at_most` elapsed.
    ConditionNotHeld,
}

impl TimeoutReason {
    /// Whether the run gave up because the condition converged too early.
    pub fn is_early(self) -> bool {
        matches!(self, TimeoutReason::ConditionMetTooEarly)
    }

    /// Whether the run gave up because the condition converged too late
    /// (or never).
    ///
    /// Always the negation of [`is_early`](TimeoutReason::is_early): the two
    /// predicates are mutually exclusive and exhaustive.
    pub fn is_late(self) -> bool {
        !self.is_early()
    }
}

/// Immutable description of a failed poll run.
///
/// Built exactly once, at the moment the loop decides to stop
/// unsuccessfully, and handed to the on-timeout callback (if any) before the
/// run returns [`WaitError::Timeout`](crate::WaitError::Timeout). Never
/// mutated afterwards; the caller owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutReport {
    alias: Option<String>,
    message: String,
    evaluation_duration: Duration,
    reason: TimeoutReason,
}

impl TimeoutReport {
    pub(crate) fn new(
        alias: Option<String>,
        message: String,
        evaluation_duration: Duration,
        reason: TimeoutReason,
    ) -> Self {
        Self {
            alias,
            message,
            evaluation_duration,
            reason,
        }
    }

    /// The caller-supplied label for this run, if one was set.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Human-readable diagnostic explaining why polling stopped.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Wall-clock time from poll start to the stop decision.
    pub fn evaluation_duration(&self) -> Duration {
        self.evaluation_duration
    }

    /// The reason code for this timeout.
    pub fn reason(&self) -> TimeoutReason {
        self.reason
    }

    /// Whether this run gave up too early. See [`TimeoutReason::is_early`].
    pub fn is_early_timeout(&self) -> bool {
        self.reason.is_early()
    }

    /// Whether this run gave up too late. See [`TimeoutReason::is_late`].
    pub fn is_late_timeout(&self) -> bool {
        self.reason.is_late()
    }
}

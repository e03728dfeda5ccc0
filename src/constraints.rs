//! Duration constraints applied to a poll run.

use std::time::Duration;

use crate::error::ConstraintError;

/// Deadline used when none is configured explicitly.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(10);

/// The duration constraints for one poll run.
///
/// All three bounds are optional and immutable once polling begins:
///
/// - `at_least`: minimum elapsed time before success is accepted. A
///   condition satisfied earlier fails with
///   [`ConditionMetTooEarly`](crate::TimeoutReason::ConditionMetTooEarly).
/// - `at_most`: maximum elapsed time allowed before failing. Defaults to
///   [`DEFAULT_DEADLINE`]; `None` means wait forever.
/// - `hold_for`: minimum *continuous* time the condition must stay true
///   once first observed true before it counts as satisfied.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use quiesce::WaitConstraints;
///
/// let constraints = WaitConstraints::new()
///     .at_least(Duration::from_millis(200))
///     .at_most(Duration::from_secs(1));
/// assert!(constraints.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitConstraints {
    /// Minimum elapsed time before success is accepted.
    pub at_least: Option<Duration>,
    /// Maximum elapsed time allowed before failing. `None` waits forever.
    pub at_most: Option<Duration>,
    /// Minimum continuous time the condition must remain true.
    pub hold_for: Option<Duration>,
}

impl Default for WaitConstraints {
    fn default() -> Self {
        Self {
            at_least: None,
            at_most: Some(DEFAULT_DEADLINE),
            hold_for: None,
        }
    }
}

impl WaitConstraints {
    /// Create constraints with the default deadline and no other bounds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum wait before success is accepted.
    pub fn at_least(mut self, min: Duration) -> Self {
        self.at_least = Some(min);
        self
    }

    /// Set the deadline after which the run fails.
    pub fn at_most(mut self, deadline: Duration) -> Self {
        self.at_most = Some(deadline);
        self
    }

    /// Remove the deadline entirely: poll until the condition converges.
    pub fn forever(mut self) -> Self {
        self.at_most = None;
        self
    }

    /// Require the condition to stay true continuously for `window`.
    pub fn hold_for(mut self, window: Duration) -> Self {
        self.hold_for = Some(window);
        self
    }

    /// Check that the constraints describe a run that can succeed.
    ///
    /// Violations are detected before polling starts and are never retried.
    pub fn validate(&self) -> Result<(), ConstraintError> {
        if let (Some(min), Some(deadline)) = (self.at_least, self.at_most) {
            if min > deadline {
                return Err(ConstraintError::MinimumExceedsDeadline {
                    at_least: min,
                    at_most: deadline,
                });
            }
        }
        if let (Some(window), Some(deadline)) = (self.hold_for, self.at_most) {
            if window > deadline {
                return Err(ConstraintError::HoldExceedsDeadline {
                    hold_for: window,
                    at_most: deadline,
                });
            }
        }
        Ok(())
    }
}

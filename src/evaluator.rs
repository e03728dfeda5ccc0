//! Condition evaluation with error tolerance.

use std::fmt;
use std::sync::Arc;

use crate::error::BoxError;

/// Shared matcher deciding whether a predicate error is tolerable.
pub type ErrorPredicate =
    Arc<dyn Fn(&(dyn std::error::Error + Send + Sync + 'static)) -> bool + Send + Sync>;

/// Which predicate errors are tolerated during polling.
///
/// A tolerated error is treated as "condition false this tick" and polling
/// continues; an untolerated error aborts the run immediately and surfaces
/// the original error, bypassing timeout classification entirely.
#[derive(Clone, Default)]
pub enum IgnorePolicy {
    /// Every predicate error aborts the run. The default.
    #[default]
    None,

    /// Every predicate error is tolerated.
    All,

    /// Errors for which the predicate returns `true` are tolerated.
    Matching(ErrorPredicate),
}

impl fmt::Debug for IgnorePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IgnorePolicy::None => f.write_str("None"),
            IgnorePolicy::All => f.write_str("All"),
            IgnorePolicy::Matching(_) => f.write_str("Matching(..)"),
        }
    }
}

impl IgnorePolicy {
    /// Tolerate errors for which `matcher` returns `true`.
    pub fn matching<F>(matcher: F) -> Self
    where
        F: Fn(&(dyn std::error::Error + Send + Sync + 'static)) -> bool + Send + Sync + 'static,
    {
        IgnorePolicy::Matching(Arc::new(matcher))
    }

    /// Whether an error from the predicate should be swallowed.
    pub fn tolerates(&self, err: &(dyn std::error::Error + Send + Sync + 'static)) -> bool {
        match self {
            IgnorePolicy::None => false,
            IgnorePolicy::All => true,
            IgnorePolicy::Matching(matcher) => matcher(err),
        }
    }
}

/// One tick's verdict on the condition.
#[derive(Debug)]
pub enum Evaluation {
    /// The predicate returned `true`.
    Holds,

    /// The predicate returned `false`, or failed with a tolerated error.
    DoesNotHold,

    /// The predicate failed with an untolerated error; the run aborts.
    Failed(BoxError),
}

/// Wraps the user predicate and applies the ignore policy, once per tick.
pub struct ConditionEvaluator<F> {
    predicate: F,
    policy: IgnorePolicy,
}

impl<F> ConditionEvaluator<F>
where
    F: FnMut() -> Result<bool, BoxError>,
{
    /// Wrap `predicate` with the given tolerance for its errors.
    pub fn new(predicate: F, policy: IgnorePolicy) -> Self {
        Self { predicate, policy }
    }

    /// Invoke the predicate once and map the outcome through the policy.
    pub fn evaluate(&mut self) -> Evaluation {
        match (self.predicate)() {
            Ok(true) => Evaluation::Holds,
            Ok(false) => Evaluation::DoesNotHold,
            Err(err) if self.policy.tolerates(err.as_ref()) => Evaluation::DoesNotHold,
            Err(err) => Evaluation::Failed(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn io_err() -> BoxError {
        Box::new(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"))
    }

    #[test]
    fn plain_results_pass_through() {
        let mut flips = [Ok(true), Ok(false)].into_iter();
        let mut eval = ConditionEvaluator::new(move || flips.next().unwrap(), IgnorePolicy::None);
        assert!(matches!(eval.evaluate(), Evaluation::Holds));
        assert!(matches!(eval.evaluate(), Evaluation::DoesNotHold));
    }

    #[test]
    fn default_policy_propagates_errors() {
        let mut eval = ConditionEvaluator::new(|| Err(io_err()), IgnorePolicy::default());
        assert!(matches!(eval.evaluate(), Evaluation::Failed(_)));
    }

    #[test]
    fn all_policy_swallows_errors() {
        let mut eval = ConditionEvaluator::new(|| Err(io_err()), IgnorePolicy::All);
        assert!(matches!(eval.evaluate(), Evaluation::DoesNotHold));
    }

    #[test]
    fn matching_policy_filters_by_error_kind() {
        let policy = IgnorePolicy::matching(|err| {
            err.downcast_ref::<io::Error>()
                .is_some_and(|e| e.kind() == io::ErrorKind::ConnectionRefused)
        });

        let mut tolerated = ConditionEvaluator::new(|| Err(io_err()), policy.clone());
        assert!(matches!(tolerated.evaluate(), Evaluation::DoesNotHold));

        let mut fatal = ConditionEvaluator::new(
            || Err("schema mismatch".into()),
            policy,
        );
        assert!(matches!(fatal.evaluate(), Evaluation::Failed(_)));
    }
}

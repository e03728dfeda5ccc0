//! Timeout classification: deciding *why* a run stopped without success.

use std::time::{Duration, Instant};

use crate::constraints::WaitConstraints;
use crate::report::{TimeoutReason, TimeoutReport};

/// Per-run condition bookkeeping, updated once per tick.
///
/// Tracks whether the condition was ever observed true (needed to tell
/// `ConditionNotHeld` apart from `ConditionNotMet`) and when the current
/// continuous-true window started.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct RunState {
    ever_true: bool,
    window_started: Option<Instant>,
}

impl RunState {
    /// Record one tick's observation. A false observation breaks the
    /// current hold window; the window restarts on the next true tick.
    pub(crate) fn observe(&mut self, holds: bool, now: Instant) {
        if holds {
            self.ever_true = true;
            if self.window_started.is_none() {
                self.window_started = Some(now);
            }
        } else {
            self.window_started = None;
        }
    }

    pub(crate) fn ever_true(&self) -> bool {
        self.ever_true
    }

    /// Whether the condition currently counts as satisfied: true right now,
    /// and held continuously for the full window if one is required.
    pub(crate) fn satisfied(&self, hold_for: Option<Duration>, now: Instant) -> bool {
        match (self.window_started, hold_for) {
            (Some(_), None) => true,
            (Some(started), Some(window)) => now.duration_since(started) >= window,
            (None, _) => false,
        }
    }
}

/// Map a stop decision to its reason code.
///
/// Decision order matters: a satisfied condition stopped by `at_least` is
/// too early; otherwise an engaged-but-broken hold window is not-held;
/// everything else is not-met. The ever-true tracking in [`RunState`] is
/// what keeps a broken hold window from being misreported as plain not-met.
pub(crate) fn classify(
    satisfied: bool,
    elapsed: Duration,
    constraints: &WaitConstraints,
    state: &RunState,
) -> TimeoutReason {
    if satisfied && constraints.at_least.is_some_and(|min| elapsed < min) {
        TimeoutReason::ConditionMetTooEarly
    } else if constraints.hold_for.is_some() && state.ever_true() {
        TimeoutReason::ConditionNotHeld
    } else {
        TimeoutReason::ConditionNotMet
    }
}

/// Build the report for a failed run, message included.
pub(crate) fn build_report(
    reason: TimeoutReason,
    alias: Option<String>,
    constraints: &WaitConstraints,
    elapsed: Duration,
) -> TimeoutReport {
    let subject = match &alias {
        Some(alias) => format!("condition with alias '{alias}'"),
        None => "condition".to_string(),
    };
    let deadline = constraints.at_most.unwrap_or(elapsed);
    let message = match reason {
        TimeoutReason::ConditionMetTooEarly => {
            let min = constraints.at_least.unwrap_or_default();
            format!(
                "{subject} was satisfied after {elapsed:?} which is earlier than the required minimum of {min:?}"
            )
        }
        TimeoutReason::ConditionNotMet => {
            format!("{subject} was not fulfilled within {deadline:?}")
        }
        TimeoutReason::ConditionNotHeld => {
            let window = constraints.hold_for.unwrap_or_default();
            format!("{subject} was never held for {window:?} within {deadline:?}")
        }
    };
    TimeoutReport::new(alias, message, elapsed, reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn window_tracking_through_true_false_true() {
        let base = Instant::now();
        let mut state = RunState::default();

        state.observe(true, base);
        assert!(state.ever_true());
        assert!(!state.satisfied(Some(ms(100)), base + ms(50)));
        assert!(state.satisfied(Some(ms(100)), base + ms(100)));

        // A false tick breaks the window; the next true tick restarts it.
        state.observe(false, base + ms(150));
        assert!(!state.satisfied(Some(ms(100)), base + ms(150)));
        state.observe(true, base + ms(200));
        assert!(!state.satisfied(Some(ms(100)), base + ms(250)));
        assert!(state.satisfied(Some(ms(100)), base + ms(300)));
    }

    #[test]
    fn satisfied_without_hold_window_is_immediate() {
        let base = Instant::now();
        let mut state = RunState::default();
        state.observe(true, base);
        assert!(state.satisfied(None, base));
    }

    #[test]
    fn too_early_wins_even_with_hold_window() {
        let constraints = WaitConstraints::new()
            .at_least(ms(500))
            .hold_for(ms(100))
            .at_most(ms(1_000));
        let mut state = RunState::default();
        state.observe(true, Instant::now());

        let reason = classify(true, ms(200), &constraints, &state);
        assert_eq!(reason, TimeoutReason::ConditionMetTooEarly);
    }

    #[test]
    fn engaged_window_reports_not_held() {
        let constraints = WaitConstraints::new().hold_for(ms(500)).at_most(ms(1_000));
        let mut state = RunState::default();
        state.observe(true, Instant::now());
        state.observe(false, Instant::now());

        let reason = classify(false, ms(1_000), &constraints, &state);
        assert_eq!(reason, TimeoutReason::ConditionNotHeld);
    }

    #[test]
    fn never_true_reports_not_met_even_with_hold_window() {
        let constraints = WaitConstraints::new().hold_for(ms(500)).at_most(ms(1_000));
        let state = RunState::default();

        let reason = classify(false, ms(1_000), &constraints, &state);
        assert_eq!(reason, TimeoutReason::ConditionNotMet);
    }

    #[test]
    fn satisfied_past_minimum_is_not_early() {
        let constraints = WaitConstraints::new().at_least(ms(100)).at_most(ms(1_000));
        let mut state = RunState::default();
        state.observe(false, Instant::now());

        let reason = classify(false, ms(1_000), &constraints, &state);
        assert_eq!(reason, TimeoutReason::ConditionNotMet);
    }

    #[test]
    fn report_messages_name_the_alias_and_durations() {
        let constraints = WaitConstraints::new().at_most(ms(200));
        let report = build_report(
            TimeoutReason::ConditionNotMet,
            Some("queue drained".to_string()),
            &constraints,
            ms(210),
        );
        assert_eq!(report.alias(), Some("queue drained"));
        assert!(report.message().contains("queue drained"));
        assert!(report.message().contains("200ms"));
        assert_eq!(report.evaluation_duration(), ms(210));
    }

    #[test]
    fn too_early_message_names_both_instants() {
        let constraints = WaitConstraints::new().at_least(Duration::from_secs(1));
        let report = build_report(
            TimeoutReason::ConditionMetTooEarly,
            None,
            &constraints,
            ms(400),
        );
        assert!(report.message().contains("400ms"));
        assert!(report.message().contains("1s"));
        assert!(report.is_early_timeout());
    }
}

//! Poll scheduling: when each condition evaluation happens.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::error::ConstraintError;

/// How many ticks of a custom strategy are probed by [`PollSchedule::validate`].
const CUSTOM_PROBE_TICKS: u64 = 8;

/// Spacing between evaluations after the first.
#[derive(Clone)]
pub enum IntervalStrategy {
    /// The same interval between every tick.
    Fixed(Duration),

    /// Linear backoff: the interval grows by `increment` each tick, starting
    /// at `start` (so the waits are `start`, `start + increment`, ...).
    Incrementing {
        /// Interval before the second tick.
        start: Duration,
        /// Amount added to the interval for each subsequent tick.
        increment: Duration,
    },

    /// Caller-supplied function of (tick index, elapsed time) to the wait
    /// before that tick. Tick indices start at 1 for the first wait after
    /// the poll delay.
    Custom(Arc<dyn Fn(u64, Duration) -> Duration + Send + Sync>),
}

impl fmt::Debug for IntervalStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntervalStrategy::Fixed(d) => f.debug_tuple("Fixed").field(d).finish(),
            IntervalStrategy::Incrementing { start, increment } => f
                .debug_struct("Incrementing")
                .field("start", start)
                .field("increment", increment)
                .finish(),
            IntervalStrategy::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Produces the sequence of waits between condition evaluations.
///
/// The first wait is the poll delay (time before the first evaluation);
/// every later wait comes from the interval strategy. The sequence is
/// logically infinite and consumed one wait at a time; the poll loop alone
/// decides when to stop drawing from it. A schedule is consumed by a single
/// run and is not restartable.
///
/// Defaults follow the original semantics of this style of poller: a fixed
/// strategy delays by one interval before the first evaluation, while
/// incrementing and custom strategies start evaluating immediately.
#[derive(Debug, Clone)]
pub struct PollSchedule {
    delay: Duration,
    strategy: IntervalStrategy,
    tick: u64,
}

impl PollSchedule {
    /// A fixed interval between ticks, with the delay defaulting to one
    /// interval.
    pub fn fixed(interval: Duration) -> Self {
        Self {
            delay: interval,
            strategy: IntervalStrategy::Fixed(interval),
            tick: 0,
        }
    }

    /// Linear backoff starting at `start`, growing by `increment` per tick.
    pub fn incrementing(start: Duration, increment: Duration) -> Self {
        Self {
            delay: Duration::ZERO,
            strategy: IntervalStrategy::Incrementing { start, increment },
            tick: 0,
        }
    }

    /// A caller-supplied interval function of (tick index, elapsed time).
    pub fn custom<F>(interval: F) -> Self
    where
        F: Fn(u64, Duration) -> Duration + Send + Sync + 'static,
    {
        Self {
            delay: Duration::ZERO,
            strategy: IntervalStrategy::Custom(Arc::new(interval)),
            tick: 0,
        }
    }

    /// Override the wait before the first evaluation. Zero is allowed.
    pub fn poll_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// The wait before the first evaluation.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// The configured interval strategy.
    pub fn strategy(&self) -> &IntervalStrategy {
        &self.strategy
    }

    /// Reject strategies that would produce a zero interval after the
    /// first tick.
    ///
    /// Fixed and incrementing strategies are checked exactly; a custom
    /// strategy is probed over its first few ticks with zero elapsed time,
    /// which is as much as can be decided at configuration time.
    pub fn validate(&self) -> Result<(), ConstraintError> {
        match &self.strategy {
            IntervalStrategy::Fixed(d) if d.is_zero() => {
                Err(ConstraintError::ZeroInterval { tick: 1 })
            }
            IntervalStrategy::Incrementing { start, .. } if start.is_zero() => {
                Err(ConstraintError::ZeroInterval { tick: 1 })
            }
            IntervalStrategy::Custom(f) => {
                for tick in 1..=CUSTOM_PROBE_TICKS {
                    if f(tick, Duration::ZERO).is_zero() {
                        return Err(ConstraintError::ZeroInterval { tick });
                    }
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Yield the wait before the next evaluation.
    ///
    /// The first call returns the poll delay; subsequent calls consult the
    /// interval strategy with the tick index and the caller's elapsed time.
    pub fn next(&mut self, elapsed: Duration) -> Duration {
        let tick = self.tick;
        self.tick += 1;
        if tick == 0 {
            return self.delay;
        }
        match &self.strategy {
            IntervalStrategy::Fixed(d) => *d,
            IntervalStrategy::Incrementing { start, increment } => {
                let steps = u32::try_from(tick - 1).unwrap_or(u32::MAX);
                start.saturating_add(increment.saturating_mul(steps))
            }
            IntervalStrategy::Custom(f) => f(tick, elapsed),
        }
    }
}

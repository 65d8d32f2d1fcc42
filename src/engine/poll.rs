//! Bounded fixed-interval polling.
//!
//! Attempts an operation, sleeping a fixed interval between attempts, until
//! it succeeds or the accumulated sleep reaches the ceiling. The accumulated
//! wait counts sleeps only, so the time spent inside each attempt does not
//! shorten the budget.
//!
//! With interval `i` and ceiling `c`, attempts happen at accumulated waits
//! `0, i, 2i, ...` up to and including the last multiple of `i` not above
//! `c`. An operation that starts succeeding at time `T` is therefore seen iff
//! `T <= c` (for `c` a multiple of `i`).

use std::time::Duration;
use tracing::debug;

/// Something that can pause the current thread.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration);
}

/// Sleeps for real.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Polling schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub ceiling: Duration,
}

impl PollPolicy {
    pub fn new(interval: Duration, ceiling: Duration) -> Self {
        PollPolicy { interval, ceiling }
    }

    /// Upper bound on the number of attempts this policy makes.
    pub fn max_attempts(&self) -> u32 {
        if self.interval.is_zero() {
            return 1;
        }
        (self.ceiling.as_millis() / self.interval.as_millis()) as u32 + 1
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        PollPolicy {
            interval: Duration::from_secs(5),
            ceiling: Duration::from_secs(120),
        }
    }
}

/// Result of a poll
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome<T> {
    Ready {
        value: T,
        attempts: u32,
        waited: Duration,
    },
    TimedOut {
        attempts: u32,
        waited: Duration,
        last_error: Option<String>,
    },
}

impl<T> PollOutcome<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, PollOutcome::Ready { .. })
    }

    pub fn attempts(&self) -> u32 {
        match self {
            PollOutcome::Ready { attempts, .. } | PollOutcome::TimedOut { attempts, .. } => *attempts,
        }
    }
}

/// Poll `attempt` under `policy`.
///
/// A zero interval makes exactly one attempt.
pub fn poll_until<T, F>(policy: &PollPolicy, sleeper: &dyn Sleeper, mut attempt: F) -> PollOutcome<T>
where
    F: FnMut() -> Result<T, String>,
{
    let mut waited = Duration::ZERO;
    let mut attempts = 0;

    loop {
        attempts += 1;
        let last_error = match attempt() {
            Ok(value) => {
                return PollOutcome::Ready {
                    value,
                    attempts,
                    waited,
                }
            }
            Err(e) => e,
        };
        debug!(attempts, waited_secs = waited.as_secs(), error = %last_error, "poll attempt failed");

        if policy.interval.is_zero() || waited + policy.interval > policy.ceiling {
            return PollOutcome::TimedOut {
                attempts,
                waited,
                last_error: Some(last_error),
            };
        }

        sleeper.sleep(policy.interval);
        waited += policy.interval;
    }
}

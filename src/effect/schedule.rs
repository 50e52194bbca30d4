//! Retry schedules.
//!
//! A [`Schedule`] says how many times a computation may run and how long
//! to wait between runs. Retrying stops at the first terminal non-failure
//! result (`Success`, or `None` for optional computations); when the
//! budget is spent the last `Failure` is returned.
//!
//! # Examples
//!
//! ```rust
//! use std::time::Duration;
//! use tryflow::effect::Schedule;
//!
//! let schedule = Schedule::exponential(Duration::from_millis(100), 4);
//! assert_eq!(schedule.attempts(), 4);
//! assert_eq!(schedule.delay_before_retry(1), Some(Duration::from_millis(100)));
//! assert_eq!(schedule.delay_before_retry(2), Some(Duration::from_millis(200)));
//! assert_eq!(schedule.delay_before_retry(3), Some(Duration::from_millis(400)));
//!
//! assert_eq!(Schedule::immediate(3).delay_before_retry(1), None);
//! ```

use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;

use super::boundary::Thunk;
use crate::control::Fallible;

/// How often, and how patiently, to retry a failing computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Retry without waiting.
    Immediate {
        /// Total number of runs, including the first.
        attempts: usize,
    },
    /// Wait `initial_delay` before the first retry and double the wait
    /// before each subsequent one.
    Exponential {
        /// Wait before the first retry.
        initial_delay: Duration,
        /// Total number of runs, including the first.
        attempts: usize,
    },
}

impl Schedule {
    /// Retries without delay. `attempts == 0` is treated as 1.
    pub const fn immediate(attempts: usize) -> Self {
        Self::Immediate { attempts }
    }

    /// Retries with geometric backoff: `d, 2d, 4d, ...`.
    /// `attempts == 0` is treated as 1.
    pub const fn exponential(initial_delay: Duration, attempts: usize) -> Self {
        Self::Exponential {
            initial_delay,
            attempts,
        }
    }

    /// Total number of runs, at least 1.
    pub const fn attempts(&self) -> usize {
        let attempts = match self {
            Self::Immediate { attempts } | Self::Exponential { attempts, .. } => *attempts,
        };
        if attempts == 0 { 1 } else { attempts }
    }

    /// The wait before retry number `retry` (1-based), if any.
    pub fn delay_before_retry(&self, retry: usize) -> Option<Duration> {
        match self {
            Self::Immediate { .. } => None,
            Self::Exponential { initial_delay, .. } => {
                let exponent = u32::try_from(retry.saturating_sub(1)).unwrap_or(u32::MAX);
                Some(doubled(*initial_delay, exponent))
            }
        }
    }
}

const NANOS_PER_SECOND: u128 = 1_000_000_000;

/// `initial_delay * 2^exponent`, saturating at `Duration::MAX`.
fn doubled(initial_delay: Duration, exponent: u32) -> Duration {
    if initial_delay.is_zero() {
        return Duration::ZERO;
    }
    1u128
        .checked_shl(exponent)
        .and_then(|multiplier| initial_delay.as_nanos().checked_mul(multiplier))
        .and_then(|nanos| {
            let secs = u64::try_from(nanos / NANOS_PER_SECOND).ok()?;
            let subsec_nanos = u32::try_from(nanos % NANOS_PER_SECOND).ok()?;
            Some(Duration::new(secs, subsec_nanos))
        })
        .unwrap_or(Duration::MAX)
}

/// Runs `thunk` according to `schedule`.
pub(crate) async fn run_scheduled<R>(thunk: &Thunk<R>, schedule: Schedule) -> R
where
    R: Fallible,
{
    let attempts = schedule.attempts();
    let mut attempt = 1;
    loop {
        let result = thunk().await;
        if !result.is_failure() {
            return result;
        }
        if attempt >= attempts {
            tracing::debug!(attempts, "retry budget exhausted");
            return result;
        }
        if let Some(delay) = schedule.delay_before_retry(attempt) {
            tracing::debug!(attempt, ?delay, "backing off before retry");
            tokio::time::sleep(delay).await;
        }
        attempt += 1;
        tracing::debug!(attempt, attempts, "retrying failed computation");
    }
}

pub(crate) fn retry<R>(thunk: Thunk<R>, schedule: Schedule) -> Thunk<R>
where
    R: Fallible + Send + 'static,
{
    Arc::new(move || {
        let thunk = Arc::clone(&thunk);
        async move { run_scheduled(&thunk, schedule).await }.boxed()
    })
}

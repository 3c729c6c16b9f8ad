//! Bounded polling with cancellation

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::{BenchError, Result};

/// Shared flag that aborts a running poll at its next attempt
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Interval and upper bound for a poll loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            timeout: Duration::from_secs(15 * 60),
        }
    }
}

/// Call `attempt` until it succeeds, the timeout expires, or `cancel` fires.
///
/// Only "not ready" errors are retried. Anything else is returned at once.
pub fn poll_until<T, F>(
    what: &str,
    settings: PollSettings,
    cancel: &CancelToken,
    mut attempt: F,
) -> Result<T>
where
    F: FnMut() -> Result<T>,
{
    let start = Instant::now();
    let mut attempts: u64 = 0;

    loop {
        if cancel.is_cancelled() {
            return Err(BenchError::Cancelled(what.to_string()));
        }

        attempts += 1;
        match attempt() {
            Ok(value) => {
                debug!(what, attempts, elapsed_ms = start.elapsed().as_millis() as u64, "poll satisfied");
                return Ok(value);
            }
            Err(e) if e.is_not_ready() => {
                debug!(what, attempts, error = %e, "not ready");
            }
            Err(e) => return Err(e),
        }

        let elapsed = start.elapsed();
        if elapsed >= settings.timeout {
            return Err(BenchError::Timeout {
                what: what.to_string(),
                waited: elapsed,
            });
        }

        let remaining = settings.timeout - elapsed;
        thread::sleep(settings.interval.min(remaining));
    }
}

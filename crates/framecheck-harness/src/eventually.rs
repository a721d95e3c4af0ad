//! Polling assertion for conditions that become true asynchronously.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::thread;
use std::time::{Duration, Instant};

use framecheck_assert::AssertError;
use framecheck_core::config::HarnessConfig;

use crate::error::{HarnessError, Result};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// What one evaluation of a condition reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check {
    Done,
    /// Not there yet; the description is reported if the wait times out.
    Pending(String),
}

impl Check {
    pub fn pending(value: impl fmt::Display) -> Self {
        Check::Pending(value.to_string())
    }
}

impl From<bool> for Check {
    fn from(done: bool) -> Self {
        if done {
            Check::Done
        } else {
            Check::Pending("False".into())
        }
    }
}

enum Last {
    Never,
    Pending(String),
    Failed(AssertError),
    Panicked(Box<dyn Any + Send>),
}

impl fmt::Display for Last {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Last::Never => f.write_str("None"),
            Last::Pending(desc) => f.write_str(desc),
            Last::Failed(e) => write!(f, "{}", e),
            Last::Panicked(payload) => f.write_str(panic_message(payload.as_ref())),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "<panic>"
    }
}

/// Poll settings for [`Eventually::run`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Eventually {
    timeout: Duration,
    poll_interval: Duration,
    catch_assertions: bool,
}

impl Default for Eventually {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            catch_assertions: false,
        }
    }
}

impl Eventually {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &HarnessConfig) -> Self {
        Self {
            timeout: Duration::try_from_secs_f64(config.eventually_timeout_secs)
                .unwrap_or(DEFAULT_TIMEOUT),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            catch_assertions: false,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Keep polling through failed assertions (and panics) instead of
    /// failing on the first one.
    pub fn catch_assertions(mut self, catch: bool) -> Self {
        self.catch_assertions = catch;
        self
    }

    /// Evaluate `condition` until it reports `Done` or the timeout elapses.
    ///
    /// On timeout a caught assertion failure is returned as is (a caught
    /// panic resumes unwinding); otherwise the error names the last pending
    /// value.
    pub fn run<F>(&self, mut condition: F) -> Result<()>
    where
        F: FnMut() -> std::result::Result<Check, AssertError>,
    {
        let start = Instant::now();
        let mut last = Last::Never;
        let mut attempts = 0usize;

        while start.elapsed() < self.timeout {
            attempts += 1;
            let outcome = if self.catch_assertions {
                match panic::catch_unwind(AssertUnwindSafe(&mut condition)) {
                    Ok(outcome) => outcome,
                    Err(payload) => {
                        last = Last::Panicked(payload);
                        thread::sleep(self.poll_interval);
                        continue;
                    }
                }
            } else {
                condition()
            };

            match outcome {
                Ok(Check::Done) => {
                    tracing::trace!(attempts, "condition met");
                    return Ok(());
                }
                Ok(Check::Pending(desc)) => last = Last::Pending(desc),
                Err(e) if self.catch_assertions => last = Last::Failed(e),
                Err(e) => return Err(e.into()),
            }
            tracing::trace!(attempts, last = %last, "condition pending");
            thread::sleep(self.poll_interval);
        }

        match last {
            Last::Failed(e) => Err(HarnessError::Assertion(e)),
            Last::Panicked(payload) => panic::resume_unwind(payload),
            other => Err(HarnessError::Timeout {
                timeout: self.timeout.as_secs_f64(),
                last: other.to_string(),
            }),
        }
    }
}

/// `Eventually` with the default poll interval.
pub fn eventually<F>(condition: F, timeout: Duration, catch_assertions: bool) -> Result<()>
where
    F: FnMut() -> std::result::Result<Check, AssertError>,
{
    Eventually::new()
        .timeout(timeout)
        .catch_assertions(catch_assertions)
        .run(condition)
}

/*!
 * Rendezvous Timeout Infrastructure
 *
 * Timeout policies and a retry loop for the blocking FIFO opens.
 *
 * ## Timeout Classes
 *
 * - **None**: wait forever (the classic FIFO contract)
 * - **IPC**: 1s-30s (waiting for the counterpart process)
 * - **Custom**: user-defined
 *
 * ## Example
 *
 * ```ignore
 * let file = retry_until(
 *     || try_open_writer(path),
 *     |e| e.raw_os_error() == Some(libc::ENXIO),
 *     TimeoutPolicy::Ipc(Duration::from_secs(10)),
 * )?;
 * ```
 */

use crate::core::limits::OPEN_RETRY_SLEEP;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Timeout policy for blocking operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeoutPolicy {
    /// No timeout (infinite wait)
    #[default]
    None,

    /// IPC rendezvous timeout (1s-30s)
    Ipc(Duration),

    /// Custom timeout
    Custom(Duration),
}

impl TimeoutPolicy {
    /// Get the duration for this policy
    pub fn duration(&self) -> Option<Duration> {
        match self {
            Self::None => None,
            Self::Ipc(d) | Self::Custom(d) => Some(*d),
        }
    }

    /// Check if this timeout has expired
    pub fn is_expired(&self, start: Instant) -> bool {
        match self.duration() {
            None => false,
            Some(d) => start.elapsed() >= d,
        }
    }

    /// Get remaining time before timeout
    pub fn remaining(&self, start: Instant) -> Option<Duration> {
        self.duration().map(|d| d.saturating_sub(start.elapsed()))
    }

    /// Get timeout category as string
    pub fn category(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Ipc(_) => "ipc",
            Self::Custom(_) => "custom",
        }
    }
}

/// Outcome of a bounded retry loop
#[derive(Debug, Error)]
pub enum TimeoutError<E> {
    #[error("timed out after {elapsed:?}")]
    Timeout {
        elapsed: Duration,
        timeout: Option<Duration>,
    },

    #[error(transparent)]
    Operation(E),
}

/// Adaptive backoff: spin hints, then yields, then short sleeps
#[inline(always)]
fn adaptive_backoff(retry_count: u32) {
    match retry_count {
        0..=15 => std::hint::spin_loop(),
        16..=99 => std::thread::yield_now(),
        _ => std::thread::sleep(OPEN_RETRY_SLEEP),
    }
}

/// Repeat `operation` while `is_would_block` accepts its error, until the
/// policy expires.
///
/// Non-retryable errors are returned immediately as `TimeoutError::Operation`.
/// With `TimeoutPolicy::None` the loop never gives up.
pub fn retry_until<T, E>(
    mut operation: impl FnMut() -> Result<T, E>,
    is_would_block: impl Fn(&E) -> bool,
    timeout: TimeoutPolicy,
) -> Result<T, TimeoutError<E>> {
    let start = Instant::now();
    let deadline = timeout.duration().map(|d| start + d);
    let mut retry_count = 0u32;

    loop {
        match operation() {
            Ok(value) => return Ok(value),
            Err(e) if is_would_block(&e) => {
                if let Some(deadline) = deadline {
                    if Instant::now() >= deadline {
                        return Err(TimeoutError::Timeout {
                            elapsed: start.elapsed(),
                            timeout: timeout.duration(),
                        });
                    }
                }
                adaptive_backoff(retry_count);
                retry_count = retry_count.saturating_add(1);
            }
            Err(e) => return Err(TimeoutError::Operation(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_durations() {
        assert_eq!(TimeoutPolicy::None.duration(), None);
        assert_eq!(
            TimeoutPolicy::Custom(Duration::from_millis(5)).duration(),
            Some(Duration::from_millis(5))
        );
        assert_eq!(TimeoutPolicy::default(), TimeoutPolicy::None);
        assert_eq!(TimeoutPolicy::Ipc(Duration::from_secs(1)).category(), "ipc");
    }

    #[test]
    fn test_remaining_saturates() {
        let policy = TimeoutPolicy::Custom(Duration::ZERO);
        let start = Instant::now();
        assert_eq!(policy.remaining(start), Some(Duration::ZERO));
        assert!(policy.is_expired(start));
        assert!(!TimeoutPolicy::None.is_expired(start));
    }

    #[test]
    fn test_retry_succeeds_after_would_block() {
        let mut attempts = 0;
        let result: Result<u32, TimeoutError<&str>> = retry_until(
            || {
                attempts += 1;
                if attempts < 5 {
                    Err("busy")
                } else {
                    Ok(attempts)
                }
            },
            |e| *e == "busy",
            TimeoutPolicy::Custom(Duration::from_secs(5)),
        );
        assert_eq!(result.unwrap(), 5);
    }

    #[test]
    fn test_retry_times_out() {
        let result: Result<(), TimeoutError<&str>> = retry_until(
            || Err("busy"),
            |e| *e == "busy",
            TimeoutPolicy::Custom(Duration::from_millis(20)),
        );
        match result {
            Err(TimeoutError::Timeout { elapsed, timeout }) => {
                assert!(elapsed >= Duration::from_millis(20));
                assert_eq!(timeout, Some(Duration::from_millis(20)));
            }
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[test]
    fn test_retry_stops_on_hard_error() {
        let result: Result<(), TimeoutError<&str>> =
            retry_until(|| Err("fatal"), |e| *e == "busy", TimeoutPolicy::None);
        assert!(matches!(result, Err(TimeoutError::Operation("fatal"))));
    }
}

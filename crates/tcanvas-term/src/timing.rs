// SPDX-License-Identifier: MIT
//
// Precise delays.
//
// `thread::sleep` is only as precise as the scheduler tick, which is far too
// coarse for sub-millisecond animation pacing. The default strategy spins on
// a monotonic clock until the interval has elapsed. That pins one core for
// the whole wait, which is fine for a single-threaded console game.
// `DelayMode::Hybrid` sleeps through most of the interval and only spins
// the tail.
//
// A delay always runs to completion; there is no cancellation.

use std::thread;
use std::time::{Duration, Instant};

/// How [`precise_delay`] waits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DelayMode {
    /// Busy-wait for the whole interval.
    #[default]
    Spin,
    /// Sleep until `spin_below` remains, then busy-wait the rest.
    Hybrid { spin_below: Duration },
}

/// Block the calling thread for `duration`.
pub fn precise_delay(duration: Duration, mode: DelayMode) {
    if duration.is_zero() {
        return;
    }
    let start = Instant::now();

    if let DelayMode::Hybrid { spin_below } = mode {
        if let Some(coarse) = duration.checked_sub(spin_below) {
            thread::sleep(coarse);
        }
    }

    while start.elapsed() < duration {
        std::hint::spin_loop();
    }
}

/// Milliseconds → `Duration`, the unit scripts speak.
#[inline]
#[must_use]
pub const fn millis(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_delay_returns_immediately() {
        let start = Instant::now();
        precise_delay(Duration::ZERO, DelayMode::Spin);
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[test]
    fn spin_waits_at_least_the_interval() {
        let start = Instant::now();
        precise_delay(Duration::from_millis(3), DelayMode::Spin);
        assert!(start.elapsed() >= Duration::from_millis(3));
    }

    #[test]
    fn hybrid_waits_at_least_the_interval() {
        let start = Instant::now();
        precise_delay(
            Duration::from_millis(4),
            DelayMode::Hybrid {
                spin_below: Duration::from_millis(1),
            },
        );
        assert!(start.elapsed() >= Duration::from_millis(4));
    }

    #[test]
    fn hybrid_with_large_spin_window_still_completes() {
        let start = Instant::now();
        precise_delay(
            Duration::from_millis(2),
            DelayMode::Hybrid {
                spin_below: Duration::from_secs(1),
            },
        );
        assert!(start.elapsed() >= Duration::from_millis(2));
    }

    #[test]
    fn millis_helper() {
        assert_eq!(millis(30), Duration::from_millis(30));
    }
}

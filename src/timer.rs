use std::time::{Duration, Instant};

/// Wall-clock-anchored countdown.
///
/// Remaining time is recomputed from the start timestamp on every tick
/// rather than decremented, so the countdown self-corrects if frames are
/// delayed or the process is suspended. Expiry is signalled exactly once
/// through [`poll_expired`](Self::poll_expired); dropping the timer (session
/// reset, navigation away) cancels it without signalling.
#[derive(Debug)]
pub struct CountdownTimer {
    started_at: Instant,
    duration: Duration,
    expiry_signalled: bool,
}

impl CountdownTimer {
    pub fn start(duration_seconds: u64) -> Self {
        Self {
            started_at: Instant::now(),
            duration: Duration::from_secs(duration_seconds),
            expiry_signalled: false,
        }
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_after(self.started_at.elapsed())
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_capped(self.started_at.elapsed())
    }

    /// True exactly once, on the first poll at or past expiry.
    pub fn poll_expired(&mut self) -> bool {
        self.poll_expired_after(self.started_at.elapsed())
    }

    fn remaining_after(&self, elapsed: Duration) -> u64 {
        self.duration.saturating_sub(elapsed).as_secs()
    }

    fn elapsed_capped(&self, elapsed: Duration) -> u64 {
        elapsed.as_secs().min(self.duration.as_secs())
    }

    fn poll_expired_after(&mut self, elapsed: Duration) -> bool {
        if self.expiry_signalled {
            return false;
        }
        if elapsed >= self.duration {
            self.expiry_signalled = true;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_is_recomputed_from_elapsed_time() {
        let timer = CountdownTimer::start(1800);
        assert_eq!(timer.remaining_after(Duration::from_secs(600)), 1200);
        assert_eq!(timer.elapsed_capped(Duration::from_secs(600)), 600);
    }

    #[test]
    fn remaining_is_monotonically_non_increasing() {
        let timer = CountdownTimer::start(1800);
        let first = timer.remaining_seconds();
        let second = timer.remaining_seconds();
        assert!(second <= first);
        assert!(first <= 1800);
    }

    #[test]
    fn remaining_clamps_at_zero() {
        let timer = CountdownTimer::start(1800);
        assert_eq!(timer.remaining_after(Duration::from_secs(2000)), 0);
        assert_eq!(timer.elapsed_capped(Duration::from_secs(2000)), 1800);
    }

    #[test]
    fn expiry_signals_exactly_once() {
        let mut timer = CountdownTimer::start(5);
        assert!(timer.poll_expired_after(Duration::from_secs(10)));
        assert!(!timer.poll_expired_after(Duration::from_secs(11)));
        assert!(!timer.poll_expired_after(Duration::from_secs(12)));
    }

    #[test]
    fn running_timer_does_not_signal() {
        let mut timer = CountdownTimer::start(3600);
        assert!(!timer.poll_expired());
        assert!(timer.remaining_seconds() > 3590);
    }

    #[test]
    fn zero_duration_expires_immediately() {
        let mut timer = CountdownTimer::start(0);
        assert_eq!(timer.remaining_seconds(), 0);
        assert!(timer.poll_expired());
        assert!(!timer.poll_expired());
    }
}

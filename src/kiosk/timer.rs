//! Deadline timers driven by the event loop's clock. Nothing here runs on its
//! own: the owner polls with the current `Instant` and reacts to what fired,
//! so a handler always sees the state as it is at fire time.

use std::time::{Duration, Instant};

/// Fires every `period`, starting one period after it was created.
#[derive(Debug, Clone)]
pub struct Interval {
    period: Duration,
    next: Instant,
}

impl Interval {
    pub fn start(period: Duration, now: Instant) -> Self {
        let period = period.max(Duration::from_millis(1));
        Interval {
            period,
            next: now + period,
        }
    }

    /// Number of periods that elapsed since the last poll. Missed periods
    /// are all counted so a stalled loop catches up in one step.
    pub fn poll(&mut self, now: Instant) -> u32 {
        if now < self.next {
            return 0;
        }
        let late = now.duration_since(self.next).as_nanos() / self.period.as_nanos();
        let fired = u32::try_from(late.saturating_add(1)).unwrap_or(u32::MAX);
        self.next += self.period.saturating_mul(fired);
        fired
    }

    pub fn deadline(&self) -> Instant {
        self.next
    }
}

/// One-shot countdown that can be restarted from the full timeout.
#[derive(Debug, Clone)]
pub struct Countdown {
    timeout: Duration,
    deadline: Instant,
}

impl Countdown {
    pub fn start(timeout: Duration, now: Instant) -> Self {
        Countdown {
            timeout,
            deadline: now + timeout,
        }
    }

    pub fn restart(&mut self, now: Instant) {
        self.deadline = now + self.timeout;
    }

    pub fn expired(&self, now: Instant) -> bool {
        now >= self.deadline
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.deadline.saturating_duration_since(now)
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }
}

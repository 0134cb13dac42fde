use crate::kiosk::timer::Countdown;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
enum State {
    Disarmed,
    Armed(Countdown),
}

/// Inactivity watchdog for the gallery. Interactions restart the countdown
/// while armed; once it expires it reports that exactly once and disarms.
#[derive(Debug, Clone)]
pub struct Watchdog {
    timeout: Duration,
    state: State,
}

impl Watchdog {
    pub fn new(timeout: Duration) -> Self {
        Watchdog {
            timeout,
            state: State::Disarmed,
        }
    }

    pub fn arm(&mut self, now: Instant) {
        self.state = State::Armed(Countdown::start(self.timeout, now));
    }

    pub fn disarm(&mut self) {
        self.state = State::Disarmed;
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.state, State::Armed(_))
    }

    /// A qualifying interaction. Does nothing while disarmed.
    pub fn touch(&mut self, now: Instant) {
        if let State::Armed(countdown) = &mut self.state {
            countdown.restart(now);
        }
    }

    /// True when the countdown ran out; the watchdog is disarmed afterwards.
    pub fn poll(&mut self, now: Instant) -> bool {
        match &self.state {
            State::Armed(countdown) if countdown.expired(now) => {
                self.state = State::Disarmed;
                true
            }
            _ => false,
        }
    }

    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        match &self.state {
            State::Armed(countdown) => Some(countdown.remaining(now)),
            State::Disarmed => None,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        match &self.state {
            State::Armed(countdown) => Some(countdown.deadline()),
            State::Disarmed => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn test_starts_disarmed() {
        let mut dog = Watchdog::new(secs(25));
        assert!(!dog.is_armed());
        assert!(!dog.poll(Instant::now() + secs(100)));
        assert_eq!(dog.remaining(Instant::now()), None);
    }

    #[test]
    fn test_fires_once_then_disarms() {
        let t0 = Instant::now();
        let mut dog = Watchdog::new(secs(25));
        dog.arm(t0);
        assert!(!dog.poll(t0 + secs(24)));
        assert!(dog.poll(t0 + secs(25)));
        assert!(!dog.is_armed());
        assert!(!dog.poll(t0 + secs(26)));
    }

    #[test]
    fn test_touch_restarts_countdown() {
        let t0 = Instant::now();
        let mut dog = Watchdog::new(secs(25));
        dog.arm(t0);
        dog.touch(t0 + secs(20));
        assert!(!dog.poll(t0 + secs(25)));
        assert_eq!(dog.remaining(t0 + secs(25)), Some(secs(20)));
        assert!(dog.poll(t0 + secs(45)));
    }

    #[test]
    fn test_touch_while_disarmed_does_not_arm() {
        let t0 = Instant::now();
        let mut dog = Watchdog::new(secs(25));
        dog.touch(t0);
        assert!(!dog.is_armed());
    }

    #[test]
    fn test_disarm_cancels_pending_expiry() {
        let t0 = Instant::now();
        let mut dog = Watchdog::new(secs(25));
        dog.arm(t0);
        dog.disarm();
        assert!(!dog.poll(t0 + secs(60)));
        assert_eq!(dog.deadline(), None);
    }
}

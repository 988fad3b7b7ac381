//! Delayed task with reset-on-reschedule.
//!
//! egui drives the app from its frame loop, so instead of a timer callback
//! the debouncer holds a deadline that the loop polls each frame.

use std::time::Duration;
use web_time::Instant;

/// Fires once after a quiet period with no further `schedule` calls.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Records an event, pushing the deadline to `now + delay`.
    ///
    /// Any earlier pending deadline is discarded.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Time left until the pending deadline, if any.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Returns `true` exactly once when the deadline has passed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(250);

    #[test]
    fn test_burst_fires_once_after_last_event() {
        let mut debouncer = Debouncer::new(DELAY);
        let start = Instant::now();
        let mut fired = 0;

        // Ten resize events 20ms apart, polled at every event.
        let mut last = start;
        for i in 0..10 {
            last = start + Duration::from_millis(i * 20);
            debouncer.schedule(last);
            if debouncer.poll(last) {
                fired += 1;
            }
        }
        assert_eq!(fired, 0);

        assert!(!debouncer.poll(last + Duration::from_millis(249)));
        assert!(debouncer.poll(last + DELAY));
        assert!(!debouncer.poll(last + Duration::from_millis(400)));
        assert_eq!(debouncer.remaining(last + Duration::from_millis(400)), None);
    }

    #[test]
    fn test_reschedule_resets_deadline() {
        let mut debouncer = Debouncer::new(DELAY);
        let start = Instant::now();

        debouncer.schedule(start);
        debouncer.schedule(start + Duration::from_millis(200));

        // The first deadline has passed but was replaced.
        assert!(!debouncer.poll(start + Duration::from_millis(300)));
        assert_eq!(
            debouncer.remaining(start + Duration::from_millis(300)),
            Some(Duration::from_millis(150))
        );
        assert!(debouncer.poll(start + Duration::from_millis(450)));
    }

    #[test]
    fn test_idle_debouncer_never_fires() {
        let mut debouncer = Debouncer::new(DELAY);
        let start = Instant::now();
        assert!(!debouncer.poll(start + Duration::from_secs(1)));
        assert_eq!(debouncer.remaining(start), None);
    }
}

//! Canvas size tracking for resize-driven renders.

use super::Debouncer;
use crate::state::Viewport;
use std::time::Duration;
use web_time::Instant;

/// What the frame loop should do after observing the canvas size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResizeAction {
    /// Start a full render at this size
    Render(Viewport),
    /// A render is pending; repaint again after this long
    Wait(Duration),
    Idle,
}

/// Turns per-frame canvas sizes into renders.
///
/// The first observation renders immediately. After that every burst of
/// size changes yields exactly one render, once the size has been stable
/// for the debounce delay, even if the burst ends at the size it began with.
#[derive(Debug, Clone)]
pub struct ResizeTracker {
    observed: Option<Viewport>,
    debouncer: Debouncer,
}

impl ResizeTracker {
    pub fn new(delay: Duration) -> Self {
        Self {
            observed: None,
            debouncer: Debouncer::new(delay),
        }
    }

    pub fn observe(&mut self, size: Viewport, now: Instant) -> ResizeAction {
        match self.observed {
            None => {
                self.observed = Some(size);
                return ResizeAction::Render(size);
            }
            Some(previous) if previous != size => {
                self.observed = Some(size);
                self.debouncer.schedule(now);
            }
            Some(_) => {}
        }

        if self.debouncer.poll(now) {
            ResizeAction::Render(size)
        } else if let Some(remaining) = self.debouncer.remaining(now) {
            ResizeAction::Wait(remaining)
        } else {
            ResizeAction::Idle
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(250);

    fn at(start: Instant, ms: u64) -> Instant {
        start + Duration::from_millis(ms)
    }

    #[test]
    fn test_first_frame_renders_immediately() {
        let mut tracker = ResizeTracker::new(DELAY);
        let size = Viewport::new(960.0, 600.0);
        assert_eq!(tracker.observe(size, Instant::now()), ResizeAction::Render(size));
    }

    #[test]
    fn test_steady_size_stays_idle() {
        let mut tracker = ResizeTracker::new(DELAY);
        let start = Instant::now();
        let size = Viewport::new(960.0, 600.0);
        tracker.observe(size, start);
        for ms in [16, 500, 5000] {
            assert_eq!(tracker.observe(size, at(start, ms)), ResizeAction::Idle);
        }
    }

    #[test]
    fn test_burst_renders_once_at_final_size() {
        let mut tracker = ResizeTracker::new(DELAY);
        let start = Instant::now();
        tracker.observe(Viewport::new(960.0, 600.0), start);

        let mut renders = Vec::new();
        for (i, width) in [1000.0, 1040.0, 1100.0].into_iter().enumerate() {
            let now = at(start, 100 + i as u64 * 30);
            let action = tracker.observe(Viewport::new(width, 600.0), now);
            if let ResizeAction::Render(size) = action {
                renders.push(size);
            }
        }
        let last_event = at(start, 160);
        let last = Viewport::new(1100.0, 600.0);

        assert_eq!(
            tracker.observe(last, at(start, 200)),
            ResizeAction::Wait(Duration::from_millis(210))
        );
        for ms in (220..1000).step_by(10) {
            if let ResizeAction::Render(size) = tracker.observe(last, at(start, ms)) {
                renders.push(size);
                assert!(at(start, ms) >= last_event + DELAY);
            }
        }
        assert_eq!(renders, vec![last]);
    }

    #[test]
    fn test_burst_back_to_original_size_still_renders() {
        let mut tracker = ResizeTracker::new(DELAY);
        let start = Instant::now();
        let original = Viewport::new(960.0, 600.0);
        tracker.observe(original, start);

        tracker.observe(Viewport::new(1200.0, 700.0), at(start, 50));
        tracker.observe(original, at(start, 80));

        let renders = (90..1000)
            .step_by(10)
            .map(|ms| tracker.observe(original, at(start, ms)))
            .filter(|action| *action == ResizeAction::Render(original))
            .count();
        assert_eq!(renders, 1);
    }
}

//! Render generation counter.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Monotonic id of the latest render cycle.
///
/// Cloned into every fetch task so work for a superseded render can be
/// recognised and dropped, including from another thread.
#[derive(Debug, Clone, Default)]
pub struct RenderGeneration {
    latest: Arc<AtomicU64>,
}

impl RenderGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new render cycle and returns its generation.
    pub fn advance(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Generation of the most recent render cycle (0 before the first).
    pub fn current(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.current() == generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_supersedes_previous() {
        let generation = RenderGeneration::new();
        assert_eq!(generation.current(), 0);

        let first = generation.advance();
        assert!(generation.is_current(first));

        let second = generation.advance();
        assert_eq!(second, first + 1);
        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));
    }

    #[test]
    fn test_clones_share_the_counter() {
        let generation = RenderGeneration::new();
        let shared = generation.clone();
        let g = generation.advance();
        assert!(shared.is_current(g));
    }
}

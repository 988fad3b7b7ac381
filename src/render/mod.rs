//! Render-cycle scheduling: resize debouncing and generation tracking.

mod debounce;
mod generation;
mod resize;

pub use debounce::Debouncer;
pub use generation::RenderGeneration;
pub use resize::{ResizeAction, ResizeTracker};

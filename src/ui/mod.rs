//! UI modules for the Hemisphere Workbench application.
//!
//! The UI is split into two regions:
//! - Top bar: Title, opacity slider, toggle and export controls, status
//! - Central canvas: The overlaid hemisphere views

mod canvas;
mod colors;
mod top_bar;

pub use canvas::render_canvas;
pub use top_bar::{render_top_bar, ControlEvent};

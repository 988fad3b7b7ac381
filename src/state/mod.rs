//! Application state management.
//!
//! The map itself is described by an immutable [`ViewState`]; every control
//! produces a new value rather than mutating shared variables. [`AppState`]
//! wraps it with the configuration and UI-only bits.

pub mod config;

pub use config::MapConfig;

use crate::geo::Rotation;
use eframe::egui::Vec2;
use geo_types::Coord;

/// Secondary hemisphere opacity, always within [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Opacity(f64);

impl Opacity {
    /// Clamps into [0, 1]; NaN becomes fully transparent.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            Self(0.0)
        } else {
            Self(value.clamp(0.0, 1.0))
        }
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl Default for Opacity {
    fn default() -> Self {
        Self(0.5)
    }
}

/// Size of the map canvas in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(960.0, 600.0)
    }
}

impl From<Vec2> for Viewport {
    fn from(size: Vec2) -> Self {
        Self::new(size.x as f64, size.y as f64)
    }
}

/// Which of the two hemisphere views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hemisphere {
    Primary,
    Secondary,
}

impl Hemisphere {
    pub fn all() -> [Hemisphere; 2] {
        [Hemisphere::Primary, Hemisphere::Secondary]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Hemisphere::Primary => "Primary",
            Hemisphere::Secondary => "Secondary",
        }
    }
}

/// Everything the rendered scene is derived from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub primary: Rotation,
    pub secondary: Rotation,
    pub opacity: Opacity,
    pub viewport: Viewport,
}

impl ViewState {
    pub fn from_config(config: &MapConfig, viewport: Viewport) -> Self {
        Self {
            primary: config.primary_rotation,
            secondary: config.secondary_rotation,
            opacity: Opacity::new(config.opacity),
            viewport,
        }
    }

    /// Swaps the primary and secondary rotations.
    pub fn toggled(self) -> Self {
        Self {
            primary: self.secondary,
            secondary: self.primary,
            ..self
        }
    }

    pub fn with_opacity(self, opacity: Opacity) -> Self {
        Self { opacity, ..self }
    }

    pub fn resized(self, viewport: Viewport) -> Self {
        Self { viewport, ..self }
    }

    pub fn rotation(&self, hemisphere: Hemisphere) -> Rotation {
        match hemisphere {
            Hemisphere::Primary => self.primary,
            Hemisphere::Secondary => self.secondary,
        }
    }
}

/// Root application state.
pub struct AppState {
    /// Configuration resolved at startup
    pub config: MapConfig,

    /// Current view; replaced on every transition
    pub view: ViewState,

    /// Geographic position under the pointer, on the primary hemisphere
    pub hover: Option<Coord<f64>>,

    /// Application status message displayed in top bar
    pub status_message: String,
}

impl AppState {
    pub fn new(config: MapConfig) -> Self {
        let view = ViewState::from_config(&config, Viewport::default());
        Self {
            config,
            view,
            hover: None,
            status_message: "Ready".to_string(),
        }
    }
}

impl AppState {
    /// Updates the status line once a render's dataset load settles.
    ///
    /// `None` means the load failed; the status returns to idle and the
    /// failure is left to the log.
    pub fn finish_load(&mut self, countries: Option<usize>) {
        self.status_message = match countries {
            Some(count) => format!("{} countries", count),
            None => "Ready".to_string(),
        };
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(MapConfig::default())
    }
}

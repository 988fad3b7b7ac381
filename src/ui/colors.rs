//! Centralized color constants for the UI.
//!
//! Map colors stand in for the stylesheet that styles the exported SVG; the
//! canvas keys them by element class.

use crate::scene::ElementClass;
use crate::state::Hemisphere;
use eframe::egui::{Color32, Stroke};

/// General UI colors for labels and values.
pub mod ui {
    use super::Color32;

    /// Muted gray for labels.
    pub const LABEL: Color32 = Color32::from_rgb(100, 100, 100);
    /// Slightly brighter for values.
    pub const VALUE: Color32 = Color32::from_rgb(160, 160, 160);
}

/// Colors for the map canvas.
pub mod canvas {
    use super::Color32;

    /// Background behind both hemispheres.
    pub const BACKGROUND: Color32 = Color32::from_rgb(20, 20, 35);
    /// Default label text.
    pub const LABEL: Color32 = Color32::from_rgb(220, 220, 240);
    /// Hover read-out text.
    pub const READOUT: Color32 = Color32::from_rgb(200, 200, 220);
}

/// Colors for one hemisphere layer.
pub mod primary {
    use super::Color32;

    pub const OCEAN: Color32 = Color32::from_rgb(24, 46, 72);
    pub const COUNTRY_FILL: Color32 = Color32::from_rgb(86, 112, 82);
    pub const COUNTRY_STROKE: Color32 = Color32::from_rgb(40, 56, 40);
    pub const GRATICULE: Color32 = Color32::from_rgb(70, 90, 120);
    pub const SPHERE: Color32 = Color32::from_rgb(150, 170, 200);
}

/// Colors for the other hemisphere layer.
pub mod secondary {
    use super::Color32;

    pub const OCEAN: Color32 = Color32::from_rgb(16, 30, 48);
    pub const COUNTRY_FILL: Color32 = Color32::from_rgb(120, 96, 70);
    pub const COUNTRY_STROKE: Color32 = Color32::from_rgb(60, 44, 30);
    pub const GRATICULE: Color32 = Color32::from_rgb(90, 80, 110);
    pub const SPHERE: Color32 = Color32::from_rgb(200, 170, 150);
}

/// Fill and stroke for a scene element, before group opacity.
pub fn element_style(class: ElementClass, hemisphere: Hemisphere) -> (Option<Color32>, Stroke) {
    use Hemisphere::*;

    match (class, hemisphere) {
        (ElementClass::Ocean, Primary) => (Some(primary::OCEAN), Stroke::NONE),
        (ElementClass::Ocean, Secondary) => (Some(secondary::OCEAN), Stroke::NONE),
        (ElementClass::Country, Primary) => (
            Some(primary::COUNTRY_FILL),
            Stroke::new(0.5, primary::COUNTRY_STROKE),
        ),
        (ElementClass::Country, Secondary) => (
            Some(secondary::COUNTRY_FILL),
            Stroke::new(0.5, secondary::COUNTRY_STROKE),
        ),
        (ElementClass::Graticule, Primary) => (None, Stroke::new(0.5, primary::GRATICULE)),
        (ElementClass::Graticule, Secondary) => (None, Stroke::new(0.5, secondary::GRATICULE)),
        (ElementClass::Sphere, Primary) => (None, Stroke::new(1.5, primary::SPHERE)),
        (ElementClass::Sphere, Secondary) => (None, Stroke::new(1.5, secondary::SPHERE)),
        (ElementClass::Label, _) => (Some(canvas::LABEL), Stroke::NONE),
    }
}

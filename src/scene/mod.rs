//! Retained scene model for the two hemisphere layers.
//!
//! A [`Scene`] is a pure function of the view state and the dataset: it is
//! rebuilt from scratch on every render, so rendering twice with the same
//! inputs yields an identical scene. The canvas paints it each frame and
//! [`Scene::to_svg`] serializes it with the stylesheet class names.

mod svg;

use crate::geo::{
    FillMesh, GnomonicProjection, Graticule, PathGenerator, ProjectedPath, WorldDataset,
};
use crate::state::{Hemisphere, MapConfig, Opacity, ViewState};
use glam::DVec2;

/// Inline fill of the secondary hemisphere's label.
pub const SECONDARY_LABEL_FILL: [u8; 3] = [0x1c, 0x56, 0x7a];

/// Label font size in pixels.
pub const LABEL_FONT_SIZE: f32 = 14.0;

/// Styling class of a scene element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementClass {
    Ocean,
    Country,
    Graticule,
    Sphere,
    Label,
}

impl ElementClass {
    /// Class name used by external stylesheets.
    pub fn class_name(self, hemisphere: Hemisphere) -> &'static str {
        match (self, hemisphere) {
            (ElementClass::Ocean, Hemisphere::Primary) => "ocean-primary",
            (ElementClass::Ocean, Hemisphere::Secondary) => "ocean-secondary",
            (ElementClass::Country, Hemisphere::Primary) => "country-primary",
            (ElementClass::Country, Hemisphere::Secondary) => "country-secondary",
            (ElementClass::Graticule, Hemisphere::Primary) => "graticule-primary",
            (ElementClass::Graticule, Hemisphere::Secondary) => "graticule-secondary",
            (ElementClass::Sphere, Hemisphere::Primary) => "sphere-primary",
            (ElementClass::Sphere, Hemisphere::Secondary) => "sphere-secondary",
            (ElementClass::Label, _) => "hemisphere-label",
        }
    }
}

/// Drawable content of an element.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// Rectangle anchored at the origin
    Rect { width: f64, height: f64 },
    /// Projected geometry, optionally with a precomputed fill
    Path {
        path: ProjectedPath,
        fill: Option<FillMesh>,
    },
    /// Text with its baseline starting at `position`
    Text {
        position: DVec2,
        text: String,
        font_size: f32,
        bold: bool,
        fill: Option<[u8; 3]>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub class: ElementClass,
    pub primitive: Primitive,
}

/// One hemisphere's layer, drawn back to front.
#[derive(Debug, Clone, PartialEq)]
pub struct HemisphereGroup {
    pub hemisphere: Hemisphere,
    /// Group opacity; `None` leaves the layer fully opaque.
    pub opacity: Option<Opacity>,
    pub elements: Vec<Element>,
}

impl HemisphereGroup {
    fn new(hemisphere: Hemisphere, opacity: Option<Opacity>) -> Self {
        Self {
            hemisphere,
            opacity,
            elements: Vec::new(),
        }
    }

    /// Element id used by external stylesheets.
    pub fn id(&self) -> &'static str {
        match self.hemisphere {
            Hemisphere::Primary => "primary-hemisphere",
            Hemisphere::Secondary => "secondary-hemisphere",
        }
    }

    /// Effective opacity multiplier for painting.
    pub fn alpha(&self) -> f32 {
        self.opacity.map_or(1.0, |o| o.get() as f32)
    }
}

/// Everything visible on the map canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub primary: HemisphereGroup,
    pub secondary: HemisphereGroup,
}

impl Scene {
    /// A cleared scene: both groups present, nothing drawn yet.
    pub fn empty(view: &ViewState) -> Self {
        Self {
            width: view.viewport.width,
            height: view.viewport.height,
            primary: HemisphereGroup::new(Hemisphere::Primary, None),
            secondary: HemisphereGroup::new(Hemisphere::Secondary, Some(view.opacity)),
        }
    }

    /// Groups in paint order; the secondary layer sits on top.
    pub fn groups(&self) -> [&HemisphereGroup; 2] {
        [&self.primary, &self.secondary]
    }

    /// Changes only the secondary layer's opacity.
    pub fn set_secondary_opacity(&mut self, opacity: Opacity) {
        self.secondary.opacity = Some(opacity);
    }
}

/// Projection for one hemisphere of the view.
///
/// Both share scale and translate; the secondary one is mirrored so the two
/// read as opposite faces of the same globe.
pub fn hemisphere_projection(
    hemisphere: Hemisphere,
    view: &ViewState,
    config: &MapConfig,
) -> GnomonicProjection {
    let viewport = view.viewport;
    GnomonicProjection::new(view.rotation(hemisphere))
        .with_scale(viewport.width / config.scale_divisor)
        .with_translate(DVec2::new(viewport.width / 2.0, viewport.height / 2.0))
        .with_clip_angle(config.clip_angle)
        .with_reflect_x(hemisphere == Hemisphere::Secondary)
}

/// Builds the scene for a view.
///
/// Without a dataset the drawing phase is skipped and the groups stay
/// empty, which is also what a failed fetch leaves on screen.
pub fn build_scene(view: &ViewState, config: &MapConfig, dataset: Option<&WorldDataset>) -> Scene {
    let mut scene = Scene::empty(view);
    let Some(dataset) = dataset else {
        return scene;
    };

    let graticule = Graticule::default().multi_line_string();
    for hemisphere in Hemisphere::all() {
        let projection = hemisphere_projection(hemisphere, view, config);
        let generator = PathGenerator::new(&projection);
        let group = match hemisphere {
            Hemisphere::Primary => &mut scene.primary,
            Hemisphere::Secondary => &mut scene.secondary,
        };

        group.elements.push(Element {
            class: ElementClass::Ocean,
            primitive: Primitive::Rect {
                width: view.viewport.width,
                height: view.viewport.height,
            },
        });

        for country in &dataset.countries {
            let path = generator.feature(country);
            let fill = (!path.is_empty()).then(|| path.fill_mesh());
            group.elements.push(Element {
                class: ElementClass::Country,
                primitive: Primitive::Path { path, fill },
            });
        }

        group.elements.push(Element {
            class: ElementClass::Graticule,
            primitive: Primitive::Path {
                path: generator.multi_line_string(&graticule),
                fill: None,
            },
        });

        group.elements.push(Element {
            class: ElementClass::Sphere,
            primitive: Primitive::Path {
                path: generator.sphere(),
                fill: None,
            },
        });

        group.elements.push(label(hemisphere, view));
    }

    scene
}

fn label(hemisphere: Hemisphere, view: &ViewState) -> Element {
    let rotation = view.rotation(hemisphere);
    let (position, fill) = match hemisphere {
        Hemisphere::Primary => (DVec2::new(20.0, 30.0), None),
        Hemisphere::Secondary => (
            DVec2::new(view.viewport.width - 260.0, 30.0),
            Some(SECONDARY_LABEL_FILL),
        ),
    };

    Element {
        class: ElementClass::Label,
        primitive: Primitive::Text {
            position,
            text: format!("{}: {}", hemisphere.label(), rotation),
            font_size: LABEL_FONT_SIZE,
            bold: true,
            fill,
        },
    }
}

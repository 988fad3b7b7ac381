//! Gnomonic map projection and coordinate transformation.
//!
//! Handles converting between geographic coordinates (lon/lat) and
//! screen coordinates for one hemisphere view. Points are first rotated so
//! the view centre sits at (0, 0), then projected from the globe's centre
//! onto the tangent plane.

use super::Rotation;
use geo_types::Coord;
use glam::{DVec2, DVec3};

/// Clip angle just under 90° so the horizon never projects to infinity.
pub const DEFAULT_CLIP_ANGLE: f64 = 90.0 - 1e-4;

/// Gnomonic projection for converting geographic to screen coordinates.
///
/// Configured in the d3 style: `rotate`, `scale`, `translate`,
/// `clip_angle` and `reflect_x`.
#[derive(Debug, Clone, PartialEq)]
pub struct GnomonicProjection {
    rotation: Rotation,
    scale: f64,
    translate: DVec2,
    clip_angle: f64,
    reflect_x: bool,
    delta_lambda: f64,
    cos_delta_phi: f64,
    sin_delta_phi: f64,
    cos_clip: f64,
}

impl Default for GnomonicProjection {
    fn default() -> Self {
        Self::new(Rotation::new(0.0, 0.0))
    }
}

impl GnomonicProjection {
    /// Creates a projection with d3's default scale and translate.
    pub fn new(rotation: Rotation) -> Self {
        let mut projection = Self {
            rotation,
            scale: 150.0,
            translate: DVec2::new(480.0, 250.0),
            clip_angle: DEFAULT_CLIP_ANGLE,
            reflect_x: false,
            delta_lambda: 0.0,
            cos_delta_phi: 1.0,
            sin_delta_phi: 0.0,
            cos_clip: 0.0,
        };
        projection.recompute();
        projection
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_translate(mut self, translate: DVec2) -> Self {
        self.translate = translate;
        self
    }

    /// Sets the clip angle in degrees, measured from the view centre.
    pub fn with_clip_angle(mut self, clip_angle: f64) -> Self {
        self.clip_angle = clip_angle;
        self.recompute();
        self
    }

    /// Mirrors the projected output horizontally about the translate point.
    pub fn with_reflect_x(mut self, reflect_x: bool) -> Self {
        self.reflect_x = reflect_x;
        self
    }

    /// Cosine of the clip angle; rotated points with `x` above this are visible.
    pub fn cos_clip(&self) -> f64 {
        self.cos_clip
    }

    fn recompute(&mut self) {
        let (delta_lambda, delta_phi) = self.rotation.to_radians();
        self.delta_lambda = delta_lambda;
        self.cos_delta_phi = delta_phi.cos();
        self.sin_delta_phi = delta_phi.sin();
        self.cos_clip = self.clip_angle.to_radians().cos();
    }

    /// Rotates a geographic coordinate into the view frame.
    ///
    /// Returns a unit vector where `x` points at the view centre, `y` east
    /// and `z` north.
    pub fn rotate(&self, coord: Coord<f64>) -> DVec3 {
        let lambda = coord.x.to_radians() + self.delta_lambda;
        let phi = coord.y.to_radians();
        let cos_phi = phi.cos();
        let x = lambda.cos() * cos_phi;
        let y = lambda.sin() * cos_phi;
        let z = phi.sin();

        DVec3::new(
            x * self.cos_delta_phi - z * self.sin_delta_phi,
            y,
            z * self.cos_delta_phi + x * self.sin_delta_phi,
        )
    }

    /// Inverse of [`rotate`](Self::rotate).
    pub fn unrotate(&self, v: DVec3) -> Coord<f64> {
        let x = v.x * self.cos_delta_phi + v.z * self.sin_delta_phi;
        let z = v.z * self.cos_delta_phi - v.x * self.sin_delta_phi;
        let lambda = v.y.atan2(x) - self.delta_lambda;
        let phi = z.clamp(-1.0, 1.0).asin();

        Coord {
            x: wrap_degrees(lambda.to_degrees()),
            y: phi.to_degrees(),
        }
    }

    /// Whether a rotated unit vector lies inside the clip circle.
    pub fn is_visible_vector(&self, v: DVec3) -> bool {
        v.x > self.cos_clip
    }

    /// Projects a rotated unit vector to the screen.
    ///
    /// Callers must only pass vectors in the visible hemisphere.
    pub fn project_vector(&self, v: DVec3) -> DVec2 {
        let x = v.y / v.x;
        let y = v.z / v.x;
        let sx = if self.reflect_x { -1.0 } else { 1.0 };
        DVec2::new(
            self.translate.x + self.scale * x * sx,
            self.translate.y - self.scale * y,
        )
    }

    /// Converts a screen position back to geographic coordinates.
    ///
    /// Returns `None` outside the clip circle.
    pub fn invert(&self, point: DVec2) -> Option<Coord<f64>> {
        let sx = if self.reflect_x { -1.0 } else { 1.0 };
        let x = (point.x - self.translate.x) / (self.scale * sx);
        let y = -(point.y - self.translate.y) / self.scale;
        let v = DVec3::new(1.0, x, y).normalize();
        self.is_visible_vector(v).then(|| self.unrotate(v))
    }

    /// Point on the clip circle at angle `t` (radians) in the view frame.
    ///
    /// `t` runs counter-clockwise from east.
    pub fn clip_circle_point(&self, t: f64) -> DVec3 {
        let radius = self.clip_angle.to_radians();
        let (sin_r, cos_r) = radius.sin_cos();
        DVec3::new(cos_r, sin_r * t.cos(), sin_r * t.sin())
    }
}

#[cfg(test)]
impl GnomonicProjection {
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn translate(&self) -> DVec2 {
        self.translate
    }

    pub fn reflect_x(&self) -> bool {
        self.reflect_x
    }

    pub fn is_visible(&self, coord: Coord<f64>) -> bool {
        self.is_visible_vector(self.rotate(coord))
    }

    pub fn project(&self, coord: Coord<f64>) -> Option<DVec2> {
        let v = self.rotate(coord);
        self.is_visible_vector(v).then(|| self.project_vector(v))
    }

    /// Screen radius of the clip circle.
    pub fn clip_radius(&self) -> f64 {
        self.scale * self.clip_angle.to_radians().tan()
    }
}

/// Wraps a longitude into [-180, 180].
fn wrap_degrees(lon: f64) -> f64 {
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 && lon > 0.0 {
        180.0
    } else {
        wrapped
    }
}

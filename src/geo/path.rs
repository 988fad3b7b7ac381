//! Path generation: geographic features to projected screen geometry.
//!
//! Every edge of a feature is treated as a great-circle arc. Gnomonic
//! projection maps great circles to straight lines, so projected edges are
//! exact without resampling; only clipping at the horizon is needed.

use super::clip::{clip_circle, clip_line, clip_ring};
use super::{GeoFeature, GnomonicProjection};
use geo_types::{Coord, MultiLineString};
use glam::DVec2;
use std::fmt::Write;

/// A projected polygon: exterior ring plus holes, all implicitly closed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProjectedPolygon {
    pub exterior: Vec<DVec2>,
    pub holes: Vec<Vec<DVec2>>,
}

/// Screen-space geometry for one feature.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProjectedPath {
    /// Open polylines
    pub lines: Vec<Vec<DVec2>>,
    /// Closed polygons
    pub polygons: Vec<ProjectedPolygon>,
}

/// Triangulated fill of a projected path.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FillMesh {
    pub vertices: Vec<DVec2>,
    pub indices: Vec<u32>,
}

impl ProjectedPath {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.polygons.is_empty()
    }

    /// Renders the geometry as SVG path data (`M`/`L`, rings closed with `Z`).
    pub fn to_svg_data(&self) -> String {
        let mut d = String::new();
        for line in &self.lines {
            push_svg_run(&mut d, line, false);
        }
        for polygon in &self.polygons {
            push_svg_run(&mut d, &polygon.exterior, true);
            for hole in &polygon.holes {
                push_svg_run(&mut d, hole, true);
            }
        }
        d
    }

    /// Triangulates the polygons for filling.
    ///
    /// Polygons that fail to triangulate are left unfilled.
    pub fn fill_mesh(&self) -> FillMesh {
        let mut mesh = FillMesh::default();

        for polygon in &self.polygons {
            let mut flat: Vec<f64> = Vec::new();
            let mut hole_indices: Vec<usize> = Vec::new();
            let mut points: Vec<DVec2> = Vec::new();

            for p in &polygon.exterior {
                flat.extend([p.x, p.y]);
                points.push(*p);
            }
            for hole in &polygon.holes {
                hole_indices.push(points.len());
                for p in hole {
                    flat.extend([p.x, p.y]);
                    points.push(*p);
                }
            }

            let triangles = match earcutr::earcut(&flat, &hole_indices, 2) {
                Ok(ix) => ix,
                Err(_) => continue,
            };

            let base = mesh.vertices.len() as u32;
            mesh.vertices.extend(points);
            mesh.indices.extend(triangles.into_iter().map(|i| base + i as u32));
        }

        mesh
    }
}

fn push_svg_run(d: &mut String, points: &[DVec2], closed: bool) {
    for (i, p) in points.iter().enumerate() {
        let command = if i == 0 { 'M' } else { 'L' };
        let _ = write!(d, "{}{},{}", command, svg_number(p.x), svg_number(p.y));
    }
    if closed && !points.is_empty() {
        d.push('Z');
    }
}

/// Formats a coordinate with at most two decimals and no trailing zeros.
fn svg_number(value: f64) -> String {
    let s = format!("{:.2}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// Projects features through a [`GnomonicProjection`], clipping at the
/// horizon.
pub struct PathGenerator<'a> {
    projection: &'a GnomonicProjection,
}

impl<'a> PathGenerator<'a> {
    pub fn new(projection: &'a GnomonicProjection) -> Self {
        Self { projection }
    }

    pub fn feature(&self, feature: &GeoFeature) -> ProjectedPath {
        let mut path = ProjectedPath::default();
        match feature {
            GeoFeature::LineString(coords) => self.push_line(&mut path, coords),
            GeoFeature::MultiLineString(lines) => {
                for coords in lines {
                    self.push_line(&mut path, coords);
                }
            }
            GeoFeature::Polygon { exterior, holes, .. } => {
                self.push_polygon(&mut path, exterior, holes)
            }
            GeoFeature::MultiPolygon { polygons, .. } => {
                for (exterior, holes) in polygons {
                    self.push_polygon(&mut path, exterior, holes);
                }
            }
        }
        path
    }

    pub fn multi_line_string(&self, lines: &MultiLineString<f64>) -> ProjectedPath {
        let mut path = ProjectedPath::default();
        for line in lines {
            self.push_line(&mut path, &line.0);
        }
        path
    }

    /// Outline of the visible globe: the clip circle itself.
    pub fn sphere(&self) -> ProjectedPath {
        let exterior = clip_circle(self.projection)
            .into_iter()
            .map(|v| self.projection.project_vector(v))
            .collect();
        ProjectedPath {
            lines: Vec::new(),
            polygons: vec![ProjectedPolygon {
                exterior,
                holes: Vec::new(),
            }],
        }
    }

    fn push_line(&self, path: &mut ProjectedPath, coords: &[Coord<f64>]) {
        let rotated: Vec<_> = coords.iter().map(|c| self.projection.rotate(*c)).collect();
        for run in clip_line(&rotated, self.projection) {
            path.lines.push(
                run.into_iter()
                    .map(|v| self.projection.project_vector(v))
                    .collect(),
            );
        }
    }

    fn push_polygon(
        &self,
        path: &mut ProjectedPath,
        exterior: &[Coord<f64>],
        holes: &[Vec<Coord<f64>>],
    ) {
        let exterior = self.ring(exterior);
        if exterior.is_empty() {
            return;
        }
        let holes = holes
            .iter()
            .map(|hole| self.ring(hole))
            .filter(|hole| !hole.is_empty())
            .collect();
        path.polygons.push(ProjectedPolygon { exterior, holes });
    }

    fn ring(&self, coords: &[Coord<f64>]) -> Vec<DVec2> {
        let rotated: Vec<_> = coords.iter().map(|c| self.projection.rotate(*c)).collect();
        clip_ring(&rotated, self.projection)
            .into_iter()
            .map(|v| self.projection.project_vector(v))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{Graticule, Rotation};

    fn projection() -> GnomonicProjection {
        GnomonicProjection::new(Rotation::new(0.0, 0.0))
            .with_scale(100.0)
            .with_translate(DVec2::new(500.0, 300.0))
    }

    fn square(lon: f64, lat: f64, size: f64) -> GeoFeature {
        GeoFeature::Polygon {
            exterior: vec![
                Coord { x: lon, y: lat },
                Coord { x: lon + size, y: lat },
                Coord { x: lon + size, y: lat + size },
                Coord { x: lon, y: lat + size },
                Coord { x: lon, y: lat },
            ],
            holes: Vec::new(),
            label: None,
        }
    }

    #[test]
    fn test_visible_polygon_projects_every_vertex() {
        let p = projection();
        let path = PathGenerator::new(&p).feature(&square(-5.0, -5.0, 10.0));
        assert_eq!(path.polygons.len(), 1);
        assert_eq!(path.polygons[0].exterior.len(), 4);
        assert!(path.lines.is_empty());
    }

    #[test]
    fn test_far_side_polygon_is_empty() {
        let p = projection();
        let path = PathGenerator::new(&p).feature(&square(150.0, 0.0, 10.0));
        assert!(path.is_empty());
    }

    #[test]
    fn test_svg_data_format() {
        let path = ProjectedPath {
            lines: vec![vec![DVec2::new(1.0, 2.5), DVec2::new(3.127, -0.001)]],
            polygons: vec![ProjectedPolygon {
                exterior: vec![DVec2::new(0.0, 0.0), DVec2::new(1.0, 0.0), DVec2::new(0.0, 1.0)],
                holes: Vec::new(),
            }],
        };
        assert_eq!(path.to_svg_data(), "M1,2.5L3.13,0M0,0L1,0L0,1Z");
    }

    #[test]
    fn test_sphere_is_circle_of_clip_radius() {
        let p = projection().with_clip_angle(60.0);
        let path = PathGenerator::new(&p).sphere();
        let ring = &path.polygons[0].exterior;
        assert_eq!(ring.len(), 60);
        for point in ring {
            let r = (*point - p.translate()).length();
            assert!((r - p.clip_radius()).abs() < 1e-6);
        }
    }

    #[test]
    fn test_graticule_keeps_only_visible_runs() {
        let p = projection();
        let graticule = Graticule::default().multi_line_string();
        let path = PathGenerator::new(&p).multi_line_string(&graticule);
        assert!(!path.lines.is_empty());
        assert!(path.polygons.is_empty());
        assert!(path.lines.iter().all(|line| line.len() >= 2));
    }

    #[test]
    fn test_fill_mesh_triangulates_square() {
        let p = projection();
        let path = PathGenerator::new(&p).feature(&square(-5.0, -5.0, 10.0));
        let mesh = path.fill_mesh();
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices.len(), 6);
    }
}

//! Geographic feature data structures and dataset loading.

use super::topology::Topology;
use crate::data::DatasetError;
use geo_types::Coord;
use geojson::{Feature, GeoJson, Geometry, Value};

/// A polygon as an exterior ring plus holes.
pub type PolygonRings = (Vec<Coord<f64>>, Vec<Vec<Coord<f64>>>);

/// A geographic feature that can be rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum GeoFeature {
    /// A series of connected line segments
    LineString(Vec<Coord<f64>>),
    /// Multiple line strings (the graticule is one of these)
    MultiLineString(Vec<Vec<Coord<f64>>>),
    /// A closed polygon with optional label
    Polygon {
        exterior: Vec<Coord<f64>>,
        holes: Vec<Vec<Coord<f64>>>,
        label: Option<String>,
    },
    /// Multiple polygons with optional label
    MultiPolygon {
        polygons: Vec<PolygonRings>,
        label: Option<String>,
    },
}

/// Country boundaries for the whole globe.
///
/// Immutable once decoded; every render reads it without modification.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorldDataset {
    pub countries: Vec<GeoFeature>,
}

impl WorldDataset {
    /// Decodes a boundaries document.
    ///
    /// Accepts a TopoJSON topology (reading the named object) or any GeoJSON
    /// document.
    pub fn from_json(text: &str, object_name: &str) -> Result<Self, DatasetError> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|e| DatasetError::Parse(e.to_string()))?;

        let is_topology = value.get("type").and_then(|t| t.as_str()) == Some("Topology");
        let countries = if is_topology {
            let topology: Topology =
                serde_json::from_value(value).map_err(|e| DatasetError::Parse(e.to_string()))?;
            topology.features(object_name)?
        } else {
            let geojson =
                GeoJson::from_json_value(value).map_err(|e| DatasetError::Parse(e.to_string()))?;
            features_from_geojson(geojson)
        };

        Ok(Self { countries })
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}

/// Converts a parsed GeoJSON document to features.
fn features_from_geojson(geojson: GeoJson) -> Vec<GeoFeature> {
    match geojson {
        GeoJson::FeatureCollection(fc) => fc.features.iter().filter_map(convert_feature).collect(),
        GeoJson::Feature(f) => convert_feature(&f).into_iter().collect(),
        GeoJson::Geometry(g) => convert_geometry(&g, None).into_iter().collect(),
    }
}

fn convert_feature(feature: &Feature) -> Option<GeoFeature> {
    let label = feature
        .properties
        .as_ref()
        .and_then(|p| p.get("name").or_else(|| p.get("NAME")))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());

    feature
        .geometry
        .as_ref()
        .and_then(|g| convert_geometry(g, label))
}

fn convert_geometry(geometry: &Geometry, label: Option<String>) -> Option<GeoFeature> {
    match &geometry.value {
        Value::LineString(coords) => Some(GeoFeature::LineString(to_coords(coords))),
        Value::MultiLineString(lines) => Some(GeoFeature::MultiLineString(
            lines.iter().map(|line| to_coords(line)).collect(),
        )),
        Value::Polygon(rings) => {
            let (exterior, holes) = to_polygon(rings)?;
            Some(GeoFeature::Polygon {
                exterior,
                holes,
                label,
            })
        }
        Value::MultiPolygon(polygons) => {
            let polygons: Vec<PolygonRings> =
                polygons.iter().filter_map(|rings| to_polygon(rings)).collect();
            Some(GeoFeature::MultiPolygon { polygons, label })
        }
        Value::GeometryCollection(geometries) => {
            // Only the first convertible geometry is kept
            geometries
                .iter()
                .find_map(|g| convert_geometry(g, label.clone()))
        }
        Value::Point(_) | Value::MultiPoint(_) => None,
    }
}

fn to_coords(positions: &[Vec<f64>]) -> Vec<Coord<f64>> {
    positions
        .iter()
        .filter(|p| p.len() >= 2)
        .map(|p| Coord { x: p[0], y: p[1] })
        .collect()
}

fn to_polygon(rings: &[Vec<Vec<f64>>]) -> Option<PolygonRings> {
    let (exterior, holes) = rings.split_first()?;
    Some((
        to_coords(exterior),
        holes.iter().map(|ring| to_coords(ring)).collect(),
    ))
}

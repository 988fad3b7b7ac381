//! TopoJSON topology decoding.
//!
//! World boundary files ship as topologies: shared arcs stored once,
//! quantized and delta-encoded, referenced by index from each geometry.
//! Decoding turns the named object into plain polygon features.

use super::layer::{GeoFeature, PolygonRings};
use crate::data::DatasetError;
use geo_types::Coord;
use serde::Deserialize;
use std::collections::HashMap;

/// Quantization transform applied to delta-decoded arc positions.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Transform {
    pub scale: [f64; 2],
    pub translate: [f64; 2],
}

/// A geometry object inside a topology.
#[derive(Debug, Clone, Deserialize)]
pub struct TopoGeometry {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub arcs: serde_json::Value,
    #[serde(default)]
    pub geometries: Vec<TopoGeometry>,
    #[serde(default)]
    pub properties: Option<serde_json::Map<String, serde_json::Value>>,
}

/// A parsed TopoJSON document.
#[derive(Debug, Clone, Deserialize)]
pub struct Topology {
    #[serde(default)]
    pub transform: Option<Transform>,
    pub objects: HashMap<String, TopoGeometry>,
    pub arcs: Vec<Vec<Vec<f64>>>,
}

impl Topology {
    /// Converts the named object into features.
    pub fn features(&self, object_name: &str) -> Result<Vec<GeoFeature>, DatasetError> {
        let object = self
            .objects
            .get(object_name)
            .ok_or_else(|| DatasetError::MissingObject(object_name.to_string()))?;

        let arcs = self.decode_arcs();
        let mut features = Vec::new();
        collect_features(object, &arcs, &mut features)?;
        Ok(features)
    }

    /// Expands every arc to absolute coordinates.
    fn decode_arcs(&self) -> Vec<Vec<Coord<f64>>> {
        self.arcs
            .iter()
            .map(|arc| match self.transform {
                Some(transform) => {
                    let (mut x, mut y) = (0.0, 0.0);
                    arc.iter()
                        .filter(|p| p.len() >= 2)
                        .map(|p| {
                            x += p[0];
                            y += p[1];
                            Coord {
                                x: x * transform.scale[0] + transform.translate[0],
                                y: y * transform.scale[1] + transform.translate[1],
                            }
                        })
                        .collect()
                }
                None => arc
                    .iter()
                    .filter(|p| p.len() >= 2)
                    .map(|p| Coord { x: p[0], y: p[1] })
                    .collect(),
            })
            .collect()
    }
}

fn collect_features(
    geometry: &TopoGeometry,
    arcs: &[Vec<Coord<f64>>],
    out: &mut Vec<GeoFeature>,
) -> Result<(), DatasetError> {
    let label = geometry
        .properties
        .as_ref()
        .and_then(|p| p.get("name"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());

    match geometry.kind.as_deref() {
        Some("GeometryCollection") => {
            for child in &geometry.geometries {
                collect_features(child, arcs, out)?;
            }
        }
        Some("Polygon") => {
            let rings: Vec<Vec<i64>> = arc_indices(&geometry.arcs)?;
            if let Some((exterior, holes)) = polygon(&rings, arcs)? {
                out.push(GeoFeature::Polygon {
                    exterior,
                    holes,
                    label,
                });
            }
        }
        Some("MultiPolygon") => {
            let polygons: Vec<Vec<Vec<i64>>> = arc_indices(&geometry.arcs)?;
            let mut decoded = Vec::with_capacity(polygons.len());
            for rings in &polygons {
                if let Some(p) = polygon(rings, arcs)? {
                    decoded.push(p);
                }
            }
            if !decoded.is_empty() {
                out.push(GeoFeature::MultiPolygon {
                    polygons: decoded,
                    label,
                });
            }
        }
        Some("LineString") => {
            let line: Vec<i64> = arc_indices(&geometry.arcs)?;
            out.push(GeoFeature::LineString(stitch(&line, arcs)?));
        }
        Some("MultiLineString") => {
            let lines: Vec<Vec<i64>> = arc_indices(&geometry.arcs)?;
            let lines = lines
                .iter()
                .map(|line| stitch(line, arcs))
                .collect::<Result<Vec<_>, _>>()?;
            out.push(GeoFeature::MultiLineString(lines));
        }
        // Points and null geometries carry no boundary.
        _ => {}
    }

    Ok(())
}

fn arc_indices<T>(value: &serde_json::Value) -> Result<T, DatasetError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_value(value.clone()).map_err(|e| DatasetError::Parse(e.to_string()))
}

/// Rings with fewer than four points cannot enclose anything.
const MIN_RING_POINTS: usize = 4;

/// Decodes a polygon's rings. The first ring is always the exterior; if it
/// is degenerate the whole polygon is dropped rather than promoting a hole.
fn polygon(
    rings: &[Vec<i64>],
    arcs: &[Vec<Coord<f64>>],
) -> Result<Option<PolygonRings>, DatasetError> {
    let Some((first, rest)) = rings.split_first() else {
        return Ok(None);
    };

    let exterior = stitch(first, arcs)?;
    if exterior.len() < MIN_RING_POINTS {
        return Ok(None);
    }

    let mut holes = Vec::with_capacity(rest.len());
    for ring in rest {
        let coords = stitch(ring, arcs)?;
        if coords.len() >= MIN_RING_POINTS {
            holes.push(coords);
        }
    }
    Ok(Some((exterior, holes)))
}

/// Joins arcs end to end; a negative index `i` means arc `!i` reversed.
///
/// Consecutive arcs share their joint, so the first point of every arc
/// after the first is dropped.
fn stitch(
    indices: &[i64],
    arcs: &[Vec<Coord<f64>>],
) -> Result<Vec<Coord<f64>>, DatasetError> {
    let mut coords: Vec<Coord<f64>> = Vec::new();

    for &index in indices {
        let (arc_index, reversed) = if index < 0 {
            (!index as usize, true)
        } else {
            (index as usize, false)
        };
        let arc = arcs
            .get(arc_index)
            .ok_or_else(|| DatasetError::Parse(format!("arc index {} out of range", index)))?;

        let skip = usize::from(!coords.is_empty());
        if reversed {
            coords.extend(arc.iter().rev().skip(skip));
        } else {
            coords.extend(arc.iter().skip(skip));
        }
    }

    Ok(coords)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::WorldDataset;

    // Two unit squares sharing their middle edge (arc 1), quantized with a
    // scale of 0.5 and delta-encoded.
    const TOPOLOGY: &str = r#"{
        "type": "Topology",
        "transform": { "scale": [0.5, 0.5], "translate": [100, -10] },
        "objects": {
            "countries": {
                "type": "GeometryCollection",
                "geometries": [
                    { "type": "Polygon", "arcs": [[0, 1]], "properties": { "name": "West" } },
                    {
                        "type": "MultiPolygon",
                        "arcs": [[[2, -2]]],
                        "properties": { "name": "East" }
                    },
                    { "type": null }
                ]
            }
        },
        "arcs": [
            [[2, 0], [-2, 0], [0, 2], [2, 0]],
            [[2, 2], [0, -2]],
            [[2, 2], [2, 0], [0, -2], [-2, 0]]
        ]
    }"#;

    #[test]
    fn test_decodes_quantized_arcs() {
        let topology: Topology = serde_json::from_str(TOPOLOGY).unwrap();
        let arcs = topology.decode_arcs();
        assert_eq!(arcs[0][0], Coord { x: 101.0, y: -10.0 });
        assert_eq!(arcs[0][1], Coord { x: 100.0, y: -10.0 });
        assert_eq!(
            arcs[1],
            vec![Coord { x: 101.0, y: -9.0 }, Coord { x: 101.0, y: -10.0 }]
        );
    }

    #[test]
    fn test_stitches_shared_arcs_into_closed_rings() {
        let dataset = WorldDataset::from_json(TOPOLOGY, "countries").unwrap();
        assert_eq!(dataset.len(), 2);

        match &dataset.countries[0] {
            GeoFeature::Polygon { exterior, label, .. } => {
                assert_eq!(label.as_deref(), Some("West"));
                assert_eq!(exterior.len(), 5);
                assert_eq!(exterior.first(), exterior.last());
            }
            other => panic!("expected polygon, got {:?}", other),
        }

        match &dataset.countries[1] {
            GeoFeature::MultiPolygon { polygons, label } => {
                assert_eq!(label.as_deref(), Some("East"));
                let (exterior, holes) = &polygons[0];
                assert!(holes.is_empty());
                assert_eq!(exterior.len(), 5);
                assert_eq!(exterior.first(), exterior.last());
                // The reversed shared edge runs south to north.
                assert_eq!(exterior[3], Coord { x: 101.0, y: -10.0 });
                assert_eq!(exterior[4], Coord { x: 101.0, y: -9.0 });
            }
            other => panic!("expected multipolygon, got {:?}", other),
        }
    }

    #[test]
    fn test_degenerate_exterior_drops_polygon() {
        // Arc 0 is a three-point sliver; arc 1 is a valid closed ring that
        // must stay a hole rather than become the exterior.
        let doc = r#"{
            "type": "Topology",
            "objects": {
                "countries": {
                    "type": "GeometryCollection",
                    "geometries": [
                        { "type": "Polygon", "arcs": [[0], [1]] },
                        { "type": "MultiPolygon", "arcs": [[[0], [1]]] }
                    ]
                }
            },
            "arcs": [
                [[0, 0], [1, 0], [0, 0]],
                [[0.2, 0.2], [0.8, 0.2], [0.8, 0.8], [0.2, 0.2]]
            ]
        }"#;
        let dataset = WorldDataset::from_json(doc, "countries").unwrap();
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_degenerate_hole_is_skipped() {
        let doc = r#"{
            "type": "Topology",
            "objects": { "countries": { "type": "Polygon", "arcs": [[1], [0]] } },
            "arcs": [
                [[0, 0], [1, 0], [0, 0]],
                [[0, 0], [4, 0], [4, 4], [0, 4], [0, 0]]
            ]
        }"#;
        let dataset = WorldDataset::from_json(doc, "countries").unwrap();
        match &dataset.countries[0] {
            GeoFeature::Polygon { exterior, holes, .. } => {
                assert_eq!(exterior.len(), 5);
                assert!(holes.is_empty());
            }
            other => panic!("expected polygon, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_object() {
        let err = WorldDataset::from_json(TOPOLOGY, "land").unwrap_err();
        assert_eq!(err, DatasetError::MissingObject("land".to_string()));
    }

    #[test]
    fn test_arc_index_out_of_range() {
        let doc = r#"{
            "type": "Topology",
            "objects": { "countries": { "type": "Polygon", "arcs": [[7]] } },
            "arcs": []
        }"#;
        let err = WorldDataset::from_json(doc, "countries").unwrap_err();
        assert!(matches!(err, DatasetError::Parse(_)));
    }
}

//! Latitude/longitude grid generation.
//!
//! Produces the same lines as d3's default graticule: minor lines every 10°
//! stopping 80° from the equator, major lines every 90° reaching (almost)
//! to the poles.

use geo_types::{Coord, LineString, MultiLineString};

const EPSILON: f64 = 1e-6;

/// Graticule configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Graticule {
    /// Spacing of minor meridians and parallels, in degrees.
    pub minor_step: f64,
    /// Spacing of major meridians and parallels, in degrees.
    pub major_step: f64,
    /// Latitude limit of minor meridians.
    pub minor_extent: f64,
    /// Sampling interval along parallels, in degrees.
    pub precision: f64,
}

impl Default for Graticule {
    fn default() -> Self {
        Self {
            minor_step: 10.0,
            major_step: 90.0,
            minor_extent: 80.0,
            precision: 2.5,
        }
    }
}

impl Graticule {
    /// Returns every grid line: major meridians, major parallels, then the
    /// minor meridians and parallels that do not coincide with a major one.
    pub fn lines(&self) -> Vec<LineString<f64>> {
        let major_lat = 90.0 - EPSILON;
        let minor_lat = self.minor_extent + EPSILON;

        let major_meridians = stepped(-180.0, 180.0, self.major_step)
            .into_iter()
            .map(|x| self.meridian(x, -major_lat, major_lat));

        let major_parallels = stepped(-major_lat, major_lat, self.major_step)
            .into_iter()
            .map(|y| self.parallel(y));

        let minor_meridians = stepped(-180.0, 180.0, self.minor_step)
            .into_iter()
            .filter(|x| !self.is_major(*x))
            .map(|x| self.meridian(x, -minor_lat, minor_lat));

        let minor_parallels = stepped(-minor_lat, minor_lat, self.minor_step)
            .into_iter()
            .filter(|y| !self.is_major(*y))
            .map(|y| self.parallel(y));

        major_meridians
            .chain(major_parallels)
            .chain(minor_meridians)
            .chain(minor_parallels)
            .collect()
    }

    pub fn multi_line_string(&self) -> MultiLineString<f64> {
        MultiLineString::new(self.lines())
    }

    fn is_major(&self, value: f64) -> bool {
        (value % self.major_step).abs() <= EPSILON
    }

    /// Meridians are great circles, so sparse samples are enough.
    fn meridian(&self, lon: f64, lat_from: f64, lat_to: f64) -> LineString<f64> {
        sampled(lat_from, lat_to, self.major_step)
            .into_iter()
            .map(|lat| Coord { x: lon, y: lat })
            .collect()
    }

    fn parallel(&self, lat: f64) -> LineString<f64> {
        sampled(-180.0, 180.0, self.precision)
            .into_iter()
            .map(|lon| Coord { x: lon, y: lat })
            .collect()
    }
}

/// Multiples of `step` in `[from, to)`, starting at the first multiple at or
/// above `from`.
fn stepped(from: f64, to: f64, step: f64) -> Vec<f64> {
    let start = (from / step).ceil() * step;
    let count = ((to - start) / step).ceil().max(0.0) as usize;
    (0..count).map(|i| start + i as f64 * step).collect()
}

/// Samples `[from, to]` every `step`, always ending exactly at `to`.
fn sampled(from: f64, to: f64, step: f64) -> Vec<f64> {
    let count = ((to - EPSILON - from) / step).ceil().max(0.0) as usize;
    let mut values: Vec<f64> = (0..count).map(|i| from + i as f64 * step).collect();
    values.push(to);
    values
}

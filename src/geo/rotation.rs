//! Hemisphere rotation values and coordinate formatting.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A projection rotation as a (longitude, latitude) pair in degrees.
///
/// Applied like a d3 `rotate([lon, lat])`: the sphere turns by `lon` about the
/// polar axis, then by `lat` about the east-west axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    pub lon: f64,
    pub lat: f64,
}

impl Rotation {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Rotation that centres the view on the opposite side of the globe.
    ///
    /// Longitude moves by 180° and latitude flips sign.
    pub fn antipode(&self) -> Self {
        let lon = if self.lon > 0.0 {
            self.lon - 180.0
        } else {
            self.lon + 180.0
        };
        Self { lon, lat: -self.lat }
    }

    /// Rotation angles in radians, as (lambda, phi).
    pub fn to_radians(self) -> (f64, f64) {
        (self.lon.to_radians(), self.lat.to_radians())
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_coordinates(self.lon, self.lat))
    }
}

/// Formats a coordinate pair as `"<lon>° <E|W>, <lat>° <N|S>"`.
///
/// Zero counts as east and north.
pub fn format_coordinates(lon: f64, lat: f64) -> String {
    let lon_dir = if lon >= 0.0 { 'E' } else { 'W' };
    let lat_dir = if lat >= 0.0 { 'N' } else { 'S' };
    format!("{}° {}, {}° {}", lon.abs(), lon_dir, lat.abs(), lat_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_east_north() {
        assert_eq!(format_coordinates(67.0, 0.0), "67° E, 0° N");
    }

    #[test]
    fn test_format_west_with_overflowing_latitude() {
        assert_eq!(format_coordinates(-67.0, 180.0), "67° W, 180° N");
    }

    #[test]
    fn test_format_west_south() {
        assert_eq!(format_coordinates(-67.0, -10.0), "67° W, 10° S");
    }

    #[test]
    fn test_format_keeps_fractional_degrees() {
        assert_eq!(format_coordinates(12.5, -0.25), "12.5° E, 0.25° S");
    }

    #[test]
    fn test_display_matches_formatter() {
        let rotation = Rotation::new(-67.0, 180.0);
        assert_eq!(rotation.to_string(), "67° W, 180° N");
    }

    #[test]
    fn test_antipode_round_trip() {
        let rotation = Rotation::new(-67.0, 20.0);
        let antipode = rotation.antipode();
        assert_eq!(antipode, Rotation::new(113.0, -20.0));
        assert_eq!(antipode.antipode(), rotation);
    }
}

//! Map configuration and page-level overrides.
//!
//! Defaults reproduce the classic view: a primary hemisphere rotated to
//! [-67, 0], its antipode as secondary, and a half-transparent overlay.
//! A host page can replace any field with a JSON block in a
//! `<script id="map-config" type="application/json">` element, and the URL
//! query can override the rotation, opacity and dataset for shareable links.

use crate::geo::{Rotation, DEFAULT_CLIP_ANGLE};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default world boundaries source.
pub const DEFAULT_DATASET_URL: &str =
    "https://cdn.jsdelivr.net/npm/world-atlas@2/countries-110m.json";

/// Configuration for the dual-hemisphere map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// URL of the TopoJSON (or GeoJSON) boundaries document.
    pub dataset_url: String,
    /// Topology object holding the country geometries.
    pub countries_object: String,
    /// Quiet period after the last resize before re-rendering.
    pub resize_debounce_ms: u64,
    /// Projection scale is the viewport width divided by this.
    pub scale_divisor: f64,
    /// Clip angle in degrees from the view centre.
    pub clip_angle: f64,
    pub primary_rotation: Rotation,
    pub secondary_rotation: Rotation,
    /// Starting opacity of the secondary hemisphere.
    pub opacity: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            dataset_url: DEFAULT_DATASET_URL.to_string(),
            countries_object: "countries".to_string(),
            resize_debounce_ms: 250,
            scale_divisor: 30.0,
            clip_angle: DEFAULT_CLIP_ANGLE,
            primary_rotation: Rotation::new(-67.0, 0.0),
            secondary_rotation: Rotation::new(-67.0, 180.0),
            opacity: 0.5,
        }
    }
}

impl MapConfig {
    /// Parses a (possibly partial) JSON configuration; missing fields keep
    /// their defaults.
    #[cfg(any(target_arch = "wasm32", test))]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    /// Applies URL query overrides.
    ///
    /// Overriding the primary rotation also moves the secondary hemisphere to
    /// its antipode.
    pub fn with_overrides(mut self, params: &UrlParams) -> Self {
        if params.lon.is_some() || params.lat.is_some() {
            let primary = Rotation::new(
                params.lon.unwrap_or(self.primary_rotation.lon),
                params.lat.unwrap_or(self.primary_rotation.lat),
            );
            self.primary_rotation = primary;
            self.secondary_rotation = primary.antipode();
        }
        if let Some(opacity) = params.opacity {
            self.opacity = opacity;
        }
        if let Some(url) = &params.data {
            self.dataset_url = url.clone();
        }
        self
    }

    /// Loads the configuration from the host page, then applies URL overrides.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let embedded = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("map-config"))
            .and_then(|e| e.text_content());

        let config = match embedded {
            Some(json) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded map configuration from host page");
                    config
                }
                Err(e) => {
                    log::warn!("Failed to parse map configuration: {}", e);
                    Self::default()
                }
            },
            None => Self::default(),
        };

        config.with_overrides(&parse_from_url())
    }

    /// Native builds have no host page; defaults apply.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default().with_overrides(&parse_from_url())
    }
}

/// Parsed URL parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UrlParams {
    pub lon: Option<f64>,
    pub lat: Option<f64>,
    pub opacity: Option<f64>,
    pub data: Option<String>,
}

/// Parses a query string such as `?lon=-67&lat=0&opacity=0.3`.
///
/// Values are percent-decoded, with `+` read as a space. Unknown keys and
/// unparsable numbers are ignored.
#[cfg(any(target_arch = "wasm32", test))]
pub fn parse_query(query: &str) -> UrlParams {
    let mut params = UrlParams::default();

    let query = query.trim_start_matches('?');
    if query.is_empty() {
        return params;
    }

    for pair in query.split('&') {
        let mut kv = pair.splitn(2, '=');
        let key = kv.next().unwrap_or("");
        let value = decode_component(kv.next().unwrap_or(""));
        match key {
            "lon" => params.lon = value.parse().ok().filter(|v: &f64| v.is_finite()),
            "lat" => params.lat = value.parse().ok().filter(|v: &f64| v.is_finite()),
            "opacity" => params.opacity = value.parse().ok().filter(|v: &f64| v.is_finite()),
            "data" if !value.is_empty() => params.data = Some(value),
            _ => {}
        }
    }

    params
}

#[cfg(any(target_arch = "wasm32", test))]
fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_encoding::percent_decode_str(&spaced)
        .decode_utf8_lossy()
        .into_owned()
}

/// Parse URL query parameters from the current browser URL.
#[cfg(target_arch = "wasm32")]
pub fn parse_from_url() -> UrlParams {
    let search = web_sys::window().and_then(|w| w.location().search().ok());
    match search {
        Some(search) => parse_query(&search),
        None => UrlParams::default(),
    }
}

/// No-op stub for native builds.
#[cfg(not(target_arch = "wasm32"))]
pub fn parse_from_url() -> UrlParams {
    UrlParams::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MapConfig::default();
        assert_eq!(config.primary_rotation, Rotation::new(-67.0, 0.0));
        assert_eq!(config.secondary_rotation, Rotation::new(-67.0, 180.0));
        assert_eq!(config.opacity, 0.5);
        assert_eq!(config.resize_debounce(), Duration::from_millis(250));
        assert_eq!(config.scale_divisor, 30.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{ "opacity": 0.8, "primary_rotation": { "lon": 10, "lat": 5 } }"#;
        let config = MapConfig::from_json(json).unwrap();
        assert_eq!(config.opacity, 0.8);
        assert_eq!(config.primary_rotation, Rotation::new(10.0, 5.0));
        assert_eq!(config.dataset_url, DEFAULT_DATASET_URL);
    }

    #[test]
    fn test_parse_query() {
        let params = parse_query("?lon=12.5&lat=-3&opacity=0.25&bogus=1&data=world.json");
        assert_eq!(params.lon, Some(12.5));
        assert_eq!(params.lat, Some(-3.0));
        assert_eq!(params.opacity, Some(0.25));
        assert_eq!(params.data.as_deref(), Some("world.json"));
    }

    #[test]
    fn test_parse_query_decodes_dataset_url() {
        let params = parse_query("?data=https%3A%2F%2Fexample.com%2Fw.json%3Fv%3D2");
        assert_eq!(params.data.as_deref(), Some("https://example.com/w.json?v=2"));

        let params = parse_query("?data=my+world%20atlas.json&lon=%2D67");
        assert_eq!(params.data.as_deref(), Some("my world atlas.json"));
        assert_eq!(params.lon, Some(-67.0));
    }

    #[test]
    fn test_parse_query_ignores_garbage() {
        let params = parse_query("lon=abc&lat=NaN&opacity=");
        assert_eq!(params, UrlParams::default());
    }

    #[test]
    fn test_rotation_override_moves_secondary_to_antipode() {
        let params = UrlParams {
            lon: Some(30.0),
            lat: Some(10.0),
            ..Default::default()
        };
        let config = MapConfig::default().with_overrides(&params);
        assert_eq!(config.primary_rotation, Rotation::new(30.0, 10.0));
        assert_eq!(config.secondary_rotation, Rotation::new(-150.0, -10.0));
    }
}

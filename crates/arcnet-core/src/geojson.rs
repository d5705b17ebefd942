//! GeoJSON location loading.
//!
//! Reads a `FeatureCollection` into a flat list of [`LocationPoint`]s. `Point`
//! features contribute one location and `MultiPoint` features contribute one
//! per coordinate; every other geometry type is skipped.

use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use crate::features::{Attributes, Feature, FeatureSet, NamedLocation, Point};

#[derive(Debug, Error)]
pub enum GeoJsonError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0} is not a GeoJSON FeatureCollection")]
    NotFeatureCollection(String),
}

/// A single location read from a GeoJSON file, with its feature properties.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationPoint {
    pub longitude: f64,
    pub latitude: f64,
    pub properties: Attributes,
}

impl LocationPoint {
    #[must_use]
    pub fn point(&self) -> Point {
        Point::new(self.longitude, self.latitude)
    }

    /// Display name: the first property whose key contains `name`
    /// (case-insensitive), else `Point <id>`.
    ///
    /// `index` is the zero-based position of the location in its file.
    #[must_use]
    pub fn display_name(&self, index: usize) -> String {
        let named = self
            .properties
            .iter()
            .find(|(key, _)| key.to_lowercase().contains("name"));
        match named {
            Some((_, value)) => value_to_string(value),
            None => format!("Point {}", self.identifier(index)),
        }
    }

    /// Identifier from `OBJECTID`, `id`, `ID` or `_id`, falling back to the
    /// 1-based position.
    #[must_use]
    pub fn identifier(&self, index: usize) -> String {
        ["OBJECTID", "id", "ID", "_id"]
            .iter()
            .filter_map(|key| self.properties.get(*key))
            .find(|v| is_truthy(v))
            .map_or_else(|| (index + 1).to_string(), value_to_string)
    }
}

/// Locations loaded from one file, labelled by the file's name.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationGroup {
    pub name: String,
    pub locations: Vec<LocationPoint>,
}

impl LocationGroup {
    /// Reads and parses a GeoJSON file. The group is named after the file.
    ///
    /// # Errors
    ///
    /// Returns [`GeoJsonError::Io`] if the file cannot be read,
    /// [`GeoJsonError::Json`] if it is not JSON, or
    /// [`GeoJsonError::NotFeatureCollection`] if the root is not a
    /// `FeatureCollection`.
    pub fn load(path: &Path) -> Result<Self, GeoJsonError> {
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| GeoJsonError::Io {
            path: display.clone(),
            source,
        })?;
        let value: Value = serde_json::from_str(&raw).map_err(|source| GeoJsonError::Json {
            path: display.clone(),
            source,
        })?;
        let locations = parse_locations(&value)
            .ok_or_else(|| GeoJsonError::NotFeatureCollection(display.clone()))?;

        let name = path
            .file_name()
            .map_or(display, |n| n.to_string_lossy().into_owned());

        Ok(Self { name, locations })
    }

    /// Converts the locations into facility features for a service-area
    /// request. Each facility carries only a `Name`, taken from
    /// [`LocationPoint::display_name`].
    #[must_use]
    pub fn to_facilities(&self) -> FeatureSet<NamedLocation> {
        let features = self
            .locations
            .iter()
            .enumerate()
            .map(|(i, loc)| {
                Feature::point(
                    NamedLocation::new(loc.display_name(i)),
                    loc.longitude,
                    loc.latitude,
                )
            })
            .collect();
        FeatureSet::from_features(features)
    }
}

/// Extracts locations from a parsed GeoJSON document.
///
/// Returns `None` if the document is not a `FeatureCollection` with a
/// `features` array.
#[must_use]
pub fn parse_locations(geojson: &Value) -> Option<Vec<LocationPoint>> {
    if geojson.get("type").and_then(Value::as_str) != Some("FeatureCollection") {
        return None;
    }
    let features = geojson.get("features").and_then(Value::as_array)?;

    let mut locations = Vec::new();
    for feature in features {
        let Some(geometry) = feature.get("geometry") else {
            continue;
        };
        let Some(coords) = geometry.get("coordinates") else {
            continue;
        };
        let properties = feature
            .get("properties")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        match geometry.get("type").and_then(Value::as_str) {
            Some("Point") => {
                if let Some((lon, lat)) = lon_lat(coords) {
                    locations.push(LocationPoint {
                        longitude: lon,
                        latitude: lat,
                        properties,
                    });
                }
            }
            Some("MultiPoint") => {
                for coord in coords.as_array().into_iter().flatten() {
                    if let Some((lon, lat)) = lon_lat(coord) {
                        locations.push(LocationPoint {
                            longitude: lon,
                            latitude: lat,
                            properties: properties.clone(),
                        });
                    }
                }
            }
            _ => {}
        }
    }

    Some(locations)
}

fn lon_lat(coord: &Value) -> Option<(f64, f64)> {
    let arr = coord.as_array()?;
    Some((arr.first()?.as_f64()?, arr.get(1)?.as_f64()?))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn collection() -> Value {
        json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [-79.41, 43.70] },
                    "properties": { "School_Name": "Lawrence Park", "OBJECTID": 12 }
                },
                {
                    "type": "Feature",
                    "geometry": { "type": "MultiPoint", "coordinates": [[-79.40, 43.71], [-79.39, 43.72]] },
                    "properties": { "id": "mp-1" }
                },
                {
                    "type": "Feature",
                    "geometry": { "type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]] },
                    "properties": {}
                },
                {
                    "type": "Feature",
                    "geometry": null,
                    "properties": { "name": "no geometry" }
                }
            ]
        })
    }

    #[test]
    fn points_and_multipoints_are_flattened() {
        let locations = parse_locations(&collection()).expect("feature collection");
        assert_eq!(locations.len(), 3);
        assert!((locations[0].longitude - -79.41).abs() < 1e-9);
        assert!((locations[2].latitude - 43.72).abs() < 1e-9);
        assert_eq!(locations[1].properties, locations[2].properties);
    }

    #[test]
    fn non_collection_is_rejected() {
        let doc = json!({ "type": "Feature", "geometry": null });
        assert!(parse_locations(&doc).is_none());
    }

    #[test]
    fn display_name_prefers_name_like_property() {
        let locations = parse_locations(&collection()).unwrap();
        assert_eq!(locations[0].display_name(0), "Lawrence Park");
        assert_eq!(locations[0].identifier(0), "12");
    }

    #[test]
    fn display_name_falls_back_to_id_then_index() {
        let locations = parse_locations(&collection()).unwrap();
        assert_eq!(locations[1].display_name(1), "Point mp-1");

        let bare = LocationPoint {
            longitude: 0.0,
            latitude: 0.0,
            properties: Attributes::new(),
        };
        assert_eq!(bare.display_name(4), "Point 5");
    }

    #[test]
    fn zero_object_id_is_skipped_for_identifier() {
        let mut properties = Attributes::new();
        properties.insert("OBJECTID".to_string(), json!(0));
        properties.insert("_id".to_string(), json!(77));
        let loc = LocationPoint {
            longitude: 0.0,
            latitude: 0.0,
            properties,
        };
        assert_eq!(loc.identifier(0), "77");
    }

    #[test]
    fn group_converts_to_named_facilities() {
        let group = LocationGroup {
            name: "schools.geojson".to_string(),
            locations: parse_locations(&collection()).unwrap(),
        };
        let facilities = group.to_facilities();
        assert_eq!(facilities.len(), 3);
        assert_eq!(facilities.features[0].attributes.name, "Lawrence Park");
        assert_eq!(facilities.features[2].attributes.name, "Point mp-1");

        let value = serde_json::to_value(&facilities.features[0]).unwrap();
        assert_eq!(value["attributes"], json!({ "Name": "Lawrence Park" }));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = LocationGroup::load(Path::new("/nonexistent/locations.geojson")).unwrap_err();
        assert!(matches!(err, GeoJsonError::Io { .. }));
    }
}

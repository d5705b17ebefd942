//! Esri JSON feature types.
//!
//! These model the feature-set payloads the ArcGIS REST API accepts as
//! geoprocessing inputs and returns as results. Input records ([`Facility`],
//! [`DemandPoint`], [`Store`], [`NamedLocation`]) serialize with the exact attribute names the
//! network-analysis services expect. Result features use the untyped
//! [`Attributes`] map because their columns are defined by the service.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Untyped attribute map used for service-defined result columns.
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// A ring or path: a list of `[x, y]` (optionally `[x, y, z]`) vertices.
pub type Path = Vec<Vec<f64>>;

/// A WGS84 point. `x` is longitude and `y` is latitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Geometry of a feature, distinguished by which coordinate field is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Geometry {
    Point(Point),
    Polygon { rings: Vec<Path> },
    Polyline { paths: Vec<Path> },
}

impl Geometry {
    #[must_use]
    pub fn as_point(&self) -> Option<Point> {
        match self {
            Geometry::Point(p) => Some(*p),
            _ => None,
        }
    }

    /// Polygon rings, or `None` for non-polygon geometry.
    #[must_use]
    pub fn rings(&self) -> Option<&[Path]> {
        match self {
            Geometry::Polygon { rings } => Some(rings),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpatialReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wkid: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_wkid: Option<u32>,
}

impl SpatialReference {
    /// WGS84 geographic coordinates (`wkid` 4326).
    #[must_use]
    pub fn wgs84() -> Self {
        Self {
            wkid: Some(4326),
            latest_wkid: Some(4326),
        }
    }
}

/// Schema entry in a feature set's `fields` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
}

impl FieldDef {
    #[must_use]
    pub fn string(name: &str, alias: &str, length: u32) -> Self {
        Self {
            name: name.to_string(),
            field_type: "esriFieldTypeString".to_string(),
            alias: Some(alias.to_string()),
            length: Some(length),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature<A> {
    pub attributes: A,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,
}

impl<A> Feature<A> {
    #[must_use]
    pub fn point(attributes: A, x: f64, y: f64) -> Self {
        Self {
            attributes,
            geometry: Some(Geometry::Point(Point::new(x, y))),
        }
    }
}

/// An Esri JSON feature set with optional schema metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureSet<A> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_field_name: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub field_aliases: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spatial_reference: Option<SpatialReference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldDef>,
    #[serde(default = "Vec::new")]
    pub features: Vec<Feature<A>>,
}

impl<A> FeatureSet<A> {
    /// A bare feature set carrying only features, as the location-allocation
    /// inputs are submitted.
    #[must_use]
    pub fn from_features(features: Vec<Feature<A>>) -> Self {
        Self {
            display_field_name: None,
            field_aliases: BTreeMap::new(),
            geometry_type: None,
            spatial_reference: None,
            fields: Vec::new(),
            features,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl<A: Serialize> FeatureSet<A> {
    /// Converts typed attributes into untyped maps, keeping schema metadata.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json::Error` if an attribute value does not serialize
    /// to a JSON object.
    pub fn into_dynamic(self) -> Result<FeatureSet<Attributes>, serde_json::Error> {
        let features = self
            .features
            .into_iter()
            .map(|f| {
                let value = serde_json::to_value(f.attributes)?;
                let attributes: Attributes = serde_json::from_value(value)?;
                Ok(Feature {
                    attributes,
                    geometry: f.geometry,
                })
            })
            .collect::<Result<Vec<_>, serde_json::Error>>()?;

        Ok(FeatureSet {
            display_field_name: self.display_field_name,
            field_aliases: self.field_aliases,
            geometry_type: self.geometry_type,
            spatial_reference: self.spatial_reference,
            fields: self.fields,
            features,
        })
    }
}

/// Location-allocation facility role, using the solver's numeric codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum FacilityType {
    Candidate,
    /// An existing site that must be part of the solution.
    Required,
    Competitor,
    Chosen,
}

impl FacilityType {
    #[must_use]
    pub fn code(self) -> i64 {
        match self {
            FacilityType::Candidate => 0,
            FacilityType::Required => 1,
            FacilityType::Competitor => 2,
            FacilityType::Chosen => 3,
        }
    }
}

impl From<FacilityType> for i64 {
    fn from(value: FacilityType) -> Self {
        value.code()
    }
}

impl TryFrom<i64> for FacilityType {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(FacilityType::Candidate),
            1 => Ok(FacilityType::Required),
            2 => Ok(FacilityType::Competitor),
            3 => Ok(FacilityType::Chosen),
            other => Err(format!("unknown facility type code {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facility {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "FacilityType")]
    pub facility_type: FacilityType,
}

/// A point input identified only by its `Name`, for tasks (service areas,
/// closest facility) that take no role or weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedLocation {
    #[serde(rename = "Name")]
    pub name: String,
}

impl NamedLocation {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandPoint {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Weight")]
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    #[serde(rename = "StoreName")]
    pub store_name: String,
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "StoreId")]
    pub store_id: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn facility_feature_serializes_with_service_attribute_names() {
        let feature = Feature::point(
            Facility {
                name: "Existing Location".to_string(),
                facility_type: FacilityType::Required,
            },
            -122.333_906,
            47.609_152,
        );
        let value = serde_json::to_value(&feature).unwrap();
        assert_eq!(
            value,
            json!({
                "attributes": { "Name": "Existing Location", "FacilityType": 1 },
                "geometry": { "x": -122.333_906, "y": 47.609_152 }
            })
        );
    }

    #[test]
    fn facility_type_rejects_unknown_code() {
        let result = serde_json::from_value::<FacilityType>(json!(7));
        assert!(result.is_err());
    }

    #[test]
    fn bare_feature_set_omits_empty_metadata() {
        let set = FeatureSet::from_features(vec![Feature::point(
            DemandPoint {
                name: "Safeco Plaza".to_string(),
                weight: 3618.0,
            },
            -122.333_899,
            47.606_19,
        )]);
        let value = serde_json::to_value(&set).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.keys().collect::<Vec<_>>(), vec!["features"]);
    }

    #[test]
    fn result_geometry_deserializes_polygon_and_polyline() {
        let polygon: Geometry = serde_json::from_value(json!({
            "rings": [[[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [0.0, 0.0]]],
            "spatialReference": { "wkid": 4326 }
        }))
        .unwrap();
        assert_eq!(polygon.rings().map(<[Path]>::len), Some(1));

        let line: Geometry = serde_json::from_value(json!({
            "paths": [[[0.0, 0.0, 5.0], [1.0, 1.0, 5.0]]]
        }))
        .unwrap();
        assert!(matches!(line, Geometry::Polyline { .. }));
        assert!(line.as_point().is_none());
    }

    #[test]
    fn into_dynamic_keeps_schema_and_attribute_values() {
        let mut set = FeatureSet::from_features(vec![Feature::point(
            Store {
                store_name: "Store 1".to_string(),
                address: "1775 E Lugonia Ave, Redlands, CA 92374".to_string(),
                store_id: "120".to_string(),
            },
            -117.14,
            34.07,
        )]);
        set.geometry_type = Some("esriGeometryPoint".to_string());

        let dynamic = set.into_dynamic().unwrap();
        assert_eq!(dynamic.geometry_type.as_deref(), Some("esriGeometryPoint"));
        assert_eq!(dynamic.features[0].attributes["StoreId"], json!("120"));
        assert_eq!(
            dynamic.features[0].geometry.as_ref().and_then(Geometry::as_point),
            Some(Point::new(-117.14, 34.07))
        );
    }
}

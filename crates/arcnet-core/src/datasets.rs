//! Built-in sample inputs.
//!
//! The downtown Seattle scenario picks a new fast-food branch among four
//! candidate sites given one existing restaurant and eighteen office-building
//! demand points. The Redlands scenario is a three-store grocery chain used
//! for drive-time service areas. The Portland scenario routes from a point
//! downtown to the nearest of eight grocery stores.

use std::collections::BTreeMap;

use crate::features::{
    DemandPoint, Facility, FacilityType, Feature, FeatureSet, FieldDef, NamedLocation,
    SpatialReference, Store,
};

const SEATTLE_FACILITIES: [(&str, FacilityType, f64, f64); 5] = [
    ("Existing Location", FacilityType::Required, -122.333_906, 47.609_152),
    ("Candidate 1", FacilityType::Candidate, -122.333_585, 47.604_501),
    ("Candidate 2", FacilityType::Candidate, -122.334_550, 47.605_557),
    ("Candidate 3", FacilityType::Candidate, -122.337_753, 47.609_442),
    ("Candidate 4", FacilityType::Candidate, -122.335_319, 47.607_317),
];

const SEATTLE_DEMAND: [(&str, f64, f64, f64); 18] = [
    ("Colman Building", 1573.0, -122.335_583, 47.603_495),
    ("Norton Parking Garage", 1262.0, -122.334_82, 47.603_745),
    ("DocuSign Tower", 2385.0, -122.334_151, 47.605_060),
    ("Fourth and Madison Building", 1096.0, -122.333_227, 47.605_493),
    ("Safeco Plaza", 3618.0, -122.333_899, 47.606_190),
    ("1201 Third Avenue", 1782.0, -122.336_163, 47.607_204),
    ("Puget Sound Plaza", 2165.0, -122.335_796, 47.608_602),
    ("Rainier Square", 1316.0, -122.334_881, 47.609_021),
    ("Century Square", 1974.0, -122.337_503, 47.610_273),
    ("Miken Building", 3920.0, -122.336_516, 47.609_510),
    ("Westlake Park", 2467.0, -122.336_353, 47.611_046_6),
    ("U.S. Bank Centre", 3997.0, -122.334_571, 47.610_492),
    ("Westlake Center", 2440.0, -122.337_406, 47.611_980),
    ("Nordstrom Flagship Store", 2438.0, -122.336_295, 47.612_304_7),
    ("Columbia Center", 5400.0, -122.330_746, 47.604_502),
    ("800 Fifth Avenue", 3697.0, -122.330_228, 47.605_698),
    ("Seattle Municipal Tower", 2025.0, -122.329_605, 47.605_143),
    ("Washington State Convention Center", 1076.0, -122.331_520, 47.611_664),
];

const REDLANDS_STORES: [(&str, &str, &str, f64, f64); 3] = [
    (
        "Store 1",
        "1775 E Lugonia Ave, Redlands, CA 92374",
        "120",
        -117.140_029_999_943_86,
        34.071_219_999_994_128,
    ),
    (
        "Store 2",
        "1536 Barton Rd, Redlands, CA 92373",
        "130",
        -117.207_329_999_671,
        34.047_980_000_203_609,
    ),
    (
        "Store 3",
        "11 E Colton Ave, Redlands, CA 92374",
        "121",
        -117.181_940_000_419_73,
        34.063_519_999_762_32,
    ),
];

const PORTLAND_STORES: [(f64, f64); 8] = [
    (-122.674_84, 45.520_87),
    (-122.683_65, 45.523_27),
    (-122.664_06, 45.523_78),
    (-122.663_1, 45.520_93),
    (-122.663_42, 45.519_76),
    (-122.662_08, 45.519_7),
    (-122.662_47, 45.518_45),
    (-122.662_99, 45.518_27),
];

/// Default starting point for the Portland closest-facility search.
pub const PORTLAND_INCIDENT: (f64, f64) = (-122.675_84, 45.520_87);

/// Existing and candidate restaurant sites in downtown Seattle.
#[must_use]
pub fn seattle_facilities() -> FeatureSet<Facility> {
    FeatureSet::from_features(
        SEATTLE_FACILITIES
            .iter()
            .map(|&(name, facility_type, x, y)| {
                Feature::point(
                    Facility {
                        name: name.to_string(),
                        facility_type,
                    },
                    x,
                    y,
                )
            })
            .collect(),
    )
}

/// Office buildings in downtown Seattle weighted by occupancy.
#[must_use]
pub fn seattle_demand_points() -> FeatureSet<DemandPoint> {
    FeatureSet::from_features(
        SEATTLE_DEMAND
            .iter()
            .map(|&(name, weight, x, y)| {
                Feature::point(
                    DemandPoint {
                        name: name.to_string(),
                        weight,
                    },
                    x,
                    y,
                )
            })
            .collect(),
    )
}

/// Grocery stores in Redlands, CA, with the field schema the service-area
/// task uses to carry store attributes through to its output polygons.
#[must_use]
pub fn redlands_stores() -> FeatureSet<Store> {
    let field_aliases = BTreeMap::from([
        ("StoreName".to_string(), "Store Name".to_string()),
        ("Address".to_string(), "Address".to_string()),
        ("StoreId".to_string(), "Store ID".to_string()),
    ]);

    let features = REDLANDS_STORES
        .iter()
        .map(|&(store_name, address, store_id, x, y)| {
            Feature::point(
                Store {
                    store_name: store_name.to_string(),
                    address: address.to_string(),
                    store_id: store_id.to_string(),
                },
                x,
                y,
            )
        })
        .collect();

    FeatureSet {
        display_field_name: Some(String::new()),
        field_aliases,
        geometry_type: Some("esriGeometryPoint".to_string()),
        spatial_reference: Some(SpatialReference::wgs84()),
        fields: vec![
            FieldDef::string("StoreName", "Name", 50),
            FieldDef::string("Address", "Name", 256),
            FieldDef::string("StoreId", "Store ID", 16),
        ],
        features,
    }
}

/// Grocery stores in downtown Portland, OR, named `Store 1` to `Store 8`.
#[must_use]
pub fn portland_stores() -> FeatureSet<NamedLocation> {
    FeatureSet::from_features(
        PORTLAND_STORES
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| Feature::point(NamedLocation::new(format!("Store {}", i + 1)), x, y))
            .collect(),
    )
}

/// A single incident at `(x, y)` for a closest-facility search.
#[must_use]
pub fn incident_at(x: f64, y: f64) -> FeatureSet<NamedLocation> {
    FeatureSet::from_features(vec![Feature::point(NamedLocation::new("Start"), x, y)])
}

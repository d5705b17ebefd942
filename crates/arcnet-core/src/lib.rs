pub mod app_config;
pub mod config;
pub mod coverage;
pub mod datasets;
pub mod features;
pub mod geojson;
pub mod table;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use coverage::{
    break_schedule, format_break_values, parse_break_values, summarize_coverage, BreakCount,
    BreakPolygon, BreakScheduleError, CoverageSummary, CoveredLocation, GroupCoverage,
};
pub use features::{
    Attributes, DemandPoint, Facility, FacilityType, Feature, FeatureSet, FieldDef, Geometry,
    NamedLocation, Point, SpatialReference, Store,
};
pub use geojson::{GeoJsonError, LocationGroup, LocationPoint};
pub use table::{Table, TableError};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

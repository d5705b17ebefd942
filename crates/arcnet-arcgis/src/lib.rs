//! Client for the ArcGIS location services used by `arcnet`.
//!
//! Covers travel-mode lookup, location-allocation, service-area and
//! closest-facility geoprocessing jobs, and portal content search.

pub mod client;
pub mod closest_facility;
pub mod content;
pub mod error;
pub mod jobs;
pub mod location_allocation;
pub(crate) mod retry;
pub mod service_area;
pub mod travel_modes;
pub mod types;

pub use client::{ArcgisClient, ClientOptions};
pub use closest_facility::{
    ClosestFacilityDirection, ClosestFacilityRequest, ClosestFacilityResult,
};
pub use content::build_search_query;
pub use error::ArcgisError;
pub use location_allocation::{
    AllocationDirection, LocationAllocationRequest, LocationAllocationResult, ProblemType,
};
pub use service_area::{ServiceAreaDirection, ServiceAreaRequest, ServiceAreaResult};
pub use travel_modes::select_travel_mode;
pub use types::{ContentItem, JobInfo, JobStatus, SearchResponse, TravelModeRecord};

//! `location-allocation`: choose new sites for a restaurant branch among the
//! Seattle candidates, maximizing the demand that walks to them.

use arcnet_arcgis::{
    AllocationDirection, ArcgisClient, LocationAllocationRequest, LocationAllocationResult,
    ProblemType,
};
use arcnet_core::datasets::{seattle_demand_points, seattle_facilities};
use arcnet_core::{AppConfig, FacilityType, Table, TableError};

const FACILITY_COLUMNS: [&str; 4] = ["Name", "FacilityType", "DemandCount", "DemandWeight"];
const ALLOCATION_COLUMNS: [&str; 3] = ["Name", "Weight", "Total_Minutes"];

/// Solve location-allocation for the built-in Seattle datasets and print the
/// chosen facilities and allocation lines.
///
/// # Errors
///
/// Returns an error if the API key is missing, the travel mode does not
/// exist, the job fails, or an expected result column is absent.
pub(crate) async fn run_location_allocation(
    config: &AppConfig,
    travel_mode: &str,
    facilities_to_find: u32,
    problem_type: ProblemType,
    travel_direction: AllocationDirection,
) -> anyhow::Result<()> {
    config.require_api_key()?;
    let client = ArcgisClient::from_app_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build ArcGIS client: {e}"))?;

    let travel_mode = client.find_travel_mode(travel_mode).await?;

    let request = LocationAllocationRequest {
        facilities: seattle_facilities(),
        demand_points: seattle_demand_points(),
        travel_mode,
        problem_type,
        facilities_to_find,
        travel_direction,
    };
    let result = client.solve_location_allocation(&request).await?;
    if !result.solve_succeeded {
        tracing::warn!("solver reported solve_succeeded = false");
    }

    println!("\n-- Chosen Facilities -- \n");
    println!("{}", chosen_facilities(&result)?);
    println!("\n-- Output Allocation -- \n");
    println!("{}", allocation_lines(&result)?);
    Ok(())
}

/// Required and chosen facilities with the demand they serve.
pub(crate) fn chosen_facilities(result: &LocationAllocationResult) -> Result<Table, TableError> {
    Table::from_features(&result.output_facilities)
        .select(&FACILITY_COLUMNS)?
        .filter_in(
            "FacilityType",
            &[FacilityType::Required.code(), FacilityType::Chosen.code()],
        )
}

pub(crate) fn allocation_lines(result: &LocationAllocationResult) -> Result<Table, TableError> {
    Table::from_features(&result.output_allocation_lines).select(&ALLOCATION_COLUMNS)
}

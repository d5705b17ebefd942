//! `closest-facility`: route from a starting point to the nearest Portland
//! grocery stores.

use arcnet_arcgis::{
    ArcgisClient, ClosestFacilityDirection, ClosestFacilityRequest, ClosestFacilityResult,
};
use arcnet_core::datasets::{incident_at, portland_stores};
use arcnet_core::{AppConfig, Table, TableError};

const ROUTE_COLUMNS: [&str; 2] = ["Name", "Total_Minutes"];

/// Find the closest stores to `(x, y)` and print one row per route.
///
/// # Errors
///
/// Returns an error if the API key is missing, the travel mode does not
/// exist, the job fails, or a route column is absent.
pub(crate) async fn run_closest_facility(
    config: &AppConfig,
    (x, y): (f64, f64),
    facilities_to_find: u32,
    travel_direction: ClosestFacilityDirection,
    travel_mode: Option<&str>,
) -> anyhow::Result<()> {
    config.require_api_key()?;
    let client = ArcgisClient::from_app_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build ArcGIS client: {e}"))?;

    let travel_mode = match travel_mode {
        Some(alt_name) => Some(client.find_travel_mode(alt_name).await?),
        None => None,
    };
    let request = ClosestFacilityRequest {
        incidents: incident_at(x, y),
        facilities: portland_stores(),
        facilities_to_find,
        travel_direction,
        travel_mode,
    };
    let result = client.find_closest_facilities(&request).await?;
    if !result.solve_succeeded {
        tracing::warn!("solver reported Solve_Succeeded = false");
    }

    println!("\n-- Closest Facility Routes -- \n");
    println!("{}", route_table(&result)?);
    Ok(())
}

pub(crate) fn route_table(result: &ClosestFacilityResult) -> Result<Table, TableError> {
    Table::from_features(&result.routes).select(&ROUTE_COLUMNS)
}

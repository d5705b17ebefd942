//! Routes to the nearest facilities via the `FindClosestFacilities` GP task.

use std::fmt;

use arcnet_core::{Attributes, FeatureSet, NamedLocation};

use crate::client::ArcgisClient;
use crate::error::ArcgisError;
use crate::location_allocation::encode;

pub(crate) const CLOSEST_FACILITY_TASK: &str =
    "arcgis/rest/services/World/ClosestFacilities/GPServer/FindClosestFacilities";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosestFacilityDirection {
    IncidentToFacility,
    FacilityToIncident,
}

impl ClosestFacilityDirection {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ClosestFacilityDirection::IncidentToFacility => "Incident to Facility",
            ClosestFacilityDirection::FacilityToIncident => "Facility to Incident",
        }
    }
}

impl fmt::Display for ClosestFacilityDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct ClosestFacilityRequest {
    pub incidents: FeatureSet<NamedLocation>,
    pub facilities: FeatureSet<NamedLocation>,
    /// Facilities to route to from each incident.
    pub facilities_to_find: u32,
    pub travel_direction: ClosestFacilityDirection,
    /// Travel-mode definition JSON; the service default applies when `None`.
    pub travel_mode: Option<String>,
}

impl ClosestFacilityRequest {
    /// Encodes the request as `submitJob` form parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ArcgisError::Encode`] if a feature set fails to serialize.
    pub fn form_params(&self) -> Result<Vec<(String, String)>, ArcgisError> {
        let mut params = vec![
            ("Incidents".to_string(), encode("Incidents", &self.incidents)?),
            ("Facilities".to_string(), encode("Facilities", &self.facilities)?),
            (
                "Number_of_Facilities_to_Find".to_string(),
                self.facilities_to_find.to_string(),
            ),
            (
                "Travel_Direction".to_string(),
                self.travel_direction.to_string(),
            ),
        ];
        if let Some(mode) = &self.travel_mode {
            params.push(("Travel_Mode".to_string(), mode.clone()));
        }
        Ok(params)
    }
}

#[derive(Debug, Clone)]
pub struct ClosestFacilityResult {
    /// One route per incident-facility pair, with `FacilityRank` and
    /// `Total_Minutes`.
    pub routes: FeatureSet<Attributes>,
    pub solve_succeeded: bool,
}

impl ArcgisClient {
    /// Runs a closest-facility job and collects its routes.
    ///
    /// # Errors
    ///
    /// Returns [`ArcgisError::Encode`] for unserializable inputs, any job
    /// error from submission or polling, or [`ArcgisError::MissingResult`] /
    /// [`ArcgisError::Deserialize`] if an output is absent or malformed.
    pub async fn find_closest_facilities(
        &self,
        request: &ClosestFacilityRequest,
    ) -> Result<ClosestFacilityResult, ArcgisError> {
        let params = request.form_params()?;
        tracing::info!(
            incidents = request.incidents.len(),
            facilities = request.facilities.len(),
            to_find = request.facilities_to_find,
            "finding closest facilities"
        );

        let job = self.run_job(CLOSEST_FACILITY_TASK, params).await?;
        let routes = self
            .job_result_as(CLOSEST_FACILITY_TASK, &job.job_id, "Output_Routes")
            .await?;
        let solve_succeeded = self
            .job_result_as(CLOSEST_FACILITY_TASK, &job.job_id, "Solve_Succeeded")
            .await?;

        Ok(ClosestFacilityResult {
            routes,
            solve_succeeded,
        })
    }
}

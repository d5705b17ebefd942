//! Location-allocation solve via the `SolveLocationAllocation` GP task.

use std::fmt;
use std::str::FromStr;

use arcnet_core::{Attributes, DemandPoint, Facility, FeatureSet};
use serde::Serialize;

use crate::client::ArcgisClient;
use crate::error::ArcgisError;

pub(crate) const LOCATION_ALLOCATION_TASK: &str =
    "arcgis/rest/services/World/LocationAllocation/GPServer/SolveLocationAllocation";

/// Objective the solver optimizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemType {
    MinimizeImpedance,
    MaximizeCoverage,
    MaximizeCapacitatedCoverage,
    MinimizeFacilities,
    MaximizeAttendance,
    MaximizeMarketShare,
    TargetMarketShare,
}

impl ProblemType {
    pub const ALL: [ProblemType; 7] = [
        ProblemType::MinimizeImpedance,
        ProblemType::MaximizeCoverage,
        ProblemType::MaximizeCapacitatedCoverage,
        ProblemType::MinimizeFacilities,
        ProblemType::MaximizeAttendance,
        ProblemType::MaximizeMarketShare,
        ProblemType::TargetMarketShare,
    ];

    /// The label the service expects.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ProblemType::MinimizeImpedance => "Minimize Impedance",
            ProblemType::MaximizeCoverage => "Maximize Coverage",
            ProblemType::MaximizeCapacitatedCoverage => "Maximize Capacitated Coverage",
            ProblemType::MinimizeFacilities => "Minimize Facilities",
            ProblemType::MaximizeAttendance => "Maximize Attendance",
            ProblemType::MaximizeMarketShare => "Maximize Market Share",
            ProblemType::TargetMarketShare => "Target Market Share",
        }
    }
}

impl fmt::Display for ProblemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProblemType {
    type Err = String;

    /// Accepts the service label or its kebab-case form
    /// (`"Maximize Attendance"` or `"maximize-attendance"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', " ");
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().to_lowercase() == wanted)
            .ok_or_else(|| format!("unknown problem type '{s}'"))
    }
}

/// Direction travel is measured between demand and facilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationDirection {
    FacilityToDemand,
    DemandToFacility,
}

impl AllocationDirection {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AllocationDirection::FacilityToDemand => "Facility to Demand",
            AllocationDirection::DemandToFacility => "Demand to Facility",
        }
    }
}

impl fmt::Display for AllocationDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs to a location-allocation solve.
#[derive(Debug, Clone)]
pub struct LocationAllocationRequest {
    pub facilities: FeatureSet<Facility>,
    pub demand_points: FeatureSet<DemandPoint>,
    /// Travel-mode definition JSON, as returned by `GetTravelModes`.
    pub travel_mode: String,
    pub problem_type: ProblemType,
    pub facilities_to_find: u32,
    pub travel_direction: AllocationDirection,
}

impl LocationAllocationRequest {
    /// Encodes the request as `submitJob` form parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ArcgisError::Encode`] if a feature set fails to serialize.
    pub fn form_params(&self) -> Result<Vec<(String, String)>, ArcgisError> {
        Ok(vec![
            ("facilities".to_string(), encode("facilities", &self.facilities)?),
            (
                "demand_points".to_string(),
                encode("demand_points", &self.demand_points)?,
            ),
            ("travel_mode".to_string(), self.travel_mode.clone()),
            ("problem_type".to_string(), self.problem_type.to_string()),
            (
                "number_of_facilities_to_find".to_string(),
                self.facilities_to_find.to_string(),
            ),
            (
                "travel_direction".to_string(),
                self.travel_direction.to_string(),
            ),
        ])
    }
}

/// Outputs of a location-allocation solve.
#[derive(Debug, Clone)]
pub struct LocationAllocationResult {
    /// All input facilities with `FacilityType`, `DemandCount` and
    /// `DemandWeight` filled in by the solver.
    pub output_facilities: FeatureSet<Attributes>,
    /// One line per allocated demand point with `Weight` and `Total_Minutes`.
    pub output_allocation_lines: FeatureSet<Attributes>,
    pub solve_succeeded: bool,
}

impl ArcgisClient {
    /// Runs a location-allocation job and collects its outputs.
    ///
    /// # Errors
    ///
    /// Returns [`ArcgisError::Encode`] for unserializable inputs, any job
    /// error from submission or polling, or [`ArcgisError::MissingResult`] /
    /// [`ArcgisError::Deserialize`] if an output is absent or malformed.
    pub async fn solve_location_allocation(
        &self,
        request: &LocationAllocationRequest,
    ) -> Result<LocationAllocationResult, ArcgisError> {
        let params = request.form_params()?;
        tracing::info!(
            facilities = request.facilities.len(),
            demand_points = request.demand_points.len(),
            problem_type = %request.problem_type,
            facilities_to_find = request.facilities_to_find,
            "solving location-allocation"
        );

        let job = self.run_job(LOCATION_ALLOCATION_TASK, params).await?;
        let task = LOCATION_ALLOCATION_TASK;

        let output_facilities = self
            .job_result_as(task, &job.job_id, "output_facilities")
            .await?;
        let output_allocation_lines = self
            .job_result_as(task, &job.job_id, "output_allocation_lines")
            .await?;
        let solve_succeeded = self
            .job_result_as(task, &job.job_id, "solve_succeeded")
            .await?;

        Ok(LocationAllocationResult {
            output_facilities,
            output_allocation_lines,
            solve_succeeded,
        })
    }
}

pub(crate) fn encode<T: Serialize>(param: &str, value: &T) -> Result<String, ArcgisError> {
    serde_json::to_string(value).map_err(|e| ArcgisError::Encode {
        param: param.to_string(),
        source: e,
    })
}

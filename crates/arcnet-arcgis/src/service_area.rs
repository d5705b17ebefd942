//! Drive-time polygons via the `GenerateServiceAreas` GP task.

use std::fmt;

use arcnet_core::{format_break_values, Attributes, FeatureSet};
use serde::Serialize;

use crate::client::ArcgisClient;
use crate::error::ArcgisError;
use crate::location_allocation::encode;

pub(crate) const SERVICE_AREA_TASK: &str =
    "arcgis/rest/services/World/ServiceAreas/GPServer/GenerateServiceAreas";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceAreaDirection {
    AwayFromFacility,
    TowardsFacility,
}

impl ServiceAreaDirection {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceAreaDirection::AwayFromFacility => "Away From Facility",
            ServiceAreaDirection::TowardsFacility => "Towards Facility",
        }
    }
}

impl fmt::Display for ServiceAreaDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs to a service-area solve.
#[derive(Debug, Clone)]
pub struct ServiceAreaRequest {
    /// Facilities with their schema metadata; attributes are carried through
    /// to the output polygons.
    pub facilities: FeatureSet<Attributes>,
    /// Break values in minutes, ascending.
    pub break_values: Vec<f64>,
    pub travel_direction: ServiceAreaDirection,
    /// Travel-mode definition JSON; the service default applies when `None`.
    pub travel_mode: Option<String>,
}

impl ServiceAreaRequest {
    /// Builds a request from typed facility records.
    ///
    /// # Errors
    ///
    /// Returns [`ArcgisError::Encode`] if the facility attributes do not
    /// serialize to JSON objects.
    pub fn new<A: Serialize>(
        facilities: FeatureSet<A>,
        break_values: Vec<f64>,
        travel_direction: ServiceAreaDirection,
    ) -> Result<Self, ArcgisError> {
        let facilities = facilities
            .into_dynamic()
            .map_err(|e| ArcgisError::Encode {
                param: "Facilities".to_string(),
                source: e,
            })?;
        Ok(Self {
            facilities,
            break_values,
            travel_direction,
            travel_mode: None,
        })
    }

    /// Encodes the request as `submitJob` form parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ArcgisError::Encode`] if the feature set fails to serialize.
    pub fn form_params(&self) -> Result<Vec<(String, String)>, ArcgisError> {
        let mut params = vec![
            ("Facilities".to_string(), encode("Facilities", &self.facilities)?),
            (
                "Break_Values".to_string(),
                format_break_values(&self.break_values),
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
pub struct ServiceAreaResult {
    /// One polygon per facility per break, with `FromBreak`/`ToBreak` and
    /// the input facility attributes.
    pub service_areas: FeatureSet<Attributes>,
    pub solve_succeeded: bool,
}

impl ArcgisClient {
    /// Runs a service-area job and collects its polygons.
    ///
    /// # Errors
    ///
    /// Returns [`ArcgisError::Encode`] for unserializable inputs, any job
    /// error from submission or polling, or [`ArcgisError::MissingResult`] /
    /// [`ArcgisError::Deserialize`] if an output is absent or malformed.
    pub async fn generate_service_areas(
        &self,
        request: &ServiceAreaRequest,
    ) -> Result<ServiceAreaResult, ArcgisError> {
        let params = request.form_params()?;
        tracing::info!(
            facilities = request.facilities.len(),
            breaks = %format_break_values(&request.break_values),
            direction = %request.travel_direction,
            "generating service areas"
        );

        let job = self.run_job(SERVICE_AREA_TASK, params).await?;
        let service_areas = self
            .job_result_as(SERVICE_AREA_TASK, &job.job_id, "Service_Areas")
            .await?;
        let solve_succeeded = self
            .job_result_as(SERVICE_AREA_TASK, &job.job_id, "Solve_Succeeded")
            .await?;

        Ok(ServiceAreaResult {
            service_areas,
            solve_succeeded,
        })
    }
}

#[cfg(test)]
mod tests {
    use arcnet_core::datasets::redlands_stores;

    use super::*;

    fn request() -> ServiceAreaRequest {
        ServiceAreaRequest::new(
            redlands_stores(),
            vec![5.0, 10.0, 15.0],
            ServiceAreaDirection::TowardsFacility,
        )
        .unwrap()
    }

    #[test]
    fn form_params_use_space_separated_breaks() {
        let params = request().form_params().unwrap();
        assert!(params.contains(&("Break_Values".to_string(), "5 10 15".to_string())));
        assert!(params.contains(&(
            "Travel_Direction".to_string(),
            "Towards Facility".to_string()
        )));
        assert!(!params.iter().any(|(k, _)| k == "Travel_Mode"));
    }

    #[test]
    fn facilities_keep_field_aliases_and_schema() {
        let params = request().form_params().unwrap();
        let facilities = &params.iter().find(|(k, _)| k == "Facilities").unwrap().1;
        let value: serde_json::Value = serde_json::from_str(facilities).unwrap();
        assert_eq!(value["geometryType"], "esriGeometryPoint");
        assert_eq!(value["spatialReference"]["wkid"], 4326);
        assert_eq!(value["fieldAliases"]["StoreName"], "Store Name");
        assert_eq!(value["fields"].as_array().unwrap().len(), 3);
        assert_eq!(value["features"][1]["attributes"]["StoreId"], "130");
    }

    #[test]
    fn travel_mode_is_sent_when_set() {
        let mut req = request();
        req.travel_mode = Some("{\"name\":\"Driving Time\"}".to_string());
        let params = req.form_params().unwrap();
        assert!(params.contains(&(
            "Travel_Mode".to_string(),
            "{\"name\":\"Driving Time\"}".to_string()
        )));
    }
}

//! Travel-mode lookup.

use arcnet_core::FeatureSet;

use crate::client::ArcgisClient;
use crate::error::ArcgisError;
use crate::types::{GpExecuteResponse, TravelModeRecord};

pub(crate) const TRAVEL_MODES_TASK: &str =
    "arcgis/rest/services/World/Utilities/GPServer/GetTravelModes";

const SUPPORTED_TRAVEL_MODES: &str = "supported_travel_modes";

/// Returns the `TravelMode` value of the first record whose `AltName`
/// exactly equals `alt_name`.
///
/// # Errors
///
/// Returns [`ArcgisError::TravelModeNotFound`] when no record matches, or
/// when the first match carries an empty definition.
pub fn select_travel_mode<'a>(
    modes: &'a [TravelModeRecord],
    alt_name: &str,
) -> Result<&'a str, ArcgisError> {
    modes
        .iter()
        .find(|m| m.alt_name.as_deref() == Some(alt_name))
        .map(|m| m.travel_mode.as_str())
        .filter(|definition| !definition.trim().is_empty())
        .ok_or_else(|| ArcgisError::TravelModeNotFound(alt_name.to_string()))
}

impl ArcgisClient {
    /// Lists the travel modes the organization supports, in service order.
    ///
    /// # Errors
    ///
    /// - [`ArcgisError::Http`] / [`ArcgisError::Api`] on request failure.
    /// - [`ArcgisError::MissingResult`] if `supported_travel_modes` is absent.
    /// - [`ArcgisError::Deserialize`] if the feature set does not parse.
    pub async fn get_travel_modes(&self) -> Result<Vec<TravelModeRecord>, ArcgisError> {
        let url = self.logistics_endpoint(&format!("{TRAVEL_MODES_TASK}/execute"));
        let body = self.get_json(&url, &[]).await?;

        let response: GpExecuteResponse =
            serde_json::from_value(body).map_err(|e| ArcgisError::Deserialize {
                context: "GetTravelModes".to_string(),
                source: e,
            })?;

        let param = response
            .results
            .into_iter()
            .find(|p| p.param_name == SUPPORTED_TRAVEL_MODES)
            .ok_or_else(|| ArcgisError::MissingResult {
                param: SUPPORTED_TRAVEL_MODES.to_string(),
            })?;

        let set: FeatureSet<TravelModeRecord> =
            serde_json::from_value(param.value).map_err(|e| ArcgisError::Deserialize {
                context: SUPPORTED_TRAVEL_MODES.to_string(),
                source: e,
            })?;

        let modes: Vec<TravelModeRecord> = set.features.into_iter().map(|f| f.attributes).collect();
        tracing::debug!(count = modes.len(), "fetched supported travel modes");
        Ok(modes)
    }

    /// Fetches the supported travel modes and returns the definition of the
    /// one whose `AltName` is `alt_name`.
    ///
    /// # Errors
    ///
    /// Returns [`ArcgisError::TravelModeNotFound`] when nothing matches, or
    /// any error from [`ArcgisClient::get_travel_modes`].
    pub async fn find_travel_mode(&self, alt_name: &str) -> Result<String, ArcgisError> {
        let modes = self.get_travel_modes().await?;
        select_travel_mode(&modes, alt_name).map(str::to_owned)
    }
}

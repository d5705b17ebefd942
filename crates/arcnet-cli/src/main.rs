mod closest_facility;
mod location_allocation;
mod search;
mod service_area;
mod travel_modes;

use std::path::PathBuf;

use arcnet_arcgis::{
    AllocationDirection, ClosestFacilityDirection, ProblemType, ServiceAreaDirection,
};
use arcnet_core::datasets::PORTLAND_INCIDENT;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "arcnet")]
#[command(about = "ArcGIS network analysis command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Choose facility sites that best serve the Seattle demand points
    LocationAllocation {
        /// `AltName` of the travel mode to solve with
        #[arg(long, default_value = "Walking Time")]
        travel_mode: String,
        /// Number of facilities to choose, including required ones
        #[arg(long, default_value_t = 2)]
        facilities_to_find: u32,
        /// Solver objective, e.g. "maximize-attendance" or "Minimize Impedance"
        #[arg(long, default_value = "maximize-attendance")]
        problem_type: ProblemType,
        #[arg(long, value_enum, default_value_t = AllocationDirectionArg::DemandToFacility)]
        travel_direction: AllocationDirectionArg,
    },
    /// Generate drive-time polygons around facilities
    ServiceArea {
        /// Explicit break values in minutes, e.g. "5 10 15"
        #[arg(long, conflicts_with_all = ["num_breaks", "break_size"])]
        breaks: Option<String>,
        /// Number of evenly spaced breaks (1-5)
        #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..=5))]
        num_breaks: u32,
        /// Minutes between breaks (1-30)
        #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..=30))]
        break_size: u32,
        #[arg(long, value_enum, default_value_t = ServiceAreaDirectionArg::TowardsFacility)]
        travel_direction: ServiceAreaDirectionArg,
        /// `AltName` of the travel mode; the service default when omitted
        #[arg(long)]
        travel_mode: Option<String>,
        /// GeoJSON file whose points replace the Redlands stores
        #[arg(long)]
        facilities: Option<PathBuf>,
        /// GeoJSON files of locations to summarize coverage for
        #[arg(long, num_args = 1..)]
        locations: Vec<PathBuf>,
    },
    /// Route to the nearest Portland grocery stores from a starting point
    ClosestFacility {
        /// Starting longitude; downtown Portland when omitted
        #[arg(long, allow_negative_numbers = true, default_value_t = PORTLAND_INCIDENT.0)]
        longitude: f64,
        #[arg(long, allow_negative_numbers = true, default_value_t = PORTLAND_INCIDENT.1)]
        latitude: f64,
        /// Number of stores to route to (1-8)
        #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..=8))]
        facilities_to_find: u32,
        #[arg(long, value_enum, default_value_t = ClosestFacilityDirectionArg::IncidentToFacility)]
        travel_direction: ClosestFacilityDirectionArg,
        /// `AltName` of the travel mode; the service default when omitted
        #[arg(long)]
        travel_mode: Option<String>,
    },
    /// Search portal content
    Search {
        #[arg(default_value = "Fire")]
        query: String,
        #[arg(long, default_value = "Feature Layer")]
        item_type: String,
        #[arg(long, default_value_t = 5)]
        max_items: u32,
    },
    /// List the travel modes supported by the organization
    TravelModes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum AllocationDirectionArg {
    FacilityToDemand,
    DemandToFacility,
}

impl From<AllocationDirectionArg> for AllocationDirection {
    fn from(arg: AllocationDirectionArg) -> Self {
        match arg {
            AllocationDirectionArg::FacilityToDemand => AllocationDirection::FacilityToDemand,
            AllocationDirectionArg::DemandToFacility => AllocationDirection::DemandToFacility,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ServiceAreaDirectionArg {
    AwayFromFacility,
    TowardsFacility,
}

impl From<ServiceAreaDirectionArg> for ServiceAreaDirection {
    fn from(arg: ServiceAreaDirectionArg) -> Self {
        match arg {
            ServiceAreaDirectionArg::AwayFromFacility => ServiceAreaDirection::AwayFromFacility,
            ServiceAreaDirectionArg::TowardsFacility => ServiceAreaDirection::TowardsFacility,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ClosestFacilityDirectionArg {
    IncidentToFacility,
    FacilityToIncident,
}

impl From<ClosestFacilityDirectionArg> for ClosestFacilityDirection {
    fn from(arg: ClosestFacilityDirectionArg) -> Self {
        match arg {
            ClosestFacilityDirectionArg::IncidentToFacility => {
                ClosestFacilityDirection::IncidentToFacility
            }
            ClosestFacilityDirectionArg::FacilityToIncident => {
                ClosestFacilityDirection::FacilityToIncident
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = arcnet_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(env = %config.env, "configuration loaded");

    match cli.command {
        Commands::LocationAllocation {
            travel_mode,
            facilities_to_find,
            problem_type,
            travel_direction,
        } => {
            location_allocation::run_location_allocation(
                &config,
                &travel_mode,
                facilities_to_find,
                problem_type,
                travel_direction.into(),
            )
            .await?;
        }
        Commands::ServiceArea {
            breaks,
            num_breaks,
            break_size,
            travel_direction,
            travel_mode,
            facilities,
            locations,
        } => {
            let options = service_area::ServiceAreaOptions {
                breaks,
                num_breaks,
                break_size,
                travel_direction: travel_direction.into(),
                travel_mode,
                facilities,
                locations,
            };
            service_area::run_service_area(&config, &options).await?;
        }
        Commands::ClosestFacility {
            longitude,
            latitude,
            facilities_to_find,
            travel_direction,
            travel_mode,
        } => {
            closest_facility::run_closest_facility(
                &config,
                (longitude, latitude),
                facilities_to_find,
                travel_direction.into(),
                travel_mode.as_deref(),
            )
            .await?;
        }
        Commands::Search {
            query,
            item_type,
            max_items,
        } => {
            search::run_search(&config, &query, &item_type, max_items).await?;
        }
        Commands::TravelModes => {
            travel_modes::run_travel_modes(&config).await?;
        }
    }

    Ok(())
}

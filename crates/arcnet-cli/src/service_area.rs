//! `service-area`: drive-time polygons around the Redlands stores (or a
//! GeoJSON facility file), with an optional coverage summary for location
//! files.

use std::path::PathBuf;

use anyhow::Context;
use arcnet_arcgis::{ArcgisClient, ServiceAreaDirection, ServiceAreaRequest};
use arcnet_core::datasets::redlands_stores;
use arcnet_core::{
    break_schedule, format_break_values, parse_break_values, summarize_coverage, AppConfig,
    BreakCount, BreakPolygon, CoverageSummary, LocationGroup, Table,
};

const STORE_COLUMNS: [&str; 5] = ["StoreId", "StoreName", "Address", "FromBreak", "ToBreak"];
const FACILITY_COLUMNS: [&str; 3] = ["Name", "FromBreak", "ToBreak"];

#[derive(Debug)]
pub(crate) struct ServiceAreaOptions {
    pub breaks: Option<String>,
    pub num_breaks: u32,
    pub break_size: u32,
    pub travel_direction: ServiceAreaDirection,
    pub travel_mode: Option<String>,
    pub facilities: Option<PathBuf>,
    pub locations: Vec<PathBuf>,
}

impl ServiceAreaOptions {
    /// Explicit `--breaks` win over the `--num-breaks`/`--break-size` schedule.
    pub(crate) fn break_values(&self) -> anyhow::Result<Vec<f64>> {
        let values = match &self.breaks {
            Some(raw) => parse_break_values(raw)?,
            None => break_schedule(self.num_breaks, self.break_size)?,
        };
        Ok(values)
    }
}

/// Generate service areas and print the polygon attributes.
///
/// # Errors
///
/// Returns an error if the API key is missing, an input file cannot be
/// read, the break values are invalid, or the job fails.
pub(crate) async fn run_service_area(
    config: &AppConfig,
    options: &ServiceAreaOptions,
) -> anyhow::Result<()> {
    config.require_api_key()?;
    let break_values = options.break_values()?;

    let groups = options
        .locations
        .iter()
        .map(|path| {
            LocationGroup::load(path).with_context(|| format!("loading {}", path.display()))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let (mut request, columns): (ServiceAreaRequest, &[&str]) = match &options.facilities {
        Some(path) => {
            let group = LocationGroup::load(path)
                .with_context(|| format!("loading facilities from {}", path.display()))?;
            anyhow::ensure!(
                !group.locations.is_empty(),
                "{} contains no point features",
                path.display()
            );
            let request = ServiceAreaRequest::new(
                group.to_facilities(),
                break_values,
                options.travel_direction,
            )?;
            (request, &FACILITY_COLUMNS[..])
        }
        None => {
            let request =
                ServiceAreaRequest::new(redlands_stores(), break_values, options.travel_direction)?;
            (request, &STORE_COLUMNS[..])
        }
    };

    let client = ArcgisClient::from_app_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build ArcGIS client: {e}"))?;
    if let Some(alt_name) = &options.travel_mode {
        request.travel_mode = Some(client.find_travel_mode(alt_name).await?);
    }

    let result = client.generate_service_areas(&request).await?;
    if !result.solve_succeeded {
        tracing::warn!("solver reported Solve_Succeeded = false");
    }

    let polygons = Table::from_features(&result.service_areas);
    println!("{polygons}");
    println!("\n-- Output Polygons -- \n");
    println!("{}", polygons.select(columns)?);

    if !groups.is_empty() {
        let summary = summarize_coverage(&BreakPolygon::from_features(&result.service_areas), &groups);
        println!("\n-- Break Coverage -- \n");
        print!("{}", render_coverage(&summary));
    }
    Ok(())
}

/// Per-break location counts for each group, the names reached at each
/// break, and the smallest break that reaches every group.
pub(crate) fn render_coverage(summary: &CoverageSummary) -> String {
    let mut out = String::new();

    let label_width = summary
        .break_values
        .iter()
        .map(|b| format_break_values(&[*b]).len() + 4)
        .chain(["Break".len(), "Uncovered".len()])
        .max()
        .unwrap_or(0);
    let widths: Vec<usize> = summary.groups.iter().map(|g| g.name.len().max(5)).collect();

    out.push_str(&format!("{:<label_width$}", "Break"));
    for (group, &width) in summary.groups.iter().zip(&widths) {
        out.push_str(&format!("  {:>width$}", group.name));
    }
    out.push('\n');

    for (i, break_value) in summary.break_values.iter().enumerate() {
        let label = format!("{} min", format_break_values(&[*break_value]));
        out.push_str(&format!("{label:<label_width$}"));
        for (group, &width) in summary.groups.iter().zip(&widths) {
            let count = group.breaks.get(i).map_or(0, BreakCount::count);
            out.push_str(&format!("  {count:>width$}"));
        }
        out.push('\n');
    }

    out.push_str(&format!("{:<label_width$}", "Uncovered"));
    for (group, &width) in summary.groups.iter().zip(&widths) {
        out.push_str(&format!("  {:>width$}", group.uncovered));
    }
    out.push('\n');

    for group in &summary.groups {
        for count in group.breaks.iter().filter(|b| b.count() > 0) {
            let names: Vec<&str> = count.locations.iter().map(|l| l.name.as_str()).collect();
            out.push_str(&format!(
                "{} within {} min: {}\n",
                group.name,
                format_break_values(&[count.break_value]),
                names.join(", ")
            ));
        }
    }

    match summary.smallest_break_for_all {
        Some(b) => out.push_str(&format!(
            "Every group is reached within {} min\n",
            format_break_values(&[b])
        )),
        None => out.push_str("No break reaches every group\n"),
    }
    out
}

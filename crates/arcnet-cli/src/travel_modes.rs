use arcnet_arcgis::{ArcgisClient, TravelModeRecord};
use arcnet_core::AppConfig;

/// List the supported travel modes.
///
/// # Errors
///
/// Returns an error if the API key is missing or the request fails.
pub(crate) async fn run_travel_modes(config: &AppConfig) -> anyhow::Result<()> {
    config.require_api_key()?;
    let client = ArcgisClient::from_app_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build ArcGIS client: {e}"))?;

    let modes = client.get_travel_modes().await?;
    if modes.is_empty() {
        println!("no travel modes are available to this organization");
        return Ok(());
    }
    print!("{}", render_modes(&modes));
    Ok(())
}

pub(crate) fn render_modes(modes: &[TravelModeRecord]) -> String {
    let rows: Vec<[&str; 3]> = modes
        .iter()
        .map(|m| {
            [
                m.name.as_deref().unwrap_or("-"),
                m.alt_name.as_deref().unwrap_or("-"),
                m.travel_mode_id.as_deref().unwrap_or("-"),
            ]
        })
        .collect();

    let header = ["NAME", "ALT NAME", "ID"];
    let mut widths = header.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let line = |cells: [&str; 3]| {
        format!(
            "{:<w0$}  {:<w1$}  {}\n",
            cells[0],
            cells[1],
            cells[2],
            w0 = widths[0],
            w1 = widths[1]
        )
    };

    let mut out = line(header);
    for row in rows {
        out.push_str(&line(row));
    }
    out
}

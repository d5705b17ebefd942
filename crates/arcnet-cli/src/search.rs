use arcnet_arcgis::{build_search_query, ArcgisClient, SearchResponse};
use arcnet_core::AppConfig;

/// Search portal content and print one line per item.
///
/// Works anonymously; the API key is sent only when configured.
///
/// # Errors
///
/// Returns an error if the client cannot be built or the search fails.
pub(crate) async fn run_search(
    config: &AppConfig,
    query: &str,
    item_type: &str,
    max_items: u32,
) -> anyhow::Result<()> {
    let client = ArcgisClient::from_app_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build ArcGIS client: {e}"))?;
    let item_type = Some(item_type).filter(|t| !t.trim().is_empty());

    let response = client.search_content(query, item_type, max_items).await?;
    print!("{}", render_results(&build_search_query(query, item_type), &response));
    Ok(())
}

pub(crate) fn render_results(query: &str, response: &SearchResponse) -> String {
    if response.results.is_empty() {
        return format!("no items found for {query}\n");
    }

    let mut out = format!(
        "{} of {} items for {query}\n",
        response.results.len(),
        response.total
    );
    for item in &response.results {
        out.push_str(&format!(
            "<Item title:\"{}\" type:{} owner:{}>\n",
            item.title, item.item_type, item.owner
        ));
        if let Some(url) = &item.url {
            out.push_str(&format!("    {url}\n"));
        }
    }
    out
}

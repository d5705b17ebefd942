//! Portal content search.

use crate::client::ArcgisClient;
use crate::error::ArcgisError;
use crate::types::SearchResponse;

const SEARCH_PATH: &str = "sharing/rest/search";

/// The portal rejects `num` above this.
const MAX_PAGE_SIZE: u32 = 100;

/// Builds a portal search expression, appending a `type:"..."` clause when
/// an item type is given.
#[must_use]
pub fn build_search_query(query: &str, item_type: Option<&str>) -> String {
    let query = query.trim();
    match item_type.map(str::trim).filter(|t| !t.is_empty()) {
        Some(item_type) if query.is_empty() => format!("type:\"{item_type}\""),
        Some(item_type) => format!("{query} type:\"{item_type}\""),
        None => query.to_string(),
    }
}

impl ArcgisClient {
    /// Searches portal items and returns the first page of results.
    ///
    /// `max_items` is clamped to `1..=100`.
    ///
    /// # Errors
    ///
    /// Returns [`ArcgisError::Http`] / [`ArcgisError::Api`] on request
    /// failure, or [`ArcgisError::Deserialize`] if the response does not
    /// parse.
    pub async fn search_content(
        &self,
        query: &str,
        item_type: Option<&str>,
        max_items: u32,
    ) -> Result<SearchResponse, ArcgisError> {
        let q = build_search_query(query, item_type);
        let num = max_items.clamp(1, MAX_PAGE_SIZE).to_string();
        let url = self.portal_endpoint(SEARCH_PATH);

        let body = self
            .get_json(&url, &[("q", q.as_str()), ("num", num.as_str())])
            .await?;
        let response: SearchResponse =
            serde_json::from_value(body).map_err(|e| ArcgisError::Deserialize {
                context: "content search".to_string(),
                source: e,
            })?;

        tracing::debug!(
            query = %q,
            total = response.total,
            returned = response.results.len(),
            "content search complete"
        );
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_gets_type_clause() {
        assert_eq!(
            build_search_query("Fire", Some("Feature Layer")),
            "Fire type:\"Feature Layer\""
        );
    }

    #[test]
    fn query_without_type_is_unchanged() {
        assert_eq!(build_search_query(" Fire ", None), "Fire");
        assert_eq!(build_search_query("Fire", Some("  ")), "Fire");
    }

    #[test]
    fn type_only_query() {
        assert_eq!(
            build_search_query("", Some("Web Map")),
            "type:\"Web Map\""
        );
    }
}

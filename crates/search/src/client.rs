//! General web and entity search client.

use crate::{get_json, join_endpoint};
use roundtable_core::error::SearchError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Client for the general search provider instance.
///
/// `GET {endpoint}/v7.0/search?q=&mkt=&count=` for ranked web pages and
/// `GET {endpoint}/v7.0/entities?mkt=&q=` for entity lookups, both with the
/// same subscription key.
pub struct SearchClient {
    endpoint: String,
    api_key: String,
    market: String,
    count: u32,
    client: reqwest::Client,
}

/// One ranked web page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub url: String,
    pub name: String,
    pub description: String,
}

/// Web search results: ranked pages plus related query suggestions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSearchResults {
    pub pages: Vec<Page>,
    pub related: Vec<String>,
}

/// One entity hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    pub description: String,
}

impl SearchClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        market: impl Into<String>,
        count: u32,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            market: market.into(),
            count,
            client,
        }
    }

    /// Run a web search and map the payload to pages + related queries.
    /// Absent response sections map to empty lists.
    pub async fn web_search(&self, query: &str) -> Result<WebSearchResults, SearchError> {
        let url = join_endpoint(&self.endpoint, "v7.0/search");
        let params = [
            ("q", query.to_string()),
            ("mkt", self.market.clone()),
            ("count", self.count.to_string()),
        ];

        let response: ApiSearchResponse =
            get_json(&self.client, &url, &params, &self.api_key).await?;

        let pages = response
            .web_pages
            .map(|wp| {
                wp.value
                    .into_iter()
                    .map(|p| Page {
                        url: p.url,
                        name: p.name,
                        description: p.snippet,
                    })
                    .collect()
            })
            .unwrap_or_default();

        let related = response
            .related_searches
            .map(|rs| rs.value.into_iter().map(|r| r.text).collect())
            .unwrap_or_default();

        let results = WebSearchResults { pages, related };
        debug!(
            query,
            pages = results.pages.len(),
            related = results.related.len(),
            "Web search completed"
        );
        Ok(results)
    }

    /// Look up entities for a query. An absent `entities` section yields an
    /// empty list.
    pub async fn entity_search(&self, query: &str) -> Result<Vec<Entity>, SearchError> {
        let url = join_endpoint(&self.endpoint, "v7.0/entities");
        let params = [("mkt", self.market.clone()), ("q", query.to_string())];

        let response: ApiEntityResponse =
            get_json(&self.client, &url, &params, &self.api_key).await?;

        let entities: Vec<Entity> = response
            .entities
            .map(|e| {
                e.value
                    .into_iter()
                    .map(|v| Entity {
                        name: v.name,
                        description: v.description,
                    })
                    .collect()
            })
            .unwrap_or_default();

        debug!(query, entities = entities.len(), "Entity search completed");
        Ok(entities)
    }
}

// --- Wire types (internal) ---

#[derive(Debug, Deserialize)]
struct ApiSearchResponse {
    #[serde(rename = "webPages", default)]
    web_pages: Option<ApiWebPages>,
    #[serde(rename = "relatedSearches", default)]
    related_searches: Option<ApiRelatedSearches>,
}

#[derive(Debug, Deserialize)]
struct ApiWebPages {
    #[serde(default)]
    value: Vec<ApiWebPage>,
}

#[derive(Debug, Deserialize)]
struct ApiWebPage {
    #[serde(default)]
    url: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    snippet: String,
}

#[derive(Debug, Deserialize)]
struct ApiRelatedSearches {
    #[serde(default)]
    value: Vec<ApiRelatedQuery>,
}

#[derive(Debug, Deserialize)]
struct ApiRelatedQuery {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct ApiEntityResponse {
    #[serde(default)]
    entities: Option<ApiEntities>,
}

#[derive(Debug, Deserialize)]
struct ApiEntities {
    #[serde(default)]
    value: Vec<ApiEntity>,
}

#[derive(Debug, Deserialize)]
struct ApiEntity {
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_search_response() {
        let data = r#"{
            "webPages": {
                "value": [
                    {"url": "https://example.com/a", "name": "Example A", "snippet": "First result"},
                    {"url": "https://example.com/b", "name": "Example B", "snippet": "Second result"}
                ]
            },
            "relatedSearches": {
                "value": [
                    {"text": "example query"},
                    {"text": "another query"}
                ]
            }
        }"#;
        let parsed: ApiSearchResponse = serde_json::from_str(data).unwrap();
        let pages = parsed.web_pages.unwrap().value;
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].name, "Example A");
        assert_eq!(pages[1].snippet, "Second result");
        let related = parsed.related_searches.unwrap().value;
        assert_eq!(related[0].text, "example query");
    }

    #[test]
    fn parse_search_response_without_related_section() {
        let data = r#"{
            "webPages": {"value": [{"url": "https://example.com", "name": "Example", "snippet": "x"}]}
        }"#;
        let parsed: ApiSearchResponse = serde_json::from_str(data).unwrap();
        assert!(parsed.web_pages.is_some());
        assert!(parsed.related_searches.is_none());
    }

    #[test]
    fn parse_empty_search_response() {
        let parsed: ApiSearchResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.web_pages.is_none());
        assert!(parsed.related_searches.is_none());
    }

    #[test]
    fn parse_entity_response() {
        let data = r#"{
            "entities": {
                "value": [
                    {"name": "Pune", "description": "A city in Maharashtra, India"}
                ]
            }
        }"#;
        let parsed: ApiEntityResponse = serde_json::from_str(data).unwrap();
        let entities = parsed.entities.unwrap().value;
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].name, "Pune");
    }

    #[test]
    fn parse_entity_response_without_entities() {
        let parsed: ApiEntityResponse =
            serde_json::from_str(r#"{"queryContext": {"originalQuery": "x"}}"#).unwrap();
        assert!(parsed.entities.is_none());
    }
}

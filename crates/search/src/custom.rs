//! Domain-scoped (custom) search client.

use crate::{get_json, join_endpoint};
use roundtable_core::error::SearchError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Client for a custom search instance whose searched domains are scoped by
/// a configuration id.
///
/// `GET {endpoint}/v7.0/custom/search?q=&mkt=&count=&customConfig=` with its
/// own subscription key.
pub struct CustomSearchClient {
    endpoint: String,
    api_key: String,
    config_id: String,
    market: String,
    count: u32,
    client: reqwest::Client,
}

/// One result from the domain-scoped index, kept in provider shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomResult {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub snippet: String,
}

impl CustomSearchClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        config_id: impl Into<String>,
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
            config_id: config_id.into(),
            market: market.into(),
            count,
            client,
        }
    }

    /// Search the scoped domains and return the raw page entries.
    pub async fn search(&self, query: &str) -> Result<Vec<CustomResult>, SearchError> {
        let url = join_endpoint(&self.endpoint, "v7.0/custom/search");
        let params = [
            ("q", query.to_string()),
            ("mkt", self.market.clone()),
            ("count", self.count.to_string()),
            ("customConfig", self.config_id.clone()),
        ];

        let response: ApiCustomResponse =
            get_json(&self.client, &url, &params, &self.api_key).await?;

        let results = response
            .web_pages
            .map(|wp| wp.value)
            .unwrap_or_default();

        debug!(query, results = results.len(), "Custom search completed");
        Ok(results)
    }
}

// --- Wire types (internal) ---

#[derive(Debug, Deserialize)]
struct ApiCustomResponse {
    #[serde(rename = "webPages", default)]
    web_pages: Option<ApiCustomWebPages>,
}

#[derive(Debug, Deserialize)]
struct ApiCustomWebPages {
    #[serde(default)]
    value: Vec<CustomResult>,
}

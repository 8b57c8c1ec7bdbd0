//! Search provider HTTP client for Roundtable.
//!
//! Two clients, one per provider instance: [`SearchClient`] for the general
//! web/entity endpoints and [`CustomSearchClient`] for the domain-scoped
//! variant with its own key and configuration id. Transport failures get one
//! bounded retry; non-success statuses and malformed payloads surface as
//! `SearchError` for the tool layer to report in-run.

pub mod client;
pub mod custom;

pub use client::{Entity, Page, SearchClient, WebSearchResults};
pub use custom::{CustomResult, CustomSearchClient};

use roundtable_core::error::SearchError;
use tracing::{debug, warn};

/// Join a configured base endpoint with a request path, tolerating a
/// trailing slash on the base.
pub(crate) fn join_endpoint(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Total attempts per request: the original call plus one retry for
/// transport-level failures. HTTP error statuses are not retried.
const MAX_ATTEMPTS: u32 = 2;

/// GET a JSON payload with the subscription-key header, retrying once on a
/// transport failure, and deserialize the 200 response.
pub(crate) async fn get_json<T: serde::de::DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    query: &[(&str, String)],
    api_key: &str,
) -> Result<T, SearchError> {
    let mut attempt = 1;
    let response = loop {
        let result = client
            .get(url)
            .query(query)
            .header("Ocp-Apim-Subscription-Key", api_key)
            .send()
            .await;

        match result {
            Ok(response) => break response,
            Err(e) if attempt < MAX_ATTEMPTS => {
                warn!(url, attempt, error = %e, "Search request failed, retrying");
                attempt += 1;
            }
            Err(e) => return Err(SearchError::Network(e.to_string())),
        }
    };

    let status = response.status().as_u16();
    if status != 200 {
        let body = response.text().await.unwrap_or_default();
        warn!(url, status, body = %body, "Search provider returned error");
        return Err(SearchError::ApiError {
            status_code: status,
            message: body,
        });
    }

    debug!(url, attempt, "Search request succeeded");

    response
        .json::<T>()
        .await
        .map_err(|e| SearchError::MalformedResponse(format!("Failed to parse response: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_endpoint_handles_trailing_slash() {
        assert_eq!(
            join_endpoint("https://api.example.com/", "v7.0/search"),
            "https://api.example.com/v7.0/search"
        );
        assert_eq!(
            join_endpoint("https://api.example.com", "v7.0/search"),
            "https://api.example.com/v7.0/search"
        );
    }

    #[test]
    fn join_endpoint_handles_leading_slash_in_path() {
        assert_eq!(
            join_endpoint("https://api.example.com", "/v7.0/entities"),
            "https://api.example.com/v7.0/entities"
        );
    }
}

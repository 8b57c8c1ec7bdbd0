//! Web search tool backed by the search provider's general web endpoint.
//!
//! Returns pages (url, name, description) plus related query suggestions,
//! JSON-encoded as the tool output so the agent can quote or summarize them.

use async_trait::async_trait;
use roundtable_core::error::ToolError;
use roundtable_core::tool::{Tool, ToolOutcome};
use roundtable_search::SearchClient;
use std::sync::Arc;
use tracing::debug;

pub struct WebSearchTool {
    search: Arc<SearchClient>,
}

impl WebSearchTool {
    pub fn new(search: Arc<SearchClient>) -> Self {
        Self { search }
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Find information on the web. Returns relevant pages with names, URLs, and descriptions, plus related searches."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolOutcome, ToolError> {
        let query = arguments["query"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'query' argument".into()))?;

        debug!(query, "Executing web search");
        match self.search.web_search(query).await {
            Ok(results) => {
                let output = serde_json::to_string_pretty(&results).map_err(|e| {
                    ToolError::ExecutionFailed {
                        tool_name: "web_search".into(),
                        reason: e.to_string(),
                    }
                })?;
                Ok(ToolOutcome::ok(output))
            }
            Err(e) => Ok(ToolOutcome::failed(format!("Search failed: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool() -> WebSearchTool {
        WebSearchTool::new(Arc::new(SearchClient::new(
            "https://search.invalid",
            "test-key",
            "en-IN",
            5,
        )))
    }

    #[tokio::test]
    async fn missing_query_is_invalid_arguments() {
        let err = tool().execute(serde_json::json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[test]
    fn tool_definition() {
        let def = tool().to_definition();
        assert_eq!(def.name, "web_search");
        assert_eq!(def.parameters["required"][0], "query");
    }
}

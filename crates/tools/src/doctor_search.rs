//! Doctor search tool backed by the domain-scoped custom search variant.
//!
//! The custom configuration restricts results to a curated set of medical
//! sites, so the raw page entries are returned as-is for the agent to
//! extract doctor names and hospitals from.

use async_trait::async_trait;
use roundtable_core::error::ToolError;
use roundtable_core::tool::{Tool, ToolOutcome};
use roundtable_search::CustomSearchClient;
use std::sync::Arc;
use tracing::debug;

pub struct DoctorSearchTool {
    search: Arc<CustomSearchClient>,
}

impl DoctorSearchTool {
    pub fn new(search: Arc<CustomSearchClient>) -> Self {
        Self { search }
    }
}

#[async_trait]
impl Tool for DoctorSearchTool {
    fn name(&self) -> &str {
        "find_doctor"
    }

    fn description(&self) -> &str {
        "Find specialist doctors from selected medical sites. Returns matching pages with names, URLs, and snippets."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The specialty and location to search for, e.g. 'paediatrician in Bangalore'"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolOutcome, ToolError> {
        let query = arguments["query"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'query' argument".into()))?;

        debug!(query, "Executing doctor search");
        match self.search.search(query).await {
            Ok(results) => {
                let output = serde_json::to_string_pretty(&results).map_err(|e| {
                    ToolError::ExecutionFailed {
                        tool_name: "find_doctor".into(),
                        reason: e.to_string(),
                    }
                })?;
                Ok(ToolOutcome::ok(output))
            }
            Err(e) => Ok(ToolOutcome::failed(format!("Doctor search failed: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_query_is_invalid_arguments() {
        let tool = DoctorSearchTool::new(Arc::new(CustomSearchClient::new(
            "https://custom.invalid",
            "test-key",
            "cfg-1",
            "en-IN",
            5,
        )));
        let err = tool.execute(serde_json::json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[test]
    fn tool_definition() {
        let tool = DoctorSearchTool::new(Arc::new(CustomSearchClient::new(
            "https://custom.invalid",
            "test-key",
            "cfg-1",
            "en-IN",
            5,
        )));
        assert_eq!(tool.to_definition().name, "find_doctor");
    }
}

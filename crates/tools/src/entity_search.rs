//! Entity search tool backed by the search provider's entity endpoint.

use async_trait::async_trait;
use roundtable_core::error::ToolError;
use roundtable_core::tool::{Tool, ToolOutcome};
use roundtable_search::SearchClient;
use std::sync::Arc;
use tracing::debug;

pub struct EntitySearchTool {
    search: Arc<SearchClient>,
}

impl EntitySearchTool {
    pub fn new(search: Arc<SearchClient>) -> Self {
        Self { search }
    }
}

#[async_trait]
impl Tool for EntitySearchTool {
    fn name(&self) -> &str {
        "find_entities"
    }

    fn description(&self) -> &str {
        "Look up named entities (people, places, organizations) matching a query. Returns entity names with descriptions."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The entity to look up"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolOutcome, ToolError> {
        let query = arguments["query"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'query' argument".into()))?;

        debug!(query, "Executing entity search");
        match self.search.entity_search(query).await {
            Ok(entities) => {
                let output = serde_json::to_string_pretty(&entities).map_err(|e| {
                    ToolError::ExecutionFailed {
                        tool_name: "find_entities".into(),
                        reason: e.to_string(),
                    }
                })?;
                Ok(ToolOutcome::ok(output))
            }
            Err(e) => Ok(ToolOutcome::failed(format!("Entity search failed: {e}"))),
        }
    }
}

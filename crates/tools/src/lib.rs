//! Built-in tool implementations for Roundtable.
//!
//! Tools give an agent the ability to act outside the conversation: search
//! the web, look up entities, find doctors on curated sites, check the
//! weather, and compute percentage changes.
//!
//! The registry builders here assemble the tool sets the shipped agents
//! use; each agent owns its own registry.

pub mod doctor_search;
pub mod entity_search;
pub mod percentage_change;
pub mod weather;
pub mod web_search;

pub use doctor_search::DoctorSearchTool;
pub use entity_search::EntitySearchTool;
pub use percentage_change::{PercentageChangeTool, percentage_change};
pub use weather::WeatherTool;
pub use web_search::WebSearchTool;

use roundtable_core::error::ToolError;
use roundtable_core::tool::{Tool, ToolRegistry};
use roundtable_search::{CustomSearchClient, SearchClient};
use std::sync::Arc;

/// Tool set for the single tool-selector assistant: weather plus web search.
pub fn assistant_tools(search: Arc<SearchClient>) -> Result<ToolRegistry, ToolError> {
    ToolRegistry::from_tools([
        Arc::new(WeatherTool) as Arc<dyn Tool>,
        Arc::new(WebSearchTool::new(search)),
    ])
}

/// Tool set for the web search agent.
pub fn web_search_tools(search: Arc<SearchClient>) -> Result<ToolRegistry, ToolError> {
    ToolRegistry::from_tools([Arc::new(WebSearchTool::new(search)) as Arc<dyn Tool>])
}

/// Tool set for the doctor agent: entity lookup plus domain-scoped search.
pub fn doctor_tools(
    search: Arc<SearchClient>,
    custom: Arc<CustomSearchClient>,
) -> Result<ToolRegistry, ToolError> {
    ToolRegistry::from_tools([
        Arc::new(EntitySearchTool::new(search)) as Arc<dyn Tool>,
        Arc::new(DoctorSearchTool::new(custom)),
    ])
}

/// Tool set for the data analyst agent.
pub fn analyst_tools() -> Result<ToolRegistry, ToolError> {
    ToolRegistry::from_tools([Arc::new(PercentageChangeTool) as Arc<dyn Tool>])
}

//! Roster definitions for the two shipped team modes.
//!
//! Assistant mode is one tool-selector agent on a round-robin loop of one.
//! Planner mode is a planning-led selector team of four. In both modes the
//! HTTP clients are built once and shared; agents, policies and the team
//! itself are rebuilt fresh for every run.

use roundtable_channels::TeamFactory;
use roundtable_config::{AppConfig, ConfigError};
use roundtable_core::backend::CompletionBackend;
use roundtable_core::tool::ToolRegistry;
use roundtable_providers::AzureChatBackend;
use roundtable_search::{CustomSearchClient, SearchClient};
use roundtable_team::{
    Agent, MaxMessages, OrPolicy, RoundRobinTeam, SelectorTeam, Team, TerminationPolicy,
    TextMention,
};
use std::sync::Arc;

/// Which shipped team answers the queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Mode {
    /// One tool-selector assistant with weather and web search
    Assistant,
    /// A planning-led four-agent selector team
    Planner,
}

const ASSISTANT_SYSTEM_MESSAGE: &str = concat!(
    "You are a tool selector AI assistant for responding to consumer questions. ",
    "Your primary task is to determine the appropriate search tool to call based on the user's query. ",
    "For specific, detailed information about a symptom or doctor, call the 'web_search' function. ",
    "For specific questions on weather, call the 'get_weather' function. ",
    "Do not attempt to answer the query directly; focus solely on selecting and calling the correct function.",
);

const PLANNER_SYSTEM_MESSAGE: &str = concat!(
    "You are a planning agent.\n",
    "Your job is to break down complex tasks into smaller, manageable subtasks.\n",
    "Your team members are:\n",
    "    WebSearchAgent: searches the web for information\n",
    "    WebDoctorAgent: finds specialist doctors and the hospitals they are attached to\n",
    "    DataAnalystAgent: performs calculations\n",
    "\n",
    "You only plan and delegate tasks. You do not execute them yourself.\n",
    "\n",
    "When assigning tasks, use this format:\n",
    "1. <agent> : <task>\n",
    "\n",
    "After all tasks are complete, summarize the findings and end with \"TERMINATE\".",
);

const WEB_SEARCH_SYSTEM_MESSAGE: &str = concat!(
    "You are a web search agent.\n",
    "Your only tool is web_search. Use it to find information.\n",
    "You make only one search call at a time.\n",
    "Once you have the results, you never do calculations based on them.",
);

const DOCTOR_SYSTEM_MESSAGE: &str = concat!(
    "You are an assistant helping to find relevant specialist doctors.\n",
    "Use find_doctor to search the curated medical sites and find_entities to look up ",
    "places or providers named in the task.\n",
    "You make only one search call at a time.\n",
    "Once you have the results, extract the doctor names and the hospitals they are attached to.",
);

const ANALYST_SYSTEM_MESSAGE: &str = concat!(
    "You are a data analyst.\n",
    "Given the tasks you have been assigned, you should analyze the data and provide ",
    "results using the tools provided.",
);

/// Build the factory producing a fresh team per run for `mode`.
pub fn team_factory(
    config: &AppConfig,
    mode: Mode,
) -> Result<TeamFactory, Box<dyn std::error::Error>> {
    match mode {
        Mode::Assistant => assistant_factory(config),
        Mode::Planner => planner_factory(config),
    }
}

fn assistant_factory(config: &AppConfig) -> Result<TeamFactory, Box<dyn std::error::Error>> {
    let backend = chat_backend(config)?;
    let tools = roundtable_tools::assistant_tools(search_client(config)?)?;
    let marker = config.limits.termination_marker.clone();
    let limit = config.limits.assistant_max_messages;
    let temperature = config.backend.temperature;

    Ok(Box::new(move || {
        let assistant = Agent::new(
            "assistant_agent",
            "A tool selector assistant for consumer questions.",
            ASSISTANT_SYSTEM_MESSAGE,
            tools.clone(),
            backend.clone(),
        )
        .with_temperature(temperature);

        let team: Box<dyn Team> = Box::new(RoundRobinTeam::new(
            vec![assistant],
            stop_policy(&marker, limit),
        )?);
        Ok(team)
    }))
}

fn planner_factory(config: &AppConfig) -> Result<TeamFactory, Box<dyn std::error::Error>> {
    let backend = chat_backend(config)?;
    let search = search_client(config)?;
    let custom = custom_search_client(config)?;
    let web_tools = roundtable_tools::web_search_tools(search.clone())?;
    let doctor_tools = roundtable_tools::doctor_tools(search, custom)?;
    let analyst_tools = roundtable_tools::analyst_tools()?;
    let marker = config.limits.termination_marker.clone();
    let limit = config.limits.planner_max_messages;
    let temperature = config.backend.temperature;

    Ok(Box::new(move || {
        let agents = planner_agents(
            backend.clone(),
            web_tools.clone(),
            doctor_tools.clone(),
            analyst_tools.clone(),
            temperature,
        );
        let team: Box<dyn Team> = Box::new(SelectorTeam::new(
            agents,
            stop_policy(&marker, limit),
            backend.clone(),
        )?);
        Ok(team)
    }))
}

/// The planner roster, in the order the selection prompt lists it.
fn planner_agents(
    backend: Arc<dyn CompletionBackend>,
    web_tools: ToolRegistry,
    doctor_tools: ToolRegistry,
    analyst_tools: ToolRegistry,
    temperature: f32,
) -> Vec<Agent> {
    vec![
        Agent::new(
            "PlanningAgent",
            "An agent for planning tasks. It should be the first to engage when given a new task.",
            PLANNER_SYSTEM_MESSAGE,
            ToolRegistry::new(),
            backend.clone(),
        )
        .with_temperature(temperature),
        Agent::new(
            "WebSearchAgent",
            "A web search agent.",
            WEB_SEARCH_SYSTEM_MESSAGE,
            web_tools,
            backend.clone(),
        )
        .with_temperature(temperature),
        Agent::new(
            "WebDoctorAgent",
            "An assistant for finding specialist doctors.",
            DOCTOR_SYSTEM_MESSAGE,
            doctor_tools,
            backend.clone(),
        )
        .with_temperature(temperature),
        Agent::new(
            "DataAnalystAgent",
            "A data analyst agent. Useful for performing calculations.",
            ANALYST_SYSTEM_MESSAGE,
            analyst_tools,
            backend,
        )
        .with_temperature(temperature),
    ]
}

fn stop_policy(marker: &str, limit: usize) -> Box<dyn TerminationPolicy> {
    Box::new(OrPolicy::new(vec![
        Box::new(TextMention::new(marker)),
        Box::new(MaxMessages::new(limit)),
    ]))
}

fn chat_backend(config: &AppConfig) -> Result<Arc<dyn CompletionBackend>, ConfigError> {
    Ok(Arc::new(AzureChatBackend::new(
        config.backend.require_endpoint()?,
        config.backend.require_api_key()?,
        config.backend.require_deployment()?,
        config.backend.api_version.as_str(),
        config.backend.model.as_str(),
    )))
}

fn search_client(config: &AppConfig) -> Result<Arc<SearchClient>, ConfigError> {
    Ok(Arc::new(SearchClient::new(
        config.search.require_endpoint()?,
        config.search.require_api_key()?,
        config.search.market.as_str(),
        config.search.count,
    )))
}

fn custom_search_client(config: &AppConfig) -> Result<Arc<CustomSearchClient>, ConfigError> {
    Ok(Arc::new(CustomSearchClient::new(
        config.custom_search.require_endpoint()?,
        config.custom_search.require_api_key()?,
        config.custom_search.require_config_id()?,
        config.search.market.as_str(),
        config.search.count,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use roundtable_core::backend::{Completion, CompletionRequest};
    use roundtable_core::error::BackendError;

    struct NullBackend;

    #[async_trait]
    impl CompletionBackend for NullBackend {
        fn name(&self) -> &str {
            "null"
        }

        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> Result<Completion, BackendError> {
            Err(BackendError::Network("not wired in tests".into()))
        }
    }

    fn full_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.backend.endpoint = Some("https://llm.example.com".into());
        config.backend.api_key = Some("backend-key".into());
        config.backend.deployment = Some("gpt-4o-sw".into());
        config.search.endpoint = Some("https://search.example.com".into());
        config.search.api_key = Some("search-key".into());
        config.custom_search.endpoint = Some("https://custom.example.com".into());
        config.custom_search.api_key = Some("custom-key".into());
        config.custom_search.config_id = Some("cfg-123".into());
        config
    }

    #[test]
    fn assistant_factory_builds_fresh_teams() {
        let factory = team_factory(&full_config(), Mode::Assistant).unwrap();
        assert!(factory().is_ok());
        assert!(factory().is_ok());
    }

    #[test]
    fn planner_factory_builds_fresh_teams() {
        let factory = team_factory(&full_config(), Mode::Planner).unwrap();
        assert!(factory().is_ok());
    }

    #[test]
    fn missing_backend_key_is_fatal_at_startup() {
        let mut config = full_config();
        config.backend.api_key = None;
        assert!(team_factory(&config, Mode::Assistant).is_err());
    }

    #[test]
    fn planner_mode_requires_the_custom_search_settings() {
        let mut config = full_config();
        config.custom_search.config_id = None;
        assert!(team_factory(&config, Mode::Planner).is_err());
        assert!(team_factory(&config, Mode::Assistant).is_ok());
    }

    #[test]
    fn planner_roster_order() {
        let agents = planner_agents(
            Arc::new(NullBackend),
            ToolRegistry::new(),
            ToolRegistry::new(),
            ToolRegistry::new(),
            0.7,
        );
        let names: Vec<&str> = agents.iter().map(|a| a.name()).collect();
        assert_eq!(
            names,
            [
                "PlanningAgent",
                "WebSearchAgent",
                "WebDoctorAgent",
                "DataAnalystAgent"
            ]
        );
    }
}

//! CLI command implementations.

use crate::roster::Mode;
use roundtable_channels::{ChatSession, ConsoleSink, TeamFactory};
use roundtable_config::AppConfig;
use std::sync::Arc;
use std::time::Duration;

pub mod chat;
pub mod run;

/// Load configuration and check the settings `mode` needs, printing a setup
/// hint when one is missing.
pub(crate) fn load_validated_config(mode: Mode) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let checked = match mode {
        Mode::Assistant => config.validate_assistant(),
        Mode::Planner => config.validate_planner(),
    };

    if let Err(e) = checked {
        eprintln!();
        eprintln!("  ERROR: {e}");
        eprintln!();
        eprintln!("  Settings come from roundtable.toml or the environment:");
        eprintln!("    ROUNDTABLE_OPENAI_ENDPOINT     backend endpoint URL");
        eprintln!("    ROUNDTABLE_OPENAI_KEY          backend API key");
        eprintln!("    ROUNDTABLE_OPENAI_DEPLOYMENT   deployment name");
        eprintln!("    ROUNDTABLE_SEARCH_ENDPOINT     search endpoint URL");
        eprintln!("    ROUNDTABLE_SEARCH_KEY          search subscription key");
        eprintln!();
        eprintln!("  Planner mode additionally needs:");
        eprintln!("    ROUNDTABLE_CUSTOM_SEARCH_ENDPOINT");
        eprintln!("    ROUNDTABLE_CUSTOM_SEARCH_KEY");
        eprintln!("    ROUNDTABLE_CUSTOM_SEARCH_CONFIG");
        eprintln!();
        return Err(e.into());
    }

    Ok(config)
}

/// Wire a console-backed chat session with the configured run timeout.
pub(crate) fn build_session(config: &AppConfig, factory: TeamFactory) -> ChatSession {
    let session = ChatSession::new(factory, Arc::new(ConsoleSink));
    match config.limits.run_timeout_secs {
        Some(secs) => session.with_run_timeout(Duration::from_secs(secs)),
        None => session,
    }
}

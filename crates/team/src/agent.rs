//! A single conversational agent.
//!
//! An agent owns its role instruction and tool registry and shares the
//! completion backend with the rest of the roster. Each turn is one backend
//! round trip: the model either answers in text or directs tool calls, and
//! the tool results land in the conversation for the next turn to read.

use roundtable_core::backend::{CompletionBackend, CompletionRequest, PromptMessage};
use roundtable_core::error::TeamError;
use roundtable_core::message::{Conversation, Message};
use roundtable_core::tool::ToolRegistry;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// A named roster member.
pub struct Agent {
    /// Unique name within the roster
    name: String,

    /// One-line description, shown to the selector
    description: String,

    /// Role instruction sent as the system prompt
    system_message: String,

    /// Tools this agent may invoke, validated at construction
    tools: ToolRegistry,

    /// Shared completion backend
    backend: Arc<dyn CompletionBackend>,

    /// Sampling temperature for this agent's turns
    temperature: f32,
}

impl Agent {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        system_message: impl Into<String>,
        tools: ToolRegistry,
        backend: Arc<dyn CompletionBackend>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            system_message: system_message.into(),
            tools,
            backend,
            temperature: 0.7,
        }
    }

    /// Set the sampling temperature for this agent's turns.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Take one turn: one backend round trip, then any directed tool calls.
    ///
    /// Produces one text message, or a tool-call message followed by one
    /// result message per invocation. Failures stay inside the turn: a
    /// backend error, an unknown tool name, or a failed tool each yield a
    /// tool-error message, and the turn still counts toward termination.
    pub async fn take_turn(&self, conversation: &Conversation) -> Vec<Message> {
        debug!(
            agent = %self.name,
            messages = conversation.len(),
            "Taking turn"
        );

        let completion = match self.backend.complete(self.build_request(conversation)).await {
            Ok(completion) => completion,
            Err(e) => {
                warn!(agent = %self.name, error = %e, "Backend call failed");
                return vec![Message::tool_error(
                    &self.name,
                    format!("Backend call failed: {e}"),
                )];
            }
        };

        if !completion.has_tool_calls() {
            return vec![Message::agent_text(&self.name, completion.content)];
        }

        let requested: Vec<&str> = completion
            .tool_calls
            .iter()
            .map(|call| call.name.as_str())
            .collect();
        let mut messages = vec![Message::tool_call(
            &self.name,
            format!("Calling: {}", requested.join(", ")),
        )];

        for call in &completion.tool_calls {
            let start = std::time::Instant::now();
            let result = self.tools.execute(call).await;
            let duration_ms = start.elapsed().as_millis() as u64;

            match result {
                Ok(outcome) if outcome.success => {
                    debug!(
                        agent = %self.name,
                        tool = %call.name,
                        duration_ms,
                        "Tool executed"
                    );
                    messages.push(Message::tool_result(&self.name, outcome.output));
                }
                Ok(outcome) => {
                    warn!(
                        agent = %self.name,
                        tool = %call.name,
                        duration_ms,
                        "Tool reported failure"
                    );
                    messages.push(Message::tool_error(&self.name, outcome.output));
                }
                Err(e) => {
                    warn!(
                        agent = %self.name,
                        tool = %call.name,
                        error = %e,
                        duration_ms,
                        "Tool execution failed"
                    );
                    messages.push(Message::tool_error(&self.name, format!("Error: {e}")));
                }
            }
        }

        messages
    }

    /// Format the system instruction, the attributed conversation so far,
    /// and the tool schemas into one backend request.
    fn build_request(&self, conversation: &Conversation) -> CompletionRequest {
        let mut messages = vec![PromptMessage::system(&self.system_message)];
        if !conversation.is_empty() {
            messages.push(PromptMessage::user(conversation.transcript()));
        }

        let mut request = CompletionRequest::new(messages).with_temperature(self.temperature);
        if !self.tools.is_empty() {
            request = request.with_tools(self.tools.definitions());
        }
        request
    }
}

/// Reject rosters no dispatch loop can run: empty, or with a name collision
/// that would make selection ambiguous.
pub(crate) fn validate_roster(agents: &[Agent]) -> Result<(), TeamError> {
    if agents.is_empty() {
        return Err(TeamError::EmptyRoster);
    }
    let mut seen = HashSet::new();
    for agent in agents {
        if !seen.insert(agent.name()) {
            return Err(TeamError::DuplicateAgent(agent.name().to_string()));
        }
    }
    Ok(())
}

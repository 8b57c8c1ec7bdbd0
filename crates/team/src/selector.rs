//! Selector dispatch: a backend call picks the next agent each turn.
//!
//! The selection step shows the backend the roster descriptions and the
//! conversation so far and expects exactly one roster name back. A name not
//! in the roster fails the run; there is no fallback agent.

use crate::agent::{Agent, validate_roster};
use crate::run::{RunContext, TaskResult, Team, TeamEvent};
use crate::termination::{StopReason, TerminationPolicy};
use async_trait::async_trait;
use roundtable_core::backend::{CompletionBackend, CompletionRequest, PromptMessage};
use roundtable_core::error::TeamError;
use roundtable_core::message::{Conversation, Message};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct SelectorTeam {
    agents: Vec<Agent>,
    policy: Box<dyn TerminationPolicy>,

    /// Backend for the selection step, usually shared with the agents
    backend: Arc<dyn CompletionBackend>,
}

impl std::fmt::Debug for SelectorTeam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectorTeam")
            .field("agents", &self.agents.len())
            .finish_non_exhaustive()
    }
}

impl SelectorTeam {
    /// Create a team. The roster must be non-empty with unique agent names.
    pub fn new(
        agents: Vec<Agent>,
        policy: Box<dyn TerminationPolicy>,
        backend: Arc<dyn CompletionBackend>,
    ) -> Result<Self, TeamError> {
        validate_roster(&agents)?;
        Ok(Self {
            agents,
            policy,
            backend,
        })
    }

    /// Ask the backend to name the next agent. The reply is trimmed and must
    /// match one roster name exactly.
    async fn select_next(&self, conversation: &Conversation) -> Result<usize, TeamError> {
        let roster = self
            .agents
            .iter()
            .map(|a| format!("{}: {}", a.name(), a.description()))
            .collect::<Vec<_>>()
            .join("\n");

        let prompt = format!(
            "You are coordinating a team of agents. Read the conversation and \
             pick the agent best placed to act next.\n\n\
             Agents:\n{roster}\n\n\
             Conversation so far:\n{transcript}\n\
             Respond with the name of exactly one agent from the list and \
             nothing else.",
            transcript = conversation.transcript(),
        );

        let request =
            CompletionRequest::new(vec![PromptMessage::system(prompt)]).with_temperature(0.0);
        let completion = self.backend.complete(request).await?;

        let name = completion.content.trim();
        self.agents
            .iter()
            .position(|a| a.name() == name)
            .ok_or_else(|| TeamError::Selection {
                name: name.to_string(),
            })
    }

    async fn drive(
        &mut self,
        task: &str,
        ctx: &RunContext,
        conversation: &mut Conversation,
    ) -> Result<StopReason, TeamError> {
        let message = Message::user(task);
        ctx.send(TeamEvent::Message(message.clone())).await;
        conversation.push(message);

        if let Some(reason) = self.policy.should_stop(conversation) {
            return Ok(reason);
        }

        loop {
            if ctx.is_cancelled() {
                return Ok(StopReason::Cancelled);
            }

            let index = self.select_next(conversation).await?;
            let agent = &self.agents[index];
            debug!(agent = %agent.name(), "Selector picked next agent");

            for message in agent.take_turn(conversation).await {
                ctx.send(TeamEvent::Message(message.clone())).await;
                conversation.push(message);
            }

            if let Some(reason) = self.policy.should_stop(conversation) {
                return Ok(reason);
            }
        }
    }
}

#[async_trait]
impl Team for SelectorTeam {
    async fn run(&mut self, task: &str, ctx: RunContext) -> Result<TaskResult, TeamError> {
        info!(agents = self.agents.len(), "Starting selector run");

        let mut conversation = Conversation::new();
        let outcome = self.drive(task, &ctx, &mut conversation).await;
        self.policy.reset();

        match outcome {
            Ok(stop_reason) => {
                let result = TaskResult {
                    stop_reason,
                    conversation,
                };
                info!(
                    reason = %result.stop_reason,
                    messages = result.conversation.len(),
                    "Run terminated"
                );
                ctx.send(TeamEvent::Completed(result.clone())).await;
                Ok(result)
            }
            Err(e) => {
                warn!(error = %e, "Run failed");
                ctx.send(TeamEvent::Failed {
                    error: e.to_string(),
                })
                .await;
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::termination::{MaxMessages, OrPolicy, TextMention};
    use crate::test_helpers::*;
    use roundtable_core::tool::ToolRegistry;
    use tokio::sync::mpsc;

    fn agent(name: &str, description: &str, backend: Arc<SequentialMockBackend>) -> Agent {
        Agent::new(
            name,
            description,
            format!("You are {name}."),
            ToolRegistry::new(),
            backend,
        )
    }

    fn default_policy() -> Box<dyn TerminationPolicy> {
        Box::new(OrPolicy::new(vec![
            Box::new(TextMention::new("TERMINATE")),
            Box::new(MaxMessages::new(25)),
        ]))
    }

    #[tokio::test]
    async fn routes_the_turn_to_the_named_agent() {
        let backend = Arc::new(SequentialMockBackend::new(vec![
            text_completion("beta"),
            text_completion("Handled. TERMINATE"),
        ]));
        let roster = vec![
            agent("alpha", "Searches the web", backend.clone()),
            agent("beta", "Performs calculations", backend.clone()),
        ];

        let mut team = SelectorTeam::new(roster, default_policy(), backend.clone()).unwrap();
        let result = team.run("crunch the numbers", RunContext::new()).await.unwrap();

        assert_eq!(result.conversation.len(), 2);
        assert_eq!(result.conversation.messages[1].author.to_string(), "beta");

        // The selection call sees the roster descriptions at temperature 0.
        let selection = &backend.requests()[0];
        assert_eq!(selection.temperature, 0.0);
        assert!(selection.tools.is_empty());
        let prompt = &selection.messages[0].content;
        assert!(prompt.contains("alpha: Searches the web"));
        assert!(prompt.contains("beta: Performs calculations"));
        assert!(prompt.contains("crunch the numbers"));
    }

    #[tokio::test]
    async fn selection_reply_is_trimmed_before_matching() {
        let backend = Arc::new(SequentialMockBackend::new(vec![
            text_completion("  alpha\n"),
            text_completion("Done. TERMINATE"),
        ]));
        let roster = vec![agent("alpha", "Does everything", backend.clone())];

        let mut team = SelectorTeam::new(roster, default_policy(), backend).unwrap();
        let result = team.run("task", RunContext::new()).await.unwrap();

        assert_eq!(result.conversation.messages[1].author.to_string(), "alpha");
    }

    #[tokio::test]
    async fn unknown_name_fails_the_run_with_no_further_messages() {
        let backend = Arc::new(SequentialMockBackend::new(vec![text_completion(
            "GhostAgent",
        )]));
        let roster = vec![
            agent("alpha", "Searches the web", backend.clone()),
            agent("beta", "Performs calculations", backend.clone()),
        ];
        let (tx, mut rx) = mpsc::channel(16);

        let mut team = SelectorTeam::new(roster, default_policy(), backend.clone()).unwrap();
        let err = team
            .run("who handles this?", RunContext::new().with_events(tx))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            TeamError::Selection { ref name } if name == "GhostAgent"
        ));

        // Only the task message went out before the failure event.
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], TeamEvent::Message(_)));
        match &events[1] {
            TeamEvent::Failed { error } => assert!(error.contains("GhostAgent")),
            other => panic!("expected Failed, got {other:?}"),
        }

        // Exactly one backend call: the selection itself.
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn selection_backend_failure_is_fatal() {
        let failing = Arc::new(FailingBackend);
        let roster = vec![agent(
            "alpha",
            "Searches the web",
            Arc::new(SequentialMockBackend::new(vec![])),
        )];

        let mut team = SelectorTeam::new(roster, default_policy(), failing).unwrap();
        let err = team.run("task", RunContext::new()).await.unwrap_err();
        assert!(matches!(err, TeamError::SelectionCall(_)));
    }

    #[tokio::test]
    async fn max_messages_one_stops_before_any_selection() {
        let backend = Arc::new(SequentialMockBackend::new(vec![]));
        let roster = vec![agent("alpha", "Does everything", backend.clone())];

        let mut team = SelectorTeam::new(roster, Box::new(MaxMessages::new(1)), backend.clone())
            .unwrap();
        let result = team.run("task", RunContext::new()).await.unwrap();

        assert_eq!(result.stop_reason, StopReason::MaxMessages { limit: 1 });
        assert_eq!(backend.call_count(), 0);
    }

    #[test]
    fn duplicate_agent_names_are_rejected() {
        let backend = Arc::new(SequentialMockBackend::new(vec![]));
        let roster = vec![
            agent("same", "first", backend.clone()),
            agent("same", "second", backend.clone()),
        ];
        let err = SelectorTeam::new(roster, default_policy(), backend).unwrap_err();
        assert!(matches!(err, TeamError::DuplicateAgent(_)));
    }
}

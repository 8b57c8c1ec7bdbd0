//! Round-robin dispatch: fixed cyclic turn order over the roster.
//!
//! The task enters as the first message, the policy is checked on it, and
//! agents then take turns at index `turn mod N` until the policy fires. A
//! roster of one degenerates to a repeat loop, bounded only by the policy.

use crate::agent::{Agent, validate_roster};
use crate::run::{RunContext, TaskResult, Team, TeamEvent};
use crate::termination::{StopReason, TerminationPolicy};
use async_trait::async_trait;
use roundtable_core::error::TeamError;
use roundtable_core::message::{Conversation, Message};
use tracing::{debug, info};

pub struct RoundRobinTeam {
    agents: Vec<Agent>,
    policy: Box<dyn TerminationPolicy>,
}

impl std::fmt::Debug for RoundRobinTeam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoundRobinTeam")
            .field("agents", &self.agents.len())
            .finish_non_exhaustive()
    }
}

impl RoundRobinTeam {
    /// Create a team. The roster must be non-empty with unique agent names.
    pub fn new(agents: Vec<Agent>, policy: Box<dyn TerminationPolicy>) -> Result<Self, TeamError> {
        validate_roster(&agents)?;
        Ok(Self { agents, policy })
    }

    async fn drive(
        &mut self,
        task: &str,
        ctx: &RunContext,
        conversation: &mut Conversation,
    ) -> StopReason {
        let message = Message::user(task);
        ctx.send(TeamEvent::Message(message.clone())).await;
        conversation.push(message);

        if let Some(reason) = self.policy.should_stop(conversation) {
            return reason;
        }

        let mut turn = 0usize;
        loop {
            if ctx.is_cancelled() {
                return StopReason::Cancelled;
            }

            let agent = &self.agents[turn % self.agents.len()];
            debug!(turn, agent = %agent.name(), "Dispatching turn");

            for message in agent.take_turn(conversation).await {
                ctx.send(TeamEvent::Message(message.clone())).await;
                conversation.push(message);
            }

            if let Some(reason) = self.policy.should_stop(conversation) {
                return reason;
            }
            turn += 1;
        }
    }
}

#[async_trait]
impl Team for RoundRobinTeam {
    async fn run(&mut self, task: &str, ctx: RunContext) -> Result<TaskResult, TeamError> {
        info!(agents = self.agents.len(), "Starting round-robin run");

        let mut conversation = Conversation::new();
        let stop_reason = self.drive(task, &ctx, &mut conversation).await;
        self.policy.reset();

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
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::run::CancelHandle;
    use crate::termination::{MaxMessages, OrPolicy, TextMention};
    use crate::test_helpers::*;
    use roundtable_core::message::Author;
    use roundtable_core::tool::ToolRegistry;
    use std::sync::Arc;
    use tokio::sync::mpsc;

    fn agent(name: &str, backend: Arc<SequentialMockBackend>) -> Agent {
        Agent::new(
            name,
            format!("{name} description"),
            format!("You are {name}."),
            ToolRegistry::new(),
            backend,
        )
    }

    fn authors(conversation: &Conversation) -> Vec<String> {
        conversation
            .messages
            .iter()
            .map(|m| m.author.to_string())
            .collect()
    }

    #[tokio::test]
    async fn visits_agents_in_roster_order_and_wraps() {
        let backend = Arc::new(SequentialMockBackend::new(vec![
            text_completion("first"),
            text_completion("second"),
            text_completion("third"),
            text_completion("fourth"),
        ]));
        let roster = vec![
            agent("alpha", backend.clone()),
            agent("beta", backend.clone()),
            agent("gamma", backend.clone()),
        ];

        let mut team =
            RoundRobinTeam::new(roster, Box::new(MaxMessages::new(5))).unwrap();
        let result = team.run("go", RunContext::new()).await.unwrap();

        assert_eq!(
            authors(&result.conversation),
            vec!["user", "alpha", "beta", "gamma", "alpha"]
        );
        assert_eq!(result.conversation.messages[4].content, "fourth");
    }

    #[tokio::test]
    async fn max_messages_one_stops_before_any_turn() {
        // An empty script panics on any backend call, so this also proves
        // no agent took a turn.
        let backend = Arc::new(SequentialMockBackend::new(vec![]));
        let roster = vec![agent("alpha", backend.clone())];

        let mut team = RoundRobinTeam::new(roster, Box::new(MaxMessages::new(1))).unwrap();
        let result = team.run("just the task", RunContext::new()).await.unwrap();

        assert_eq!(result.stop_reason, StopReason::MaxMessages { limit: 1 });
        assert_eq!(result.conversation.len(), 1);
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn terminate_mention_stops_before_the_message_limit() {
        let backend = Arc::new(SequentialMockBackend::new(vec![text_completion(
            "All done here. TERMINATE",
        )]));
        let roster = vec![agent("alpha", backend)];
        let policy = OrPolicy::new(vec![
            Box::new(TextMention::new("TERMINATE")),
            Box::new(MaxMessages::new(10)),
        ]);

        let mut team = RoundRobinTeam::new(roster, Box::new(policy)).unwrap();
        let result = team.run("wrap up", RunContext::new()).await.unwrap();

        assert!(matches!(
            result.stop_reason,
            StopReason::TextMention { ref marker } if marker == "TERMINATE"
        ));
        assert_eq!(result.conversation.len(), 2);
    }

    #[tokio::test]
    async fn cancellation_before_the_first_turn() {
        let backend = Arc::new(SequentialMockBackend::new(vec![]));
        let roster = vec![agent("alpha", backend)];
        let cancel = CancelHandle::new();
        cancel.cancel();

        let mut team = RoundRobinTeam::new(roster, Box::new(MaxMessages::new(10))).unwrap();
        let result = team
            .run("never runs", RunContext::new().with_cancel(cancel))
            .await
            .unwrap();

        assert_eq!(result.stop_reason, StopReason::Cancelled);
        assert_eq!(result.conversation.len(), 1);
    }

    #[tokio::test]
    async fn forwards_every_message_then_the_terminal_event() {
        let backend = Arc::new(SequentialMockBackend::new(vec![text_completion("hi")]));
        let roster = vec![agent("alpha", backend)];
        let (tx, mut rx) = mpsc::channel(32);

        let mut team = RoundRobinTeam::new(roster, Box::new(MaxMessages::new(2))).unwrap();
        let result = team
            .run("hello", RunContext::new().with_events(tx))
            .await
            .unwrap();

        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }

        assert_eq!(events.len(), result.conversation.len() + 1);
        match &events[0] {
            TeamEvent::Message(m) => {
                assert_eq!(m.author, Author::User);
                assert_eq!(m.content, "hello");
            }
            other => panic!("expected task message first, got {other:?}"),
        }
        assert!(matches!(events.last(), Some(TeamEvent::Completed(_))));
    }

    #[tokio::test]
    async fn policy_is_reset_between_runs() {
        let backend = Arc::new(SequentialMockBackend::new(vec![
            text_completion("TERMINATE"),
            text_completion("TERMINATE"),
        ]));
        let roster = vec![agent("alpha", backend)];
        let policy = OrPolicy::new(vec![
            Box::new(TextMention::new("TERMINATE")),
            Box::new(MaxMessages::new(10)),
        ]);

        let mut team = RoundRobinTeam::new(roster, Box::new(policy)).unwrap();

        let first = team.run("round one", RunContext::new()).await.unwrap();
        assert!(matches!(first.stop_reason, StopReason::TextMention { .. }));

        let second = team.run("round two", RunContext::new()).await.unwrap();
        assert!(matches!(second.stop_reason, StopReason::TextMention { .. }));
        assert_eq!(second.conversation.len(), 2);
    }

    #[test]
    fn empty_roster_is_rejected() {
        let err = RoundRobinTeam::new(vec![], Box::new(MaxMessages::new(1))).unwrap_err();
        assert!(matches!(err, TeamError::EmptyRoster));
    }
}

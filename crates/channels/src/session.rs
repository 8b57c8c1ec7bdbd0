//! Chat session lifecycle: one dispatch run per user message.
//!
//! The session owns no conversation state. Each user message gets a fresh
//! team from the factory, so agent memory never leaks across runs; the
//! transcript surface is the only place history accumulates.

use crate::sink::{DisplayEvent, SinkError, TranscriptSink};
use roundtable_core::error::TeamError;
use roundtable_team::{RunContext, Team, TeamEvent};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Notice delivered when a run stops because its termination policy fired.
pub const TERMINATED_NOTICE: &str = "Termination condition met. Team and agents are reset.";

/// Builds a fresh team for each dispatch run.
pub type TeamFactory = Box<dyn Fn() -> Result<Box<dyn Team>, TeamError> + Send + Sync>;

pub struct ChatSession {
    make_team: TeamFactory,
    sink: Arc<dyn TranscriptSink>,
    run_timeout: Option<Duration>,
}

impl ChatSession {
    pub fn new(make_team: TeamFactory, sink: Arc<dyn TranscriptSink>) -> Self {
        Self {
            make_team,
            sink,
            run_timeout: None,
        }
    }

    /// Abort any run that outlives `timeout` and report it as failed.
    pub fn with_run_timeout(mut self, timeout: Duration) -> Self {
        self.run_timeout = Some(timeout);
        self
    }

    /// Initialize per-session state.
    pub fn on_session_start(&self) {
        info!("Chat session started");
    }

    /// Run exactly one dispatch for a user message. Every produced message
    /// with non-empty content reaches the sink as a display event, followed
    /// by one final notice: terminated, or run failed.
    pub async fn on_user_message(&self, text: &str) -> Result<(), SinkError> {
        let mut team = match (self.make_team)() {
            Ok(team) => team,
            Err(e) => {
                warn!(error = %e, "Team construction failed");
                return self.deliver_failure(&e.to_string()).await;
            }
        };

        let (tx, rx) = mpsc::channel(64);
        let ctx = RunContext::new().with_events(tx);
        let task = text.to_string();
        let handle = tokio::spawn(async move { team.run(&task, ctx).await });

        let pumped = match self.run_timeout {
            Some(limit) => match tokio::time::timeout(limit, self.pump(rx)).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    handle.abort();
                    warn!(timeout_secs = limit.as_secs(), "Run timed out");
                    return self
                        .deliver_failure(&format!(
                            "run timed out after {}s",
                            limit.as_secs()
                        ))
                        .await;
                }
            },
            None => self.pump(rx).await,
        };

        if pumped.is_err() {
            handle.abort();
        } else {
            let _ = handle.await;
        }
        pumped
    }

    /// Forward run events to the sink until the event stream closes.
    async fn pump(&self, mut rx: mpsc::Receiver<TeamEvent>) -> Result<(), SinkError> {
        while let Some(event) = rx.recv().await {
            match event {
                TeamEvent::Message(message) => {
                    if !message.content.is_empty() {
                        self.sink.deliver(DisplayEvent::from_message(&message)).await?;
                    }
                }
                TeamEvent::Completed(_) => {
                    self.sink
                        .deliver(DisplayEvent::new("system", TERMINATED_NOTICE))
                        .await?;
                }
                TeamEvent::Failed { error } => {
                    self.deliver_failure(&error).await?;
                }
            }
        }
        Ok(())
    }

    async fn deliver_failure(&self, error: &str) -> Result<(), SinkError> {
        self.sink
            .deliver(DisplayEvent::new("system", format!("Run failed: {error}")))
            .await
    }
}

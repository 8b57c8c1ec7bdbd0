//! Run-scoped types: the final result, the event stream, and cancellation.

use crate::termination::StopReason;
use async_trait::async_trait;
use roundtable_core::error::TeamError;
use roundtable_core::{Conversation, Message};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;

/// A dispatch loop over a roster. One call is one run: the task message goes
/// in, turns are driven until the termination policy fires, and the terminal
/// event goes out last.
#[async_trait]
pub trait Team: Send {
    async fn run(&mut self, task: &str, ctx: RunContext) -> Result<TaskResult, TeamError>;
}

/// The final record of one dispatch run, emitted exactly once.
#[derive(Debug, Clone)]
pub struct TaskResult {
    /// Why the run stopped
    pub stop_reason: StopReason,

    /// The full conversation the run produced
    pub conversation: Conversation,
}

/// Events a dispatch loop emits as the run progresses. The terminal event
/// (`Completed` or `Failed`) is always sent last.
#[derive(Debug, Clone)]
pub enum TeamEvent {
    /// A message was appended to the conversation
    Message(Message),
    /// The run stopped and produced a result
    Completed(TaskResult),
    /// The run failed before producing a result
    Failed { error: String },
}

/// Cooperative cancellation flag. The caller keeps one half and the loop a
/// clone; the loop checks it at every turn boundary, never mid-call.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. The run stops at the next turn boundary with
    /// reason [`StopReason::Cancelled`].
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Everything one run owns besides the conversation itself: an optional
/// event sender and a cancellation handle, threaded through the loop
/// explicitly rather than stored in ambient session state.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    events: Option<mpsc::Sender<TeamEvent>>,
    cancel: CancelHandle,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward every appended message and the terminal event to `sender`.
    pub fn with_events(mut self, sender: mpsc::Sender<TeamEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    /// Use `cancel` as this run's cancellation flag.
    pub fn with_cancel(mut self, cancel: CancelHandle) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Send an event to the subscriber, if any. A dropped receiver is not an
    /// error; the run carries on without an audience.
    pub async fn send(&self, event: TeamEvent) {
        if let Some(sender) = &self.events {
            let _ = sender.send(event).await;
        }
    }
}

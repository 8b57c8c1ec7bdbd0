//! Termination policies deciding when a dispatch run stops.
//!
//! A policy is checked once after the task message is appended and once per
//! completed turn, never mid-turn. Policies hold per-run state (cursors,
//! latches); the loop resets them when a run ends so the same policy object
//! can drive the next run.

use roundtable_core::Conversation;
use std::fmt;

/// Why a run stopped.
#[derive(Debug, Clone, PartialEq)]
pub enum StopReason {
    /// A message contained the marker text
    TextMention { marker: String },
    /// The conversation reached the message limit
    MaxMessages { limit: usize },
    /// The run was cancelled from outside
    Cancelled,
    /// Every branch of an AND composition has fired
    All(Vec<StopReason>),
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::TextMention { marker } => write!(f, "text mention ({marker:?})"),
            StopReason::MaxMessages { limit } => write!(f, "max messages ({limit})"),
            StopReason::Cancelled => write!(f, "cancelled"),
            StopReason::All(reasons) => {
                write!(f, "all of: ")?;
                for (i, reason) in reasons.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{reason}")?;
                }
                Ok(())
            }
        }
    }
}

/// A predicate over the conversation that decides when the loop must stop.
pub trait TerminationPolicy: Send + Sync {
    /// Check the conversation; `Some(reason)` stops the run.
    fn should_stop(&mut self, conversation: &Conversation) -> Option<StopReason>;

    /// Restore the initial state (cursors, latches) for reuse.
    fn reset(&mut self);
}

/// Fires when any message appended since the last check contains the marker.
/// The match is a case-sensitive substring match; already-checked messages
/// are never rescanned.
pub struct TextMention {
    marker: String,
    cursor: usize,
}

impl TextMention {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            cursor: 0,
        }
    }
}

impl TerminationPolicy for TextMention {
    fn should_stop(&mut self, conversation: &Conversation) -> Option<StopReason> {
        let new_messages = &conversation.messages[self.cursor.min(conversation.len())..];
        self.cursor = conversation.len();

        if new_messages.iter().any(|m| m.content.contains(&self.marker)) {
            Some(StopReason::TextMention {
                marker: self.marker.clone(),
            })
        } else {
            None
        }
    }

    fn reset(&mut self) {
        self.cursor = 0;
    }
}

/// Fires when the total message count reaches the limit. The user's task
/// message counts, so a limit of 1 stops a run before any agent turn.
pub struct MaxMessages {
    limit: usize,
}

impl MaxMessages {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }
}

impl TerminationPolicy for MaxMessages {
    fn should_stop(&mut self, conversation: &Conversation) -> Option<StopReason> {
        if conversation.len() >= self.limit {
            Some(StopReason::MaxMessages { limit: self.limit })
        } else {
            None
        }
    }

    fn reset(&mut self) {}
}

/// Fires when any branch fires, checked left to right.
pub struct OrPolicy {
    policies: Vec<Box<dyn TerminationPolicy>>,
}

impl OrPolicy {
    pub fn new(policies: Vec<Box<dyn TerminationPolicy>>) -> Self {
        Self { policies }
    }
}

impl TerminationPolicy for OrPolicy {
    fn should_stop(&mut self, conversation: &Conversation) -> Option<StopReason> {
        self.policies
            .iter_mut()
            .find_map(|p| p.should_stop(conversation))
    }

    fn reset(&mut self) {
        for policy in &mut self.policies {
            policy.reset();
        }
    }
}

/// Fires once every branch has fired at some point in the run. Each branch's
/// first firing is latched, so branches need not fire on the same check.
pub struct AndPolicy {
    branches: Vec<(Box<dyn TerminationPolicy>, Option<StopReason>)>,
}

impl AndPolicy {
    pub fn new(policies: Vec<Box<dyn TerminationPolicy>>) -> Self {
        Self {
            branches: policies.into_iter().map(|p| (p, None)).collect(),
        }
    }
}

impl TerminationPolicy for AndPolicy {
    fn should_stop(&mut self, conversation: &Conversation) -> Option<StopReason> {
        for (policy, fired) in &mut self.branches {
            if fired.is_none() {
                *fired = policy.should_stop(conversation);
            }
        }

        let reasons: Vec<StopReason> = self
            .branches
            .iter()
            .filter_map(|(_, fired)| fired.clone())
            .collect();

        if !self.branches.is_empty() && reasons.len() == self.branches.len() {
            Some(StopReason::All(reasons))
        } else {
            None
        }
    }

    fn reset(&mut self) {
        for (policy, fired) in &mut self.branches {
            policy.reset();
            *fired = None;
        }
    }
}

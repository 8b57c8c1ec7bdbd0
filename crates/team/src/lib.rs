//! Agents, termination policies, and dispatch loops.
//!
//! A team is a roster of [`Agent`]s driven by a dispatch loop. The loop
//! appends the user's task, lets agents take turns (fixed order for
//! [`RoundRobinTeam`], a backend-picked order for [`SelectorTeam`]), checks
//! the [`TerminationPolicy`] after each turn, and ends the run with a
//! [`TaskResult`]. Every appended message and the terminal outcome stream
//! out as [`TeamEvent`]s; a [`CancelHandle`] aborts between turns.

pub mod agent;
pub mod round_robin;
pub mod run;
pub mod selector;
pub mod termination;

pub use agent::Agent;
pub use round_robin::RoundRobinTeam;
pub use run::{CancelHandle, RunContext, TaskResult, Team, TeamEvent};
pub use selector::SelectorTeam;
pub use termination::{
    AndPolicy, MaxMessages, OrPolicy, StopReason, TerminationPolicy, TextMention,
};

#[cfg(test)]
pub(crate) mod test_helpers;

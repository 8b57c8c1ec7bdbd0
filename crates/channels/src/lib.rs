//! Transcript delivery for Roundtable runs.
//!
//! A [`ChatSession`] owns the lifecycle of one conversation surface: it
//! builds a fresh team for every user message, streams the run's messages
//! to a [`TranscriptSink`], and closes the run with a terminal notice.
//! Sinks are trait-based so the same session logic drives a terminal
//! today and other surfaces later.

pub mod console;
pub mod session;
pub mod sink;

pub use console::ConsoleSink;
pub use session::{ChatSession, TeamFactory, TERMINATED_NOTICE};
pub use sink::{DisplayEvent, SinkError, TranscriptSink};

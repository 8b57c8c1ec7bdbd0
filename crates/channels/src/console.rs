//! Console sink: prints the transcript to stdout.

use crate::sink::{DisplayEvent, SinkError, TranscriptSink};
use async_trait::async_trait;

/// Prints each display event with an author header, one block per event.
pub struct ConsoleSink;

#[async_trait]
impl TranscriptSink for ConsoleSink {
    async fn deliver(&self, event: DisplayEvent) -> Result<(), SinkError> {
        println!("---------- {} ----------", event.author);
        println!("{}", event.content);
        Ok(())
    }
}

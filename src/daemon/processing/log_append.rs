use anyhow::Result;

use crate::log::{event::EventRecord, store::EventLog};

use super::module::EventProcessor;

/// Bridges [ProcessingModule](super::ProcessingModule) and [EventLog] by
/// appending each received event to the local log file.
pub struct LogAppender<L: EventLog> {
    log: L,
}

impl<L: EventLog> LogAppender<L> {
    pub fn new(log: L) -> Self {
        Self { log }
    }
}

impl<L: EventLog> EventProcessor for LogAppender<L> {
    async fn process_next(&mut self, record: EventRecord) -> Result<()> {
        self.log.append(&record).await
    }

    async fn finalize(&mut self) -> Result<()> {
        // Every append already flushes before returning.
        Ok(())
    }
}

use anyhow::Result;
use module::EventProcessor;
use tokio::sync::mpsc::Receiver;
use tracing::{debug, info};

use crate::log::event::EventRecord;

pub mod log_append;
pub mod module;

/// Receives events from the monitor and hands them to a processor. A failed
/// write is fatal: polling on while events get dropped would corrupt every
/// later report.
pub struct ProcessingModule<Processor> {
    receiver: Receiver<EventRecord>,
    processor: Processor,
}

impl<P: EventProcessor> ProcessingModule<P> {
    pub fn new(receiver: Receiver<EventRecord>, processor: P) -> Self {
        Self {
            receiver,
            processor,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        while let Some(record) = self.receiver.recv().await {
            debug!("Persisting event {:?}", record);
            self.processor.process_next(record.clone()).await?;
            info!("Persisted event {:?}", record);
        }

        let result = self.processor.finalize().await;
        self.receiver.close();
        result
    }
}

use anyhow::Result;

use crate::log::event::EventRecord;

/// Represents an event processor. This should realistically be able to
/// abstract over different sinks: local log file, remote server saving.
pub trait EventProcessor {
    fn process_next(&mut self, record: EventRecord)
    -> impl std::future::Future<Output = Result<()>>;

    fn finalize(&mut self) -> impl std::future::Future<Output = Result<()>>;
}

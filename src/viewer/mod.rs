//! Replay side of the event log: aggregation, ranking and the report page.
//! Everything here is rebuilt from scratch on every request; the log file on
//! disk is the only input.

pub mod aggregate;
pub mod page;
pub mod report;
pub mod server;

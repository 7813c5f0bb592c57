//! The append-only event log shared by the collector and the viewer.
//! The basic idea is:
//!  - One CSV file, one record per line, header written on creation.
//!  - The collector is the only writer and only ever appends.
//!  - Readers tolerate a missing file and skip lines they cannot parse.

pub mod event;
pub mod store;

//! Desktop activity tracker for a single user session. A background daemon
//! polls which app and browser tab have focus and whether the user is idle,
//! logging every transition to an append-only CSV file. A small web viewer
//! replays that log into per-day rankings and a timeline.
//!

pub mod cli;
pub mod daemon;
pub mod log;
pub mod probe;
pub mod utils;
pub mod viewer;

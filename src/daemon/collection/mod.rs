pub mod idle;
pub mod monitor;

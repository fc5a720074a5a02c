//! Background maintenance for the search cache (periodic expiry sweep).

pub mod sweeper;
pub mod types;


pub use sweeper::{CacheSweeper, MIN_SWEEP_INTERVAL};
pub use types::SweepReport;

//! Passing game time: advance, wait, sleep and travel

pub mod driver;
pub mod sleep;
pub mod travel;

pub use driver::{advance_time, ensure_upkeep, wait, WaitDuration, TIME_DRIVEN_STATUSES};
pub use sleep::{sleep, SleepReport};
pub use travel::{advance_travel, Arrival, TravelOutcome};

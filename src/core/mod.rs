pub mod calendar;
pub mod config;
pub mod error;
pub mod types;

pub use calendar::{GameClock, GameTime, TimePeriod};
pub use config::{EngineConfig, SleepConfig};
pub use error::{EngineError, Result};
pub use types::{EffectId, LocationId, Minutes, SkillId, MINUTES_PER_DAY, MINUTES_PER_HOUR};

//! Waystone - temporal status and effect engine
//!
//! Applies, ticks and resolves time-scoped character modifiers (fatigue,
//! hunger, encumbrance, buffs and debuffs, travel progress) against mutable
//! character state, driven by arbitrary elapsed-minute jumps.

pub mod catalog;
pub mod character;
pub mod core;
pub mod effects;
pub mod engine;
pub mod status;
pub mod time;

pub use catalog::{DefinitionCache, DefinitionSource, InMemorySource, TomlDirectorySource};
pub use character::CharacterState;
pub use crate::core::{EffectId, EngineConfig, EngineError, Result};
pub use effects::{ActiveEffectView, EffectMessage};
pub use engine::Engine;
pub use time::{SleepReport, TravelOutcome, WaitDuration};

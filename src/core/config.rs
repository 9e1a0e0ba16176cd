//! Engine configuration with documented constants
//!
//! Pacing knobs that are not part of authored effect content live here. The
//! config is owned by the engine instance; nothing reads it from global state.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{EngineError, Result};
use crate::core::types::{EffectId, Minutes, MINUTES_PER_HOUR};

/// Configuration for the time and effect systems
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === WAITING ===
    /// Shortest wait the player may request, in minutes
    pub wait_min_minutes: Minutes,

    /// Longest wait the player may request, in minutes
    ///
    /// Longer stretches go through sleep, which also handles recovery.
    pub wait_max_minutes: Minutes,

    // === SLEEP ===
    pub sleep: SleepConfig,

    // === UPKEEP ===
    /// Effects kept active on every character while time passes
    ///
    /// These are the accumulation drivers (fatigue build-up, hunger drain).
    /// The time driver re-applies one whenever it is missing, unless its
    /// target stat already sits at the bound it pushes toward.
    pub upkeep_effects: Vec<EffectId>,
}

/// Sleep recovery rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SleepConfig {
    /// Minute of day the character wakes (06:00 by default)
    pub wake_minute: Minutes,

    /// Minimum sleep that counts as a full night's rest
    ///
    /// A full night clears fatigue entirely. Going to bed later than
    /// `wake_minute - full_rest_minutes` only earns partial recovery.
    pub full_rest_minutes: Minutes,

    /// Fatigue removed per whole hour of a short sleep
    pub fatigue_per_hour: i32,

    /// Hunger spent over a full night
    pub overnight_hunger: i32,
}

impl Default for SleepConfig {
    fn default() -> Self {
        Self {
            wake_minute: 6 * MINUTES_PER_HOUR,
            full_rest_minutes: 6 * MINUTES_PER_HOUR,
            fatigue_per_hour: 2,
            overnight_hunger: 1,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            wait_min_minutes: 15,
            wait_max_minutes: 6 * MINUTES_PER_HOUR,
            sleep: SleepConfig::default(),
            upkeep_effects: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_upkeep(mut self, effects: impl IntoIterator<Item = impl Into<EffectId>>) -> Self {
        self.upkeep_effects = effects.into_iter().map(Into::into).collect();
        self
    }

    /// Parse a config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate().map_err(EngineError::Config)?;
        Ok(config)
    }

    /// Load a config file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.wait_min_minutes == 0 {
            return Err("wait_min_minutes must be positive".into());
        }

        if self.wait_min_minutes > self.wait_max_minutes {
            return Err(format!(
                "wait_min_minutes ({}) should be <= wait_max_minutes ({})",
                self.wait_min_minutes, self.wait_max_minutes
            ));
        }

        if self.sleep.wake_minute >= 24 * MINUTES_PER_HOUR {
            return Err(format!(
                "sleep.wake_minute ({}) must be a minute of the day",
                self.sleep.wake_minute
            ));
        }

        if self.sleep.fatigue_per_hour < 0 || self.sleep.overnight_hunger < 0 {
            return Err("Sleep recovery amounts must not be negative".into());
        }

        Ok(())
    }
}

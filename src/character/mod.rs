//! Mutable character state the engine operates on
//!
//! `CharacterState` doubles as the save record: the caller's persistence
//! layer owns storage, the engine only mutates the struct in place.

pub mod inventory;
pub mod location;
pub mod stats;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::core::calendar::GameClock;
use crate::core::error::Result;
use crate::core::types::{EffectId, LocationId};
use crate::effects::instance::ActiveEffectInstance;
use crate::status::slots::StatusSlots;

pub use inventory::{Inventory, InventoryItem, DEFAULT_CARRY_CAPACITY};
pub use location::{LocationState, TravelState};
pub use stats::{Stat, ABILITY_NAMES};

/// Fatigue runs from 0 (fresh) to this value (collapsing)
pub const FATIGUE_MAX: i32 = 10;

/// Hunger runs from 0 (starving) to this value (full)
pub const HUNGER_MAX: i32 = 3;

/// Ability score assumed when a character has no entry for it
pub const DEFAULT_ABILITY_SCORE: i32 = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterState {
    pub name: String,
    pub hp: i32,
    pub max_hp: i32,
    pub mana: i32,
    pub max_mana: i32,
    pub fatigue: i32,
    pub hunger: i32,
    #[serde(flatten)]
    pub clock: GameClock,
    #[serde(default)]
    pub abilities: AHashMap<String, i32>,
    /// Applied effect instances in application order
    #[serde(default)]
    pub active_effects: Vec<ActiveEffectInstance>,
    /// Current occupant of each status category
    #[serde(default)]
    pub status: StatusSlots,
    #[serde(default)]
    pub inventory: Inventory,
    #[serde(default)]
    pub location: LocationState,
    #[serde(default)]
    pub discovered_locations: BTreeSet<LocationId>,
    #[serde(default)]
    pub unlocks: BTreeSet<String>,
    /// Stats that are neither vitals nor abilities (reputation, luck, ...)
    #[serde(default)]
    pub counters: BTreeMap<String, i32>,
}

impl CharacterState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hp: 20,
            max_hp: 20,
            mana: 10,
            max_mana: 10,
            fatigue: 0,
            hunger: HUNGER_MAX,
            clock: GameClock::default(),
            abilities: AHashMap::new(),
            active_effects: Vec::new(),
            status: StatusSlots::default(),
            inventory: Inventory::default(),
            location: LocationState::default(),
            discovered_locations: BTreeSet::new(),
            unlocks: BTreeSet::new(),
            counters: BTreeMap::new(),
        }
    }

    pub fn with_ability(mut self, name: &str, score: i32) -> Self {
        self.abilities.insert(name.to_ascii_lowercase(), score);
        self
    }

    /// Load a save record, folding any out-of-range values back into range
    pub fn from_json(json: &str) -> Result<Self> {
        let mut character: CharacterState = serde_json::from_str(json)?;
        character.normalize();
        Ok(character)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn normalize(&mut self) {
        self.clock.normalize();
        self.max_hp = self.max_hp.max(0);
        self.max_mana = self.max_mana.max(0);
        self.hp = self.hp.clamp(0, self.max_hp);
        self.mana = self.mana.clamp(0, self.max_mana);
        self.fatigue = self.fatigue.clamp(0, FATIGUE_MAX);
        self.hunger = self.hunger.clamp(0, HUNGER_MAX);
    }

    /// Base ability score, looked up case-insensitively
    pub fn ability(&self, name: &str) -> i32 {
        self.abilities
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, score)| *score)
            .unwrap_or(DEFAULT_ABILITY_SCORE)
    }

    /// Current base value of a stat, without constant modifiers
    pub fn stat_value(&self, stat: &Stat) -> i32 {
        match stat {
            Stat::Hp => self.hp,
            Stat::Mana => self.mana,
            Stat::Fatigue => self.fatigue,
            Stat::Hunger => self.hunger,
            Stat::WeightCapacity => self.inventory.base_capacity.round() as i32,
            Stat::Ability(name) => self.ability(name),
            Stat::Other(name) => self.counters.get(name).copied().unwrap_or(0),
        }
    }

    /// Inclusive range a stat is clamped to, if it is bounded
    pub fn stat_bounds(&self, stat: &Stat) -> Option<(i32, i32)> {
        match stat {
            Stat::Hp => Some((0, self.max_hp)),
            Stat::Mana => Some((0, self.max_mana)),
            Stat::Fatigue => Some((0, FATIGUE_MAX)),
            Stat::Hunger => Some((0, HUNGER_MAX)),
            _ => None,
        }
    }

    /// Add `delta` to a stat, clamped to its bounds. Returns the change applied.
    pub fn apply_stat_delta(&mut self, stat: &Stat, delta: i32) -> i32 {
        let before = self.stat_value(stat);
        let mut after = before.saturating_add(delta);
        if let Some((min, max)) = self.stat_bounds(stat) {
            after = after.clamp(min, max);
        }

        match stat {
            Stat::Hp => self.hp = after,
            Stat::Mana => self.mana = after,
            Stat::Fatigue => self.fatigue = after,
            Stat::Hunger => self.hunger = after,
            Stat::WeightCapacity => {
                let capacity = self.inventory.base_capacity + delta as f64;
                self.inventory.base_capacity = capacity.max(0.0);
                return self.stat_value(stat) - before;
            }
            Stat::Ability(name) => {
                let key = self
                    .abilities
                    .keys()
                    .find(|key| key.eq_ignore_ascii_case(name))
                    .cloned()
                    .unwrap_or_else(|| name.clone());
                self.abilities.insert(key, after);
            }
            Stat::Other(name) => {
                self.counters.insert(name.clone(), after);
            }
        }

        after - before
    }

    /// True when the stat already sits at the bound a `delta` pushes toward
    pub fn is_at_bound_toward(&self, stat: &Stat, delta: i32) -> bool {
        let Some((min, max)) = self.stat_bounds(stat) else {
            return false;
        };
        let value = self.stat_value(stat);
        match delta.signum() {
            1 => value >= max,
            -1 => value <= min,
            _ => false,
        }
    }

    pub fn has_effect(&self, effect_id: &EffectId) -> bool {
        self.active_effects.iter().any(|i| &i.effect_id == effect_id)
    }

    /// Drop every instance of an effect, returns how many were removed
    pub fn remove_effect_instances(&mut self, effect_id: &EffectId) -> usize {
        let before = self.active_effects.len();
        self.active_effects.retain(|i| &i.effect_id != effect_id);
        before - self.active_effects.len()
    }
}

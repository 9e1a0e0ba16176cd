//! Stat identifiers that modifiers can target

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ability scores recognised as `Stat::Ability`
pub const ABILITY_NAMES: [&str; 6] = [
    "strength",
    "dexterity",
    "constitution",
    "intelligence",
    "wisdom",
    "charisma",
];

/// A character stat a modifier can target
///
/// Parsed case-insensitively from authored content. Names that are neither a
/// vital nor an ability score are kept as `Other` so that constant modifiers
/// on them still show up in aggregates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Stat {
    Hp,
    Mana,
    Fatigue,
    Hunger,
    WeightCapacity,
    Ability(String),
    Other(String),
}

impl Stat {
    pub fn parse(name: &str) -> Self {
        let lower = name.trim().to_ascii_lowercase();
        match lower.as_str() {
            "hp" | "health" => Stat::Hp,
            "mana" => Stat::Mana,
            "fatigue" => Stat::Fatigue,
            "hunger" => Stat::Hunger,
            "weight_capacity" => Stat::WeightCapacity,
            _ if ABILITY_NAMES.contains(&lower.as_str()) => Stat::Ability(lower),
            _ => Stat::Other(lower),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Stat::Hp => "hp",
            Stat::Mana => "mana",
            Stat::Fatigue => "fatigue",
            Stat::Hunger => "hunger",
            Stat::WeightCapacity => "weight_capacity",
            Stat::Ability(name) | Stat::Other(name) => name,
        }
    }
}

impl From<String> for Stat {
    fn from(name: String) -> Self {
        Stat::parse(&name)
    }
}

impl From<&str> for Stat {
    fn from(name: &str) -> Self {
        Stat::parse(name)
    }
}

impl From<Stat> for String {
    fn from(stat: Stat) -> Self {
        stat.name().to_string()
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

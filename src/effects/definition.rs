//! Effect and skill definitions as authored by the content tool
//!
//! Authored records are deserialized into `*Record` types first and then
//! converted into typed definitions. The conversion is where illegal shapes
//! are rejected (a periodic modifier without an interval) and where unknown
//! modifier kinds fall back to constant.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::num::NonZeroU32;

use crate::character::Stat;
use crate::core::error::EngineError;
use crate::core::types::{EffectId, Minutes, SkillId};
use crate::effects::instance::Lifetime;
use crate::status::condition::{Condition, ParseError};
use crate::status::slots::StatusCategory;

/// Presentation category of an effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectCategory {
    Buff,
    Debuff,
    #[default]
    System,
}

/// Modifier kind with the timing data meaningful for that kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierKind {
    /// Applied once, after `delay` minutes
    Instant { delay: Minutes },
    /// Contributes to stat aggregates while the instance exists
    Constant { delay: Minutes },
    /// Fires every `interval` minutes (before skill scaling)
    Periodic {
        delay: Minutes,
        interval: NonZeroU32,
    },
}

impl ModifierKind {
    pub fn delay(&self) -> Minutes {
        match *self {
            ModifierKind::Instant { delay }
            | ModifierKind::Constant { delay }
            | ModifierKind::Periodic { delay, .. } => delay,
        }
    }

    pub fn interval(&self) -> Option<NonZeroU32> {
        match *self {
            ModifierKind::Periodic { interval, .. } => Some(interval),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ModifierKind::Instant { .. } => "instant",
            ModifierKind::Constant { .. } => "constant",
            ModifierKind::Periodic { .. } => "periodic",
        }
    }
}

/// A single stat change carried by an effect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modifier {
    pub kind: ModifierKind,
    pub stat: Stat,
    pub value: i32,
}

impl Modifier {
    pub fn instant(stat: impl Into<Stat>, value: i32) -> Self {
        Self {
            kind: ModifierKind::Instant { delay: 0 },
            stat: stat.into(),
            value,
        }
    }

    pub fn constant(stat: impl Into<Stat>, value: i32) -> Self {
        Self {
            kind: ModifierKind::Constant { delay: 0 },
            stat: stat.into(),
            value,
        }
    }

    pub fn periodic(stat: impl Into<Stat>, value: i32, interval: NonZeroU32) -> Self {
        Self {
            kind: ModifierKind::Periodic { delay: 0, interval },
            stat: stat.into(),
            value,
        }
    }

    pub fn delayed(mut self, minutes: Minutes) -> Self {
        self.kind = match self.kind {
            ModifierKind::Instant { .. } => ModifierKind::Instant { delay: minutes },
            ModifierKind::Constant { .. } => ModifierKind::Constant { delay: minutes },
            ModifierKind::Periodic { interval, .. } => ModifierKind::Periodic {
                delay: minutes,
                interval,
            },
        };
        self
    }

    fn from_record(record: &ModifierRecord, effect_id: &str) -> Result<Self, EngineError> {
        let delay = record.delay;
        let kind = match record.kind.trim().to_ascii_lowercase().as_str() {
            "instant" => ModifierKind::Instant { delay },
            "constant" => ModifierKind::Constant { delay },
            "periodic" => {
                let interval = NonZeroU32::new(record.tick_interval).ok_or_else(|| {
                    EngineError::InvalidDefinition {
                        id: effect_id.to_string(),
                        reason: format!(
                            "periodic modifier on '{}' has no tick interval",
                            record.stat
                        ),
                    }
                })?;
                ModifierKind::Periodic { delay, interval }
            }
            other => {
                tracing::warn!(
                    "Effect '{}': unknown modifier kind '{}', treating as constant",
                    effect_id,
                    other
                );
                ModifierKind::Constant { delay }
            }
        };

        Ok(Self {
            kind,
            stat: Stat::parse(&record.stat),
            value: record.value,
        })
    }
}

/// Authored modifier record (flat, as stored)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModifierRecord {
    pub kind: String,
    pub stat: String,
    pub value: i32,
    #[serde(default)]
    pub delay: Minutes,
    #[serde(default)]
    pub tick_interval: Minutes,
}

/// How an effect leaves the character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemovalType {
    Timed,
    #[default]
    Permanent,
    /// Timed, and also removed as soon as its system check stops holding
    Hybrid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RemovalConfig {
    #[serde(rename = "type", default)]
    pub kind: RemovalType,
    #[serde(default)]
    pub timer_minutes: Minutes,
}

impl RemovalConfig {
    pub fn timed(minutes: Minutes) -> Self {
        Self {
            kind: RemovalType::Timed,
            timer_minutes: minutes,
        }
    }

    /// Lifetime given to every instance created from this definition
    pub fn lifetime(&self) -> Lifetime {
        match self.kind {
            RemovalType::Permanent => Lifetime::Permanent,
            RemovalType::Timed | RemovalType::Hybrid if self.timer_minutes == 0 => {
                Lifetime::Permanent
            }
            RemovalType::Timed | RemovalType::Hybrid => Lifetime::Timed {
                remaining: self.timer_minutes,
                total: self.timer_minutes,
            },
        }
    }
}

/// Threshold check that makes an effect a status effect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemCheck {
    pub stat: String,
    pub operator: String,
    pub threshold: f64,
}

impl SystemCheck {
    pub fn condition(&self) -> Result<Condition, ParseError> {
        Condition::new(&self.stat, &self.operator, self.threshold)
    }

    pub fn category(&self) -> Option<StatusCategory> {
        StatusCategory::from_metric_name(&self.stat)
    }
}

/// Interval (or progress rate) adjustment driven by a skill value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillScaling {
    pub skill: SkillId,
    pub base_level: i32,
    pub max_bonus_levels: i32,
    pub bonus_per_level: f64,
}

/// One row of a symbolic interval table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantLevel {
    /// Lowest stat value this row applies to
    pub at: i32,
    pub effect: EffectId,
}

/// Table that re-resolves a periodic interval from a sibling definition
///
/// The row with the highest `at` not above the character's current `stat`
/// value wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantTable {
    pub stat: Stat,
    pub levels: Vec<VariantLevel>,
}

impl VariantTable {
    pub fn select(&self, value: i32) -> Option<&EffectId> {
        self.levels
            .iter()
            .filter(|level| level.at <= value)
            .max_by_key(|level| level.at)
            .map(|level| &level.effect)
    }
}

/// Authored effect record (as stored by the content tool)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectRecord {
    pub id: EffectId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: EffectCategory,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub silent: bool,
    #[serde(default)]
    pub modifiers: Vec<ModifierRecord>,
    #[serde(default)]
    pub removal: RemovalConfig,
    #[serde(default)]
    pub system_check: Option<SystemCheck>,
    #[serde(default)]
    pub skill_scaling: Option<SkillScaling>,
    #[serde(default)]
    pub terminal_at_bound: bool,
    #[serde(default)]
    pub variants: Option<VariantTable>,
}

/// Validated, immutable effect definition
#[derive(Debug, Clone, PartialEq)]
pub struct EffectDefinition {
    pub id: EffectId,
    pub name: String,
    pub description: String,
    pub category: EffectCategory,
    pub message: String,
    pub silent: bool,
    pub modifiers: Vec<Modifier>,
    pub removal: RemovalConfig,
    pub system_check: Option<SystemCheck>,
    pub skill_scaling: Option<SkillScaling>,
    /// Periodic instances stop once their stat reaches the bound they push toward
    pub terminal_at_bound: bool,
    pub variants: Option<VariantTable>,
}

impl TryFrom<EffectRecord> for EffectDefinition {
    type Error = EngineError;

    fn try_from(record: EffectRecord) -> Result<Self, Self::Error> {
        let modifiers = record
            .modifiers
            .iter()
            .map(|m| Modifier::from_record(m, record.id.as_str()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id: record.id,
            name: record.name,
            description: record.description,
            category: record.category,
            message: record.message,
            silent: record.silent,
            modifiers,
            removal: record.removal,
            system_check: record.system_check,
            skill_scaling: record.skill_scaling,
            terminal_at_bound: record.terminal_at_bound,
            variants: record.variants,
        })
    }
}

impl EffectDefinition {
    pub fn new(id: impl Into<EffectId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            category: EffectCategory::System,
            message: String::new(),
            silent: false,
            modifiers: Vec::new(),
            removal: RemovalConfig::default(),
            system_check: None,
            skill_scaling: None,
            terminal_at_bound: false,
            variants: None,
        }
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn with_removal(mut self, removal: RemovalConfig) -> Self {
        self.removal = removal;
        self
    }

    pub fn modifier(&self, index: usize) -> Option<&Modifier> {
        self.modifiers.get(index)
    }

    /// Status category this definition competes in, if it is a status effect
    pub fn status_category(&self) -> Option<StatusCategory> {
        self.system_check.as_ref().and_then(SystemCheck::category)
    }

    /// Text shown when the effect is applied
    pub fn display_message(&self) -> &str {
        if self.message.is_empty() {
            &self.name
        } else {
            &self.message
        }
    }
}

/// Skill ratio table: how ability scores combine into a skill value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillDefinition {
    pub id: SkillId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Ability name -> weight
    #[serde(default)]
    pub ratios: BTreeMap<String, f64>,
}

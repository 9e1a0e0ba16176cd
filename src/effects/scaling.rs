//! Skill scaling of periodic intervals and progress rates
//!
//! A skill value is a weighted sum of ability scores. Each level above the
//! scaling's base level (up to its cap) stretches an interval, or speeds up a
//! progress rate, by `bonus_per_level`.

use std::num::NonZeroU32;

use crate::catalog::DefinitionCache;
use crate::character::{CharacterState, Stat};
use crate::core::types::SkillId;
use crate::effects::aggregate::ModifierTotals;
use crate::effects::definition::{SkillDefinition, SkillScaling};

/// `round(Σ ability × weight)` over the skill's ratio table
pub fn skill_value(skill: &SkillDefinition, ability: impl Fn(&str) -> i32) -> i32 {
    let total: f64 = skill
        .ratios
        .iter()
        .map(|(name, weight)| ability(name) as f64 * weight)
        .sum();
    total.round() as i32
}

/// Bonus levels earned by a skill value, capped at `max_bonus_levels`
pub fn bonus_levels(scaling: &SkillScaling, skill_value: i32) -> i32 {
    if skill_value <= scaling.base_level {
        return 0;
    }
    (skill_value - scaling.base_level).min(scaling.max_bonus_levels.max(0))
}

/// Multiplier `1 + bonus_levels × bonus_per_level`
pub fn rate_multiplier(scaling: &SkillScaling, skill_value: i32) -> f64 {
    1.0 + bonus_levels(scaling, skill_value) as f64 * scaling.bonus_per_level
}

/// `floor(base × multiplier)`, never below one minute
pub fn scale_interval(base: NonZeroU32, scaling: &SkillScaling, skill_value: i32) -> NonZeroU32 {
    if bonus_levels(scaling, skill_value) == 0 {
        return base;
    }
    // 60 × 1.3 is 78.00000000000001 in f64; nudge so exact products floor cleanly
    let scaled = (base.get() as f64 * rate_multiplier(scaling, skill_value) + 1e-9).floor();
    NonZeroU32::new(scaled.clamp(1.0, u32::MAX as f64) as u32).unwrap_or(base)
}

/// Skill value for a character, or None when the skill table is unavailable.
///
/// Ability scores include constant modifiers from `totals`.
pub fn character_skill_value(
    cache: &DefinitionCache,
    character: &CharacterState,
    totals: &ModifierTotals,
    skill_id: &SkillId,
) -> Option<i32> {
    match cache.skill(skill_id) {
        Ok(skill) => Some(skill_value(&skill, |ability| {
            character.ability(ability) + totals.get(&Stat::parse(ability))
        })),
        Err(e) => {
            tracing::debug!("Skill scaling skipped: {}", e);
            None
        }
    }
}

/// Interval after applying an optional skill scaling
pub fn effective_interval(
    cache: &DefinitionCache,
    character: &CharacterState,
    totals: &ModifierTotals,
    base: NonZeroU32,
    scaling: Option<&SkillScaling>,
) -> NonZeroU32 {
    let Some(scaling) = scaling else {
        return base;
    };
    match character_skill_value(cache, character, totals, &scaling.skill) {
        Some(value) => scale_interval(base, scaling, value),
        None => base,
    }
}

/// Progress multiplier after applying an optional skill scaling
pub fn effective_rate(
    cache: &DefinitionCache,
    character: &CharacterState,
    totals: &ModifierTotals,
    scaling: Option<&SkillScaling>,
) -> f64 {
    let Some(scaling) = scaling else {
        return 1.0;
    };
    character_skill_value(cache, character, totals, &scaling.skill)
        .map(|value| rate_multiplier(scaling, value))
        .unwrap_or(1.0)
}

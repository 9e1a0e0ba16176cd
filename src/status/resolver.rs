//! Threshold-driven status effects, one per category
//!
//! Candidates are tried in a fixed order: exact matches before ranges, then
//! higher thresholds before lower ones. The first satisfied candidate wins
//! the category's slot. Bands meant to trigger below a threshold (`<`, `<=`)
//! should be authored as exact matches so the ordering picks the tightest.

use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use std::sync::Arc;

use crate::catalog::DefinitionCache;
use crate::character::{CharacterState, Stat};
use crate::core::error::Result;
use crate::effects::aggregate::ModifierTotals;
use crate::effects::applicator::apply_definition;
use crate::effects::definition::EffectDefinition;
use crate::effects::message::EffectMessage;
use crate::status::condition::{Condition, DerivedMetrics};
use crate::status::slots::StatusCategory;

/// A status effect definition together with its parsed system check
#[derive(Debug, Clone)]
pub struct StatusCandidate {
    pub definition: Arc<EffectDefinition>,
    /// None when the authored check does not parse; such candidates never win
    pub condition: Option<Condition>,
}

impl StatusCandidate {
    pub fn new(definition: Arc<EffectDefinition>) -> Self {
        let condition = definition.system_check.as_ref().and_then(|check| {
            check
                .condition()
                .map_err(|e| tracing::debug!("{}: unusable system check: {}", definition.id, e))
                .ok()
        });
        Self {
            definition,
            condition,
        }
    }

    pub fn is_satisfied(&self, metrics: &DerivedMetrics) -> bool {
        self.condition
            .is_some_and(|condition| condition.is_satisfied(metrics))
    }

    fn sort_key(&self) -> (bool, bool, Reverse<OrderedFloat<f64>>) {
        match &self.condition {
            Some(condition) => (
                false,
                !condition.operator.is_exact(),
                Reverse(OrderedFloat(condition.threshold)),
            ),
            None => (true, true, Reverse(OrderedFloat(f64::NEG_INFINITY))),
        }
    }
}

/// Sort into evaluation order; ties keep their incoming order
pub fn order_candidates(candidates: &mut [StatusCandidate]) {
    candidates.sort_by_key(StatusCandidate::sort_key);
}

/// Pick the winning status for `category` and install it exclusively.
///
/// When the winner already occupies the slot nothing changes, so repeated
/// calls keep the running instances and their accumulators. Otherwise every
/// instance of every candidate is removed before the winner is applied.
/// Returns the winner's message when a swap applied something.
pub fn resolve_status(
    cache: &DefinitionCache,
    character: &mut CharacterState,
    category: StatusCategory,
) -> Result<Option<EffectMessage>> {
    let candidates = cache.status_candidates(category)?;

    let capacity_bonus = match category {
        StatusCategory::Encumbrance => {
            ModifierTotals::collect(cache, character).get(&Stat::WeightCapacity)
        }
        _ => 0,
    };
    let metrics = DerivedMetrics::capture(character, capacity_bonus);
    let winner = candidates.iter().find(|c| c.is_satisfied(&metrics));
    let winner_id = winner.map(|c| &c.definition.id);
    let unchanged = character.status.get(category) == winner_id;

    // an unchanged occupant keeps its instances; every other candidate goes
    for candidate in candidates.iter() {
        let id = &candidate.definition.id;
        if unchanged && Some(id) == winner_id {
            continue;
        }
        let removed = character.remove_effect_instances(id);
        if unchanged && removed > 0 {
            tracing::debug!("{:?} status: dropped stray {} beside the occupant", category, id);
        }
    }
    if unchanged {
        return Ok(None);
    }

    if let Some(previous) = character.status.set(category, winner_id.cloned()) {
        // occupant from content that no longer lists it as a candidate
        character.remove_effect_instances(&previous);
    }

    Ok(winner.map(|candidate| {
        tracing::debug!("{:?} status -> {}", category, candidate.definition.id);
        apply_definition(&candidate.definition, character)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemorySource;

    const HUNGER_STATUSES: &str = r#"
        [[effect]]
        id = "peckish"
        name = "Peckish"
        system_check = { stat = "hunger", operator = "<=", threshold = 1 }

        [[effect.modifiers]]
        kind = "constant"
        stat = "strength"
        value = -1

        [[effect]]
        id = "starving"
        name = "Starving"
        category = "debuff"
        system_check = { stat = "hunger", operator = "==", threshold = 0 }

        [[effect.modifiers]]
        kind = "periodic"
        stat = "hp"
        value = -1
        tick_interval = 60
    "#;

    fn cache() -> DefinitionCache {
        DefinitionCache::new(InMemorySource::from_toml_str(HUNGER_STATUSES).unwrap())
    }

    #[test]
    fn test_exact_match_precedes_range() {
        let cache = cache();
        let candidates = cache.status_candidates(StatusCategory::Hunger).unwrap();
        assert_eq!(candidates[0].definition.id.as_str(), "starving");

        let mut character = CharacterState::new("Wren");
        character.hunger = 0;
        let message = resolve_status(&cache, &mut character, StatusCategory::Hunger)
            .unwrap()
            .unwrap();
        assert_eq!(message.text, "Starving");
        assert_eq!(character.status.hunger, Some("starving".into()));
    }

    #[test]
    fn test_swap_replaces_previous_occupant() {
        let cache = cache();
        let mut character = CharacterState::new("Wren");
        character.hunger = 1;
        resolve_status(&cache, &mut character, StatusCategory::Hunger).unwrap();
        assert!(character.has_effect(&"peckish".into()));

        character.hunger = 0;
        resolve_status(&cache, &mut character, StatusCategory::Hunger).unwrap();
        assert!(!character.has_effect(&"peckish".into()));
        assert!(character.has_effect(&"starving".into()));
        assert_eq!(character.active_effects.len(), 1);
    }

    #[test]
    fn test_no_winner_clears_slot() {
        let cache = cache();
        let mut character = CharacterState::new("Wren");
        character.hunger = 1;
        resolve_status(&cache, &mut character, StatusCategory::Hunger).unwrap();

        character.hunger = 3;
        let message = resolve_status(&cache, &mut character, StatusCategory::Hunger).unwrap();
        assert!(message.is_none());
        assert!(character.active_effects.is_empty());
        assert_eq!(character.status.hunger, None);
    }

    #[test]
    fn test_unchanged_winner_keeps_accumulator() {
        let cache = cache();
        let mut character = CharacterState::new("Wren");
        character.hunger = 0;
        resolve_status(&cache, &mut character, StatusCategory::Hunger).unwrap();
        character.active_effects[0].tick_accumulator = 40;

        let message = resolve_status(&cache, &mut character, StatusCategory::Hunger).unwrap();
        assert!(message.is_none());
        assert_eq!(character.active_effects.len(), 1);
        assert_eq!(character.active_effects[0].tick_accumulator, 40);
    }

    #[test]
    fn test_unchanged_winner_drops_stray_candidates() {
        let cache = cache();
        let mut character = CharacterState::new("Wren");
        character.hunger = 0;
        resolve_status(&cache, &mut character, StatusCategory::Hunger).unwrap();
        character.active_effects[0].tick_accumulator = 25;

        // applied outside the resolver, beside the occupant
        crate::effects::applicator::apply_effect(&cache, &mut character, &"peckish".into())
            .unwrap();
        assert!(character.has_effect(&"peckish".into()));

        let message = resolve_status(&cache, &mut character, StatusCategory::Hunger).unwrap();
        assert!(message.is_none());
        assert!(!character.has_effect(&"peckish".into()));
        assert_eq!(character.active_effects.len(), 1);
        assert_eq!(character.active_effects[0].tick_accumulator, 25);
    }

    #[test]
    fn test_unparseable_check_never_wins() {
        let cache = DefinitionCache::new(
            InMemorySource::from_toml_str(
                r#"
                [[effect]]
                id = "confused"
                name = "Confused"
                system_check = { stat = "hunger", operator = "=~", threshold = 3 }
                "#,
            )
            .unwrap(),
        );
        let mut character = CharacterState::new("Wren");
        let message = resolve_status(&cache, &mut character, StatusCategory::Hunger).unwrap();
        assert!(message.is_none());
        assert!(character.active_effects.is_empty());
    }
}

//! Instantiating effect definitions against a character

use crate::catalog::DefinitionCache;
use crate::character::CharacterState;
use crate::core::error::Result;
use crate::core::types::EffectId;
use crate::effects::definition::{EffectDefinition, ModifierKind};
use crate::effects::instance::ActiveEffectInstance;
use crate::effects::message::EffectMessage;

/// Apply a named effect to a character.
///
/// Fails with `NotFound` when the id has no definition; the character is left
/// untouched in that case.
pub fn apply_effect(
    cache: &DefinitionCache,
    character: &mut CharacterState,
    effect_id: &EffectId,
) -> Result<EffectMessage> {
    let definition = cache.effect(effect_id)?;
    Ok(apply_definition(&definition, character))
}

/// Apply an already-loaded definition
///
/// Undelayed instants land immediately and leave no instance behind. Every
/// other modifier becomes an instance carrying the definition's lifetime.
pub fn apply_definition(
    definition: &EffectDefinition,
    character: &mut CharacterState,
) -> EffectMessage {
    let lifetime = definition.removal.lifetime();
    let applied_at = character.clock.now();

    for (index, modifier) in definition.modifiers.iter().enumerate() {
        match modifier.kind {
            ModifierKind::Instant { delay: 0 } => {
                let change = character.apply_stat_delta(&modifier.stat, modifier.value);
                tracing::debug!(
                    "{}: instant {} {:+} (applied {:+})",
                    definition.id,
                    modifier.stat,
                    modifier.value,
                    change
                );
            }
            kind => {
                character.active_effects.push(ActiveEffectInstance::new(
                    definition.id.clone(),
                    index,
                    lifetime,
                    kind.delay(),
                    applied_at,
                ));
            }
        }
    }

    EffectMessage::applied(definition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemorySource;
    use crate::character::{Stat, HUNGER_MAX};
    use crate::core::error::EngineError;
    use crate::effects::definition::{Modifier, RemovalConfig};
    use crate::effects::instance::Lifetime;
    use std::num::NonZeroU32;

    #[test]
    fn test_undelayed_instant_leaves_no_instance() {
        let definition =
            EffectDefinition::new("bread", "Bread").with_modifier(Modifier::instant("hunger", 1));
        let mut character = CharacterState::new("Ada");
        character.hunger = 1;

        apply_definition(&definition, &mut character);

        assert_eq!(character.hunger, 2);
        assert!(character.active_effects.is_empty());
    }

    #[test]
    fn test_instant_clamps_extreme_delta() {
        let definition =
            EffectDefinition::new("purge", "Purge").with_modifier(Modifier::instant("hunger", -99));
        let mut character = CharacterState::new("Ada");
        character.hunger = HUNGER_MAX;

        apply_definition(&definition, &mut character);
        assert_eq!(character.hunger, 0);
    }

    #[test]
    fn test_constant_and_periodic_record_instances() {
        let definition = EffectDefinition::new("plague", "Plague")
            .with_modifier(Modifier::constant("strength", -2))
            .with_modifier(Modifier::periodic("hp", -1, NonZeroU32::new(60).unwrap()))
            .with_modifier(Modifier::instant("mana", -1).delayed(30))
            .with_removal(RemovalConfig::timed(240));
        let mut character = CharacterState::new("Ada");

        let message = apply_definition(&definition, &mut character);

        assert_eq!(message.text, "Plague");
        assert_eq!(character.active_effects.len(), 3);
        let indices: Vec<usize> = character
            .active_effects
            .iter()
            .map(|i| i.modifier_index)
            .collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(character.active_effects[2].delay_remaining, 30);
        assert!(character
            .active_effects
            .iter()
            .all(|i| i.lifetime == Lifetime::Timed { remaining: 240, total: 240 }));
        // constant modifiers never rewrite the base stat
        assert_eq!(character.stat_value(&Stat::parse("strength")), 10);
        assert_eq!(character.mana, 10);
    }

    #[test]
    fn test_unknown_effect_is_not_found() {
        let cache = DefinitionCache::new(InMemorySource::new());
        let mut character = CharacterState::new("Ada");
        let result = apply_effect(&cache, &mut character, &EffectId::from("nonexistent"));
        assert!(matches!(result, Err(EngineError::NotFound(_))));
        assert!(character.active_effects.is_empty());
    }
}

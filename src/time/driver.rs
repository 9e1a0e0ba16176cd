//! Time advancement: clock, upkeep, tick pass, status resolution

use serde::{Deserialize, Serialize};

use crate::catalog::DefinitionCache;
use crate::character::CharacterState;
use crate::core::config::EngineConfig;
use crate::core::error::{EngineError, Result};
use crate::core::types::{Minutes, MINUTES_PER_HOUR};
use crate::effects::applicator::apply_definition;
use crate::effects::definition::EffectDefinition;
use crate::effects::message::EffectMessage;
use crate::effects::tick::advance_effects;
use crate::status::resolver::resolve_status;
use crate::status::slots::StatusCategory;

/// Categories re-resolved after every advance. Encumbrance depends on
/// equipment and is resolved by the caller after inventory changes.
pub const TIME_DRIVEN_STATUSES: [StatusCategory; 2] =
    [StatusCategory::Fatigue, StatusCategory::Hunger];

/// Advance a character by `minutes` of game time.
///
/// Returns the visible messages of the pass in order: tick messages first,
/// then status changes.
pub fn advance_time(
    cache: &DefinitionCache,
    config: &EngineConfig,
    character: &mut CharacterState,
    minutes: Minutes,
) -> Vec<EffectMessage> {
    let days = character.clock.advance(minutes);
    if days > 0 {
        tracing::debug!(
            "{}: {} day(s) passed, now {}",
            character.name,
            days,
            character.clock.now()
        );
    }

    ensure_upkeep(cache, config, character);
    let mut messages = advance_effects(cache, character, minutes);
    resolve_into(cache, character, &TIME_DRIVEN_STATUSES, &mut messages);
    messages
}

/// Re-resolve `categories`, appending visible status messages
pub(crate) fn resolve_into(
    cache: &DefinitionCache,
    character: &mut CharacterState,
    categories: &[StatusCategory],
    messages: &mut Vec<EffectMessage>,
) {
    for &category in categories {
        match resolve_status(cache, character, category) {
            Ok(Some(message)) if message.is_visible() => messages.push(message),
            Ok(_) => {}
            Err(e) => tracing::warn!("Could not resolve {:?} status: {}", category, e),
        }
    }
}

/// Make sure every configured upkeep effect is running.
///
/// A missing upkeep effect is re-applied unless it would be evicted straight
/// away because its stats already sit at their terminal bound.
pub fn ensure_upkeep(
    cache: &DefinitionCache,
    config: &EngineConfig,
    character: &mut CharacterState,
) {
    for effect_id in &config.upkeep_effects {
        if character.has_effect(effect_id) {
            continue;
        }
        let definition = match cache.effect(effect_id) {
            Ok(definition) => definition,
            Err(e) => {
                tracing::warn!("Upkeep effect unavailable: {}", e);
                continue;
            }
        };
        if at_terminal_bound(&definition, character) {
            continue;
        }
        tracing::debug!("{}: restarting upkeep {}", character.name, effect_id);
        apply_definition(&definition, character);
    }
}

fn at_terminal_bound(definition: &EffectDefinition, character: &CharacterState) -> bool {
    definition.terminal_at_bound
        && definition
            .modifiers
            .iter()
            .filter(|m| m.kind.interval().is_some())
            .all(|m| character.is_at_bound_toward(&m.stat, m.value))
}

/// How long to wait
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaitDuration {
    Minutes(Minutes),
    Hours(u32),
}

impl WaitDuration {
    pub fn as_minutes(&self) -> Minutes {
        match *self {
            WaitDuration::Minutes(minutes) => minutes,
            WaitDuration::Hours(hours) => hours.saturating_mul(MINUTES_PER_HOUR),
        }
    }
}

/// Let time pass on request, within the configured wait bounds
pub fn wait(
    cache: &DefinitionCache,
    config: &EngineConfig,
    character: &mut CharacterState,
    duration: WaitDuration,
) -> Result<Vec<EffectMessage>> {
    let minutes = duration.as_minutes();
    if minutes < config.wait_min_minutes || minutes > config.wait_max_minutes {
        return Err(EngineError::WaitOutOfRange {
            minutes,
            min: config.wait_min_minutes,
            max: config.wait_max_minutes,
        });
    }
    Ok(advance_time(cache, config, character, minutes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemorySource;
    use crate::character::FATIGUE_MAX;

    const UPKEEP: &str = r#"
        [[effect]]
        id = "weariness"
        name = "Weariness"
        silent = true
        terminal_at_bound = true

        [[effect.modifiers]]
        kind = "periodic"
        stat = "fatigue"
        value = 1
        tick_interval = 120
    "#;

    fn setup() -> (DefinitionCache, EngineConfig) {
        (
            DefinitionCache::new(InMemorySource::from_toml_str(UPKEEP).unwrap()),
            EngineConfig::default().with_upkeep(["weariness"]),
        )
    }

    #[test]
    fn test_wait_bounds_inclusive() {
        let (cache, config) = setup();
        let mut character = CharacterState::new("Pell");

        assert!(wait(&cache, &config, &mut character, WaitDuration::Minutes(15)).is_ok());
        assert!(wait(&cache, &config, &mut character, WaitDuration::Hours(6)).is_ok());
        assert!(matches!(
            wait(&cache, &config, &mut character, WaitDuration::Minutes(14)),
            Err(EngineError::WaitOutOfRange { minutes: 14, .. })
        ));
        assert!(matches!(
            wait(&cache, &config, &mut character, WaitDuration::Minutes(361)),
            Err(EngineError::WaitOutOfRange { .. })
        ));
    }

    #[test]
    fn test_rejected_wait_leaves_clock() {
        let (cache, config) = setup();
        let mut character = CharacterState::new("Pell");
        let before = character.clock.now();
        let _ = wait(&cache, &config, &mut character, WaitDuration::Hours(7));
        assert_eq!(character.clock.now(), before);
    }

    #[test]
    fn test_upkeep_started_on_advance() {
        let (cache, config) = setup();
        let mut character = CharacterState::new("Pell");

        advance_time(&cache, &config, &mut character, 240);
        assert!(character.has_effect(&"weariness".into()));
        assert_eq!(character.fatigue, 2);
    }

    #[test]
    fn test_upkeep_not_restarted_at_bound() {
        let (cache, config) = setup();
        let mut character = CharacterState::new("Pell");
        character.fatigue = FATIGUE_MAX;

        advance_time(&cache, &config, &mut character, 60);
        assert!(!character.has_effect(&"weariness".into()));

        character.fatigue = 4;
        advance_time(&cache, &config, &mut character, 60);
        assert!(character.has_effect(&"weariness".into()));
    }
}

//! Engine facade
//!
//! `Engine` owns the definition cache and the config, and exposes the
//! operations calling layers use. Character state is always passed in by
//! `&mut`; the engine keeps none of it, so one engine serves any number of
//! characters.

use rayon::prelude::*;
use std::path::Path;

use crate::catalog::{DefinitionCache, DefinitionSource, TomlDirectorySource, CONFIG_FILE};
use crate::character::CharacterState;
use crate::core::config::EngineConfig;
use crate::core::error::{EngineError, Result};
use crate::core::types::{EffectId, Minutes};
use crate::effects::applicator;
use crate::effects::display::{self, ActiveEffectView};
use crate::effects::message::EffectMessage;
use crate::status::resolver::resolve_status;
use crate::status::slots::StatusCategory;
use crate::time::{self, SleepReport, TravelOutcome, WaitDuration};

#[derive(Debug)]
pub struct Engine {
    cache: DefinitionCache,
    config: EngineConfig,
}

impl Engine {
    pub fn new(source: impl DefinitionSource + 'static, config: EngineConfig) -> Result<Self> {
        config.validate().map_err(EngineError::Config)?;
        Ok(Self {
            cache: DefinitionCache::new(source),
            config,
        })
    }

    /// Open a content directory; `engine.toml` at its root is the config
    pub fn open(content_dir: impl AsRef<Path>) -> Result<Self> {
        let content_dir = content_dir.as_ref();
        let config_path = content_dir.join(CONFIG_FILE);
        let config = if config_path.is_file() {
            EngineConfig::load(&config_path)?
        } else {
            tracing::debug!("No {} in {}, using defaults", CONFIG_FILE, content_dir.display());
            EngineConfig::default()
        };
        Self::new(TomlDirectorySource::open(content_dir)?, config)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn cache(&self) -> &DefinitionCache {
        &self.cache
    }

    /// Let `minutes` of game time pass for one character
    pub fn advance(&self, character: &mut CharacterState, minutes: Minutes) -> Vec<EffectMessage> {
        time::advance_time(&self.cache, &self.config, character, minutes)
    }

    /// Advance many independent characters by the same amount, in parallel
    pub fn advance_many(
        &self,
        characters: &mut [CharacterState],
        minutes: Minutes,
    ) -> Vec<Vec<EffectMessage>> {
        characters
            .par_iter_mut()
            .map(|character| self.advance(character, minutes))
            .collect()
    }

    pub fn wait(
        &self,
        character: &mut CharacterState,
        duration: WaitDuration,
    ) -> Result<Vec<EffectMessage>> {
        time::wait(&self.cache, &self.config, character, duration)
    }

    pub fn sleep(&self, character: &mut CharacterState) -> SleepReport {
        time::sleep(&self.cache, &self.config, character)
    }

    pub fn apply_effect(
        &self,
        character: &mut CharacterState,
        effect_id: &EffectId,
    ) -> Result<EffectMessage> {
        applicator::apply_effect(&self.cache, character, effect_id)
    }

    /// Remove every instance of an effect; returns how many were removed.
    ///
    /// A removed status effect also vacates its category, so the next
    /// resolution may install it again if its condition still holds.
    pub fn remove_effect(&self, character: &mut CharacterState, effect_id: &EffectId) -> usize {
        let removed = character.remove_effect_instances(effect_id);
        character.status.release(effect_id);
        removed
    }

    pub fn enrich_active_effects(&self, character: &CharacterState) -> Vec<ActiveEffectView> {
        display::enrich_active_effects(&self.cache, character)
    }

    /// Resolve the encumbrance status after inventory or equipment changes
    pub fn resolve_encumbrance(
        &self,
        character: &mut CharacterState,
    ) -> Result<Option<EffectMessage>> {
        resolve_status(&self.cache, character, StatusCategory::Encumbrance)
    }

    pub fn advance_travel(
        &self,
        character: &mut CharacterState,
        minutes: Minutes,
    ) -> TravelOutcome {
        time::advance_travel(&self.cache, character, minutes)
    }

    /// Forget cached definitions after content edits
    pub fn reload_definitions(&self) {
        self.cache.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemorySource;

    const CONTENT: &str = r#"
        [[effect]]
        id = "tired"
        name = "Tired"
        system_check = { stat = "fatigue", operator = ">=", threshold = 5 }

        [[effect.modifiers]]
        kind = "constant"
        stat = "dexterity"
        value = -1
    "#;

    #[test]
    fn test_invalid_config_rejected() {
        let config = EngineConfig {
            wait_min_minutes: 400,
            ..EngineConfig::default()
        };
        let result = Engine::new(InMemorySource::new(), config);
        assert!(matches!(result, Err(EngineError::Config(_))));
    }

    #[test]
    fn test_remove_effect_vacates_status_slot() {
        let engine = Engine::new(
            InMemorySource::from_toml_str(CONTENT).unwrap(),
            EngineConfig::default(),
        )
        .unwrap();
        let mut character = CharacterState::new("Maud");
        character.fatigue = 6;
        engine.advance(&mut character, 1);
        assert_eq!(character.status.fatigue, Some("tired".into()));

        assert_eq!(engine.remove_effect(&mut character, &"tired".into()), 1);
        assert_eq!(character.status.fatigue, None);

        // still tired, so the next pass brings it back
        engine.advance(&mut character, 1);
        assert!(character.has_effect(&"tired".into()));
    }

    #[test]
    fn test_advance_many_matches_sequential() {
        let engine = Engine::new(
            InMemorySource::from_toml_str(CONTENT).unwrap(),
            EngineConfig::default(),
        )
        .unwrap();
        let mut party: Vec<CharacterState> = (0..8)
            .map(|i| {
                let mut character = CharacterState::new(format!("member{}", i));
                character.fatigue = i;
                character
            })
            .collect();

        let messages = engine.advance_many(&mut party, 30);

        assert_eq!(messages.len(), 8);
        for (character, messages) in party.iter().zip(&messages) {
            let tired = character.fatigue >= 5;
            assert_eq!(character.has_effect(&"tired".into()), tired);
            assert_eq!(messages.len(), usize::from(tired));
        }
    }
}

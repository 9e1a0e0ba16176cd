//! Where effect and skill definitions come from

use ahash::AHashMap;
use serde::Deserialize;

use crate::core::error::{EngineError, Result};
use crate::core::types::{EffectId, SkillId};
use crate::effects::definition::{EffectRecord, SkillDefinition};

/// Read-only store of authored definitions, keyed by id
///
/// Implementations may do I/O; the cache in front of them calls each lookup
/// at most once per id until invalidated.
pub trait DefinitionSource: Send + Sync {
    fn effect(&self, id: &EffectId) -> Result<Option<EffectRecord>>;

    fn skill(&self, id: &SkillId) -> Result<Option<SkillDefinition>>;

    /// Every effect id the source knows, in a stable order
    fn effect_ids(&self) -> Result<Vec<EffectId>>;
}

/// Layout of one content file: any mix of effects and skills
#[derive(Debug, Default, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub effect: Vec<EffectRecord>,
    #[serde(default)]
    pub skill: Vec<SkillDefinition>,
}

/// Definitions held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    effects: AHashMap<EffectId, EffectRecord>,
    skills: AHashMap<SkillId, SkillDefinition>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_effect(mut self, record: EffectRecord) -> Self {
        self.effects.insert(record.id.clone(), record);
        self
    }

    pub fn with_skill(mut self, skill: SkillDefinition) -> Self {
        self.skills.insert(skill.id.clone(), skill);
        self
    }

    /// Parse a catalog document with `[[effect]]` and `[[skill]]` tables
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut source = Self::new();
        source.merge_toml_str(content, "<inline>")?;
        Ok(source)
    }

    /// Add every definition of a catalog document; duplicate ids are rejected
    pub fn merge_toml_str(&mut self, content: &str, origin: &str) -> Result<()> {
        let file: CatalogFile = toml::from_str(content)?;

        for record in file.effect {
            if self.effects.contains_key(&record.id) {
                return Err(EngineError::InvalidDefinition {
                    id: record.id.to_string(),
                    reason: format!("duplicate effect id in {}", origin),
                });
            }
            self.effects.insert(record.id.clone(), record);
        }

        for skill in file.skill {
            if self.skills.contains_key(&skill.id) {
                return Err(EngineError::InvalidDefinition {
                    id: skill.id.to_string(),
                    reason: format!("duplicate skill id in {}", origin),
                });
            }
            self.skills.insert(skill.id.clone(), skill);
        }

        Ok(())
    }

    pub fn effect_count(&self) -> usize {
        self.effects.len()
    }

    pub fn skill_count(&self) -> usize {
        self.skills.len()
    }
}

impl DefinitionSource for InMemorySource {
    fn effect(&self, id: &EffectId) -> Result<Option<EffectRecord>> {
        Ok(self.effects.get(id).cloned())
    }

    fn skill(&self, id: &SkillId) -> Result<Option<SkillDefinition>> {
        Ok(self.skills.get(id).cloned())
    }

    fn effect_ids(&self) -> Result<Vec<EffectId>> {
        let mut ids: Vec<EffectId> = self.effects.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"
        [[effect]]
        id = "well_rested"
        name = "Well Rested"
        category = "buff"

        [[effect.modifiers]]
        kind = "constant"
        stat = "wisdom"
        value = 1

        [[skill]]
        id = "endurance"
        name = "Endurance"
        ratios = { constitution = 0.7, strength = 0.3 }
    "#;

    #[test]
    fn test_parses_effects_and_skills() {
        let source = InMemorySource::from_toml_str(CATALOG).unwrap();
        assert_eq!(source.effect_count(), 1);
        assert_eq!(source.skill_count(), 1);

        let record = source.effect(&"well_rested".into()).unwrap().unwrap();
        assert_eq!(record.modifiers.len(), 1);
        let skill = source.skill(&"endurance".into()).unwrap().unwrap();
        assert_eq!(skill.ratios.len(), 2);
    }

    #[test]
    fn test_missing_id_is_none() {
        let source = InMemorySource::new();
        assert!(source.effect(&"nothing".into()).unwrap().is_none());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut source = InMemorySource::from_toml_str(CATALOG).unwrap();
        let result = source.merge_toml_str(CATALOG, "again.toml");
        assert!(matches!(result, Err(EngineError::InvalidDefinition { .. })));
    }
}

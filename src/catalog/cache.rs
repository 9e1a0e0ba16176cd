//! Read-through definition cache
//!
//! Definitions are converted from their authored records once and shared as
//! `Arc`s. The cache is owned by an engine instance and is safe to share
//! across threads, so independent characters can tick concurrently.

use ahash::AHashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::catalog::source::DefinitionSource;
use crate::core::error::{EngineError, Result};
use crate::core::types::{EffectId, SkillId};
use crate::effects::definition::{EffectDefinition, SkillDefinition};
use crate::status::resolver::{order_candidates, StatusCandidate};
use crate::status::slots::StatusCategory;

pub struct DefinitionCache {
    source: Box<dyn DefinitionSource>,
    effects: RwLock<AHashMap<EffectId, Arc<EffectDefinition>>>,
    skills: RwLock<AHashMap<SkillId, Arc<SkillDefinition>>>,
    /// Ordered status candidates per category
    statuses: RwLock<AHashMap<StatusCategory, Arc<[StatusCandidate]>>>,
}

impl DefinitionCache {
    pub fn new(source: impl DefinitionSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            effects: RwLock::new(AHashMap::new()),
            skills: RwLock::new(AHashMap::new()),
            statuses: RwLock::new(AHashMap::new()),
        }
    }

    /// Look up an effect definition, loading it on first use
    pub fn effect(&self, id: &EffectId) -> Result<Arc<EffectDefinition>> {
        if let Some(found) = self
            .effects
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
        {
            return Ok(Arc::clone(found));
        }

        let record = self
            .source
            .effect(id)?
            .ok_or_else(|| EngineError::NotFound(id.clone()))?;
        let definition = Arc::new(EffectDefinition::try_from(record)?);

        let mut effects = self.effects.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(effects.entry(id.clone()).or_insert(definition)))
    }

    /// Look up a skill ratio table, loading it on first use
    pub fn skill(&self, id: &SkillId) -> Result<Arc<SkillDefinition>> {
        if let Some(found) = self
            .skills
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
        {
            return Ok(Arc::clone(found));
        }

        let skill = self
            .source
            .skill(id)?
            .ok_or_else(|| EngineError::SkillNotFound(id.clone()))?;

        let mut skills = self.skills.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(skills.entry(id.clone()).or_insert(Arc::new(skill))))
    }

    /// Status effects competing in `category`, in evaluation order
    ///
    /// Definitions that fail to load are skipped with a warning.
    pub fn status_candidates(&self, category: StatusCategory) -> Result<Arc<[StatusCandidate]>> {
        if let Some(found) = self
            .statuses
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&category)
        {
            return Ok(Arc::clone(found));
        }

        let mut candidates = Vec::new();
        for id in self.source.effect_ids()? {
            match self.effect(&id) {
                Ok(definition) if definition.status_category() == Some(category) => {
                    candidates.push(StatusCandidate::new(definition));
                }
                Ok(_) => {}
                Err(e) => tracing::warn!("Skipping status candidate {}: {}", id, e),
            }
        }
        order_candidates(&mut candidates);
        tracing::debug!("{} status candidates for {:?}", candidates.len(), category);

        let candidates: Arc<[StatusCandidate]> = candidates.into();
        let mut statuses = self.statuses.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(statuses.entry(category).or_insert(candidates)))
    }

    /// Drop everything loaded so far; the next lookups go back to the source
    pub fn invalidate(&self) {
        self.effects
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.skills
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.statuses
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl std::fmt::Debug for DefinitionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let effects = self.effects.read().map(|m| m.len()).unwrap_or(0);
        let skills = self.skills.read().map(|m| m.len()).unwrap_or(0);
        f.debug_struct("DefinitionCache")
            .field("effects", &effects)
            .field("skills", &skills)
            .finish()
    }
}

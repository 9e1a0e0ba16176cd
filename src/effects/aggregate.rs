//! On-demand totals of constant modifiers

use ahash::AHashMap;

use crate::catalog::DefinitionCache;
use crate::character::{CharacterState, Stat};
use crate::effects::definition::ModifierKind;

/// Sum of active constant modifiers per stat
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModifierTotals {
    totals: AHashMap<Stat, i32>,
}

impl ModifierTotals {
    /// Collect totals over every non-delayed constant instance.
    ///
    /// Instances whose definition can no longer be resolved contribute nothing;
    /// the tick engine drops them on its next pass.
    pub fn collect(cache: &DefinitionCache, character: &CharacterState) -> Self {
        let mut totals: AHashMap<Stat, i32> = AHashMap::new();
        for instance in character.active_effects.iter().filter(|i| !i.is_delayed()) {
            let Ok(definition) = cache.effect(&instance.effect_id) else {
                continue;
            };
            let Some(modifier) = definition.modifier(instance.modifier_index) else {
                continue;
            };
            if let ModifierKind::Constant { .. } = modifier.kind {
                let entry = totals.entry(modifier.stat.clone()).or_insert(0);
                *entry = entry.saturating_add(modifier.value);
            }
        }
        Self { totals }
    }

    pub fn get(&self, stat: &Stat) -> i32 {
        self.totals.get(stat).copied().unwrap_or(0)
    }
}

/// Total of active constant modifiers on one stat
pub fn stat_modifier_total(
    cache: &DefinitionCache,
    character: &CharacterState,
    stat: &Stat,
) -> i32 {
    ModifierTotals::collect(cache, character).get(stat)
}

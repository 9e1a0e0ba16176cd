//! Read-only projection of active effects for presentation layers

use serde::Serialize;

use crate::catalog::DefinitionCache;
use crate::character::CharacterState;
use crate::core::types::{EffectId, Minutes};
use crate::effects::aggregate::ModifierTotals;
use crate::effects::definition::{EffectCategory, ModifierKind};
use crate::effects::tick::periodic_interval;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModifierView {
    pub kind: &'static str,
    pub stat: String,
    pub value: i32,
    /// Interval the modifier currently fires at, for periodic modifiers
    pub effective_interval: Option<Minutes>,
    pub delay_remaining: Minutes,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveEffectView {
    pub effect_id: EffectId,
    pub name: String,
    pub description: String,
    pub category: EffectCategory,
    /// None for permanent effects
    pub remaining_minutes: Option<Minutes>,
    pub modifiers: Vec<ModifierView>,
}

/// One view per active effect, in the order effects were first applied.
///
/// Instances whose definition can no longer be found are left out.
pub fn enrich_active_effects(
    cache: &DefinitionCache,
    character: &CharacterState,
) -> Vec<ActiveEffectView> {
    let totals = ModifierTotals::collect(cache, character);
    let mut views: Vec<ActiveEffectView> = Vec::new();

    for instance in &character.active_effects {
        let Ok(definition) = cache.effect(&instance.effect_id) else {
            continue;
        };
        let Some(modifier) = definition.modifier(instance.modifier_index) else {
            continue;
        };

        let effective_interval = match modifier.kind {
            ModifierKind::Periodic { interval, .. } => Some(
                periodic_interval(
                    cache,
                    character,
                    &totals,
                    &definition,
                    instance.modifier_index,
                    interval,
                )
                .get(),
            ),
            _ => None,
        };
        let modifier_view = ModifierView {
            kind: modifier.kind.name(),
            stat: modifier.stat.name().to_string(),
            value: modifier.value,
            effective_interval,
            delay_remaining: instance.delay_remaining,
        };

        match views.iter_mut().find(|view| view.effect_id == instance.effect_id) {
            Some(view) => {
                let remaining = instance.lifetime.remaining();
                view.remaining_minutes = match (view.remaining_minutes, remaining) {
                    (Some(a), Some(b)) => Some(a.max(b)),
                    (a, b) => a.or(b),
                };
                view.modifiers.push(modifier_view);
            }
            None => views.push(ActiveEffectView {
                effect_id: instance.effect_id.clone(),
                name: definition.name.clone(),
                description: definition.description.clone(),
                category: definition.category,
                remaining_minutes: instance.lifetime.remaining(),
                modifiers: vec![modifier_view],
            }),
        }
    }

    views
}

//! Advancing active effect instances by an elapsed-minute delta
//!
//! One pass handles any jump size, from a single action to a night's sleep:
//! periodic modifiers fire once per whole effective interval banked in their
//! accumulator, so a large delta fires them several times in one call.
//!
//! Delay handling is minute-granular. When a delay runs out inside a call,
//! the rest of the instance's processing sees the full delta, not the part of
//! it left after the delay.

use std::num::NonZeroU32;

use crate::catalog::DefinitionCache;
use crate::character::{CharacterState, Stat};
use crate::core::error::{EngineError, Result};
use crate::core::types::{EffectId, Minutes};
use crate::effects::aggregate::ModifierTotals;
use crate::effects::definition::{EffectDefinition, ModifierKind, RemovalType};
use crate::effects::instance::ActiveEffectInstance;
use crate::effects::message::EffectMessage;
use crate::effects::scaling::effective_interval;
use crate::status::condition::DerivedMetrics;

/// What a single instance did during one pass
#[derive(Debug, Default)]
struct InstanceTick {
    evicted: bool,
    /// Fire or landing message
    message: Option<EffectMessage>,
    /// Set when the instance ran out or its hybrid check failed
    expiry: Option<EffectMessage>,
}

/// Advance every active instance by `minutes`.
///
/// Returns visible messages in instance order. Instances whose definition or
/// modifier no longer exists are dropped with a warning; they never stop the
/// pass for the others.
pub fn advance_effects(
    cache: &DefinitionCache,
    character: &mut CharacterState,
    minutes: Minutes,
) -> Vec<EffectMessage> {
    // skill values and capacity are evaluated against the state at pass start
    let totals = ModifierTotals::collect(cache, character);
    let instances = std::mem::take(&mut character.active_effects);
    let mut kept = Vec::with_capacity(instances.len());
    let mut messages = Vec::new();
    let mut expired: Vec<EffectId> = Vec::new();
    let mut evicted: Vec<EffectId> = Vec::new();

    for mut instance in instances {
        match tick_instance(cache, character, &totals, &mut instance, minutes) {
            Ok(tick) => {
                messages.extend(tick.message);
                if let Some(expiry) = tick.expiry {
                    if !expired.contains(&instance.effect_id) {
                        expired.push(instance.effect_id.clone());
                        messages.push(expiry);
                    }
                }
                if tick.evicted {
                    evicted.push(instance.effect_id);
                } else {
                    kept.push(instance);
                }
            }
            Err(e) => {
                tracing::warn!(
                    "Dropping active effect {}#{}: {}",
                    instance.effect_id,
                    instance.modifier_index,
                    e
                );
                evicted.push(instance.effect_id);
            }
        }
    }

    character.active_effects = kept;

    // a slot is vacated once its occupant has no instances left, however they went
    evicted.sort();
    evicted.dedup();
    for effect_id in &evicted {
        if !character.has_effect(effect_id) {
            if let Some(category) = character.status.release(effect_id) {
                tracing::debug!("{} left the {:?} status slot", effect_id, category);
            }
        }
    }

    messages.retain(EffectMessage::is_visible);
    messages
}

fn tick_instance(
    cache: &DefinitionCache,
    character: &mut CharacterState,
    totals: &ModifierTotals,
    instance: &mut ActiveEffectInstance,
    minutes: Minutes,
) -> Result<InstanceTick> {
    let definition = cache.effect(&instance.effect_id)?;
    let modifier = definition
        .modifier(instance.modifier_index)
        .ok_or_else(|| EngineError::InvalidReference {
            effect: instance.effect_id.clone(),
            index: instance.modifier_index,
        })?;
    let mut tick = InstanceTick::default();

    // 1. Delay
    if instance.delay_remaining > 0 {
        if instance.delay_remaining > minutes {
            instance.delay_remaining -= minutes;
            return Ok(tick);
        }
        instance.delay_remaining = 0;
    }

    // 2. Modifier resolution
    match modifier.kind {
        ModifierKind::Instant { .. } => {
            let change = character.apply_stat_delta(&modifier.stat, modifier.value);
            tick.evicted = true;
            tick.message = Some(EffectMessage::landed(&definition, modifier.stat.name(), change));
            return Ok(tick);
        }
        ModifierKind::Periodic { interval, .. } => {
            let effective = periodic_interval(
                cache,
                character,
                totals,
                &definition,
                instance.modifier_index,
                interval,
            )
            .get();
            instance.tick_accumulator = instance.tick_accumulator.saturating_add(minutes);
            let fires = instance.tick_accumulator / effective;
            instance.tick_accumulator -= fires * effective;

            if fires > 0 {
                // repeated same-sign deltas clamp exactly like one combined delta
                let combined = modifier
                    .value
                    .saturating_mul(i32::try_from(fires).unwrap_or(i32::MAX));
                let change = character.apply_stat_delta(&modifier.stat, combined);
                tracing::debug!(
                    "{}: fired {} x{} (interval {}m, applied {:+})",
                    definition.id,
                    modifier.stat,
                    fires,
                    effective,
                    change
                );
                if change != 0 {
                    tick.message = Some(EffectMessage::fired(
                        &definition,
                        modifier.stat.name(),
                        change,
                        fires,
                    ));
                }
            }
        }
        ModifierKind::Constant { .. } => {}
    }

    // 3. Duration
    if instance.lifetime.consume(minutes) {
        tick.evicted = true;
        tick.expiry = Some(EffectMessage::expired(&definition));
        return Ok(tick);
    }

    // 4. Terminal conditions
    if definition.terminal_at_bound
        && modifier.kind.interval().is_some()
        && character.is_at_bound_toward(&modifier.stat, modifier.value)
    {
        tracing::debug!("{}: {} reached its bound, evicting", definition.id, modifier.stat);
        tick.evicted = true;
        return Ok(tick);
    }

    if definition.removal.kind == RemovalType::Hybrid {
        if let Some(check) = &definition.system_check {
            let metrics = DerivedMetrics::capture(character, totals.get(&Stat::WeightCapacity));
            let holds = check
                .condition()
                .map(|condition| condition.is_satisfied(&metrics))
                .unwrap_or(false);
            if !holds {
                tick.evicted = true;
                tick.expiry = Some(EffectMessage::expired(&definition));
            }
        }
    }

    Ok(tick)
}

/// Interval a periodic modifier fires at right now, after variant lookup and
/// skill scaling
pub(crate) fn periodic_interval(
    cache: &DefinitionCache,
    character: &CharacterState,
    totals: &ModifierTotals,
    definition: &EffectDefinition,
    modifier_index: usize,
    own: NonZeroU32,
) -> NonZeroU32 {
    if let Some(variants) = &definition.variants {
        if let Some(sibling_id) = variants.select(character.stat_value(&variants.stat)) {
            match cache.effect(sibling_id) {
                Ok(sibling) => {
                    if let Some(interval) = sibling
                        .modifier(modifier_index)
                        .and_then(|m| m.kind.interval())
                    {
                        let scaling = sibling
                            .skill_scaling
                            .as_ref()
                            .or(definition.skill_scaling.as_ref());
                        return effective_interval(cache, character, totals, interval, scaling);
                    }
                    tracing::debug!(
                        "{}: variant {} has no periodic modifier at index {}",
                        definition.id,
                        sibling_id,
                        modifier_index
                    );
                }
                Err(e) => tracing::debug!("{}: variant lookup failed: {}", definition.id, e),
            }
        }
    }

    effective_interval(cache, character, totals, own, definition.skill_scaling.as_ref())
}

//! Progress across environment locations
//!
//! Crossing an environment (a road, a forest) takes `total_minutes` for an
//! unskilled traveller; a travel skill speeds it up through the same scaling
//! primitive that stretches periodic intervals. Arrival happens once, when the
//! completion fraction reaches 1.

use serde::Serialize;

use crate::catalog::DefinitionCache;
use crate::character::CharacterState;
use crate::core::types::{LocationId, Minutes};
use crate::effects::aggregate::ModifierTotals;
use crate::effects::scaling::effective_rate;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Arrival {
    pub destination: LocationId,
    /// First time the character has reached this location
    pub first_visit: bool,
    /// Content keys newly unlocked by this arrival
    pub unlocked: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TravelOutcome {
    NotTraveling,
    /// The journey is paused; time passed without progress
    Stopped { progress: f64 },
    InProgress { progress: f64 },
    Arrived(Arrival),
}

/// Advance the current journey by `minutes`.
pub fn advance_travel(
    cache: &DefinitionCache,
    character: &mut CharacterState,
    minutes: Minutes,
) -> TravelOutcome {
    let Some(travel) = character.location.travel.as_ref() else {
        return TravelOutcome::NotTraveling;
    };
    if character.location.travel_stopped {
        return TravelOutcome::Stopped {
            progress: travel.progress,
        };
    }

    let gain = if travel.total_minutes == 0 {
        1.0
    } else {
        let totals = ModifierTotals::collect(cache, character);
        let multiplier = effective_rate(cache, character, &totals, travel.scaling.as_ref());
        minutes as f64 / travel.total_minutes as f64 * multiplier
    };

    let Some(travel) = character.location.travel.as_mut() else {
        return TravelOutcome::NotTraveling;
    };
    travel.progress += gain;
    // float noise from fractional steps must not hold an arrival back
    if travel.progress + 1e-9 < 1.0 {
        return TravelOutcome::InProgress {
            progress: travel.progress,
        };
    }

    arrive(character)
}

fn arrive(character: &mut CharacterState) -> TravelOutcome {
    let Some(travel) = character.location.travel.take() else {
        return TravelOutcome::NotTraveling;
    };

    character.location.location = travel.destination.clone();
    character.location.district = travel.destination_district;
    character.location.building = None;
    character.location.travel_stopped = false;

    let first_visit = character
        .discovered_locations
        .insert(travel.destination.clone());
    let unlocked: Vec<String> = travel
        .arrival_unlocks
        .into_iter()
        .filter(|key| character.unlocks.insert(key.clone()))
        .collect();

    tracing::info!(
        "{} arrived at {}{}",
        character.name,
        travel.destination,
        if first_visit { " (first visit)" } else { "" }
    );

    TravelOutcome::Arrived(Arrival {
        destination: travel.destination,
        first_visit,
        unlocked,
    })
}

//! Sleeping until the wake hour

use serde::Serialize;

use crate::catalog::DefinitionCache;
use crate::character::{CharacterState, Stat};
use crate::core::calendar::GameTime;
use crate::core::config::EngineConfig;
use crate::core::types::{Minutes, MINUTES_PER_HOUR};
use crate::effects::message::EffectMessage;
use crate::time::driver::{advance_time, resolve_into, TIME_DRIVEN_STATUSES};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SleepReport {
    pub minutes_slept: Minutes,
    /// Slept long enough for a full night's recovery
    pub full_rest: bool,
    pub fatigue_recovered: i32,
    pub hunger_spent: i32,
    pub woke_at: GameTime,
    pub messages: Vec<EffectMessage>,
}

/// Sleep until the configured wake minute, then recover.
///
/// Already at the wake minute means sleeping a full day. Time passes through
/// the normal driver, so effects tick while asleep; recovery is applied on
/// waking and statuses are re-resolved against the rested character.
pub fn sleep(
    cache: &DefinitionCache,
    config: &EngineConfig,
    character: &mut CharacterState,
) -> SleepReport {
    let rules = &config.sleep;
    let minutes = character.clock.minutes_until(rules.wake_minute);
    let mut messages = advance_time(cache, config, character, minutes);

    let full_rest = minutes >= rules.full_rest_minutes;
    let (fatigue_change, hunger_change) = if full_rest {
        let current = character.fatigue;
        let fatigue = character.apply_stat_delta(&Stat::Fatigue, -current);
        let hunger = character.apply_stat_delta(&Stat::Hunger, -rules.overnight_hunger);
        (fatigue, hunger)
    } else {
        let hours = (minutes / MINUTES_PER_HOUR) as i32;
        let recovered = rules.fatigue_per_hour.saturating_mul(hours);
        let fatigue = character.apply_stat_delta(&Stat::Fatigue, -recovered);
        (fatigue, 0)
    };

    resolve_into(cache, character, &TIME_DRIVEN_STATUSES, &mut messages);

    tracing::debug!(
        "{} slept {}m (full rest: {}), fatigue {:+}, hunger {:+}",
        character.name,
        minutes,
        full_rest,
        fatigue_change,
        hunger_change
    );

    SleepReport {
        minutes_slept: minutes,
        full_rest,
        fatigue_recovered: -fatigue_change,
        hunger_spent: -hunger_change,
        woke_at: character.clock.now(),
        messages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemorySource;
    use crate::core::calendar::GameClock;

    fn sleeper(day: u32, minute: Minutes) -> CharacterState {
        let mut character = CharacterState::new("Odo");
        character.clock = GameClock::new(day, minute);
        character.fatigue = 9;
        character.hunger = 3;
        character
    }

    #[test]
    fn test_early_bedtime_is_full_rest() {
        let cache = DefinitionCache::new(InMemorySource::new());
        let config = EngineConfig::default();
        // 22:00 -> 06:00 is eight hours
        let mut character = sleeper(2, 22 * 60);

        let report = sleep(&cache, &config, &mut character);

        assert_eq!(report.minutes_slept, 480);
        assert!(report.full_rest);
        assert_eq!(character.fatigue, 0);
        assert_eq!(character.hunger, 2);
        assert_eq!(report.woke_at, GameTime { day: 3, minute: 360 });
    }

    #[test]
    fn test_late_bedtime_recovers_per_hour() {
        let cache = DefinitionCache::new(InMemorySource::new());
        let config = EngineConfig::default();
        // 02:30 -> 06:00 is three whole hours and a half
        let mut character = sleeper(2, 150);

        let report = sleep(&cache, &config, &mut character);

        assert_eq!(report.minutes_slept, 210);
        assert!(!report.full_rest);
        assert_eq!(report.fatigue_recovered, 6);
        assert_eq!(character.fatigue, 3);
        assert_eq!(character.hunger, 3);
        assert_eq!(report.hunger_spent, 0);
    }

    #[test]
    fn test_sleep_at_wake_time_lasts_a_day() {
        let cache = DefinitionCache::new(InMemorySource::new());
        let config = EngineConfig::default();
        let mut character = sleeper(1, 360);

        let report = sleep(&cache, &config, &mut character);
        assert_eq!(report.minutes_slept, 1440);
        assert_eq!(character.clock.current_day(), 2);
        assert_eq!(character.clock.time_of_day(), 360);
    }
}

//! Game clock for minute-granularity time tracking
//!
//! Time of day is kept in minutes past midnight; advancing past midnight rolls
//! over into the next day, any number of days in a single call.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::types::{Minutes, MINUTES_PER_DAY, MINUTES_PER_HOUR};

/// Time of day periods used for flavour text and bedtime checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimePeriod {
    Morning,    // 06:00-12:00
    Afternoon,  // 12:00-18:00
    Evening,    // 18:00-22:00
    Night,      // 22:00-06:00
}

impl TimePeriod {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=11 => TimePeriod::Morning,
            12..=17 => TimePeriod::Afternoon,
            18..=21 => TimePeriod::Evening,
            _ => TimePeriod::Night, // 22-23, 0-5
        }
    }
}

/// A point in game time; used as a diagnostic snapshot on effect instances
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct GameTime {
    pub day: u32,
    pub minute: Minutes,
}

impl fmt::Display for GameTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Day {}, {:02}:{:02}",
            self.day,
            self.minute / MINUTES_PER_HOUR,
            self.minute % MINUTES_PER_HOUR
        )
    }
}

/// Clock tracks the current day and minute of day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameClock {
    time_of_day: Minutes,
    current_day: u32,
}

impl GameClock {
    /// Create a clock, folding an oversized minute count into whole days
    pub fn new(current_day: u32, time_of_day: Minutes) -> Self {
        let mut clock = Self {
            time_of_day: 0,
            current_day,
        };
        clock.advance(time_of_day);
        clock
    }

    /// Advance by `minutes`, returning the number of day boundaries crossed
    pub fn advance(&mut self, minutes: Minutes) -> u32 {
        let total = self.time_of_day as u64 + minutes as u64;
        let days = (total / MINUTES_PER_DAY as u64) as u32;
        self.time_of_day = (total % MINUTES_PER_DAY as u64) as Minutes;
        self.current_day = self.current_day.saturating_add(days);
        days
    }

    pub fn time_of_day(&self) -> Minutes {
        self.time_of_day
    }

    pub fn current_day(&self) -> u32 {
        self.current_day
    }

    pub fn hour(&self) -> u32 {
        self.time_of_day / MINUTES_PER_HOUR
    }

    pub fn current_time_period(&self) -> TimePeriod {
        TimePeriod::from_hour(self.hour())
    }

    pub fn now(&self) -> GameTime {
        GameTime {
            day: self.current_day,
            minute: self.time_of_day,
        }
    }

    /// Minutes until the clock next reads `minute_of_day`.
    ///
    /// Returns a full day when the clock already reads that minute.
    pub fn minutes_until(&self, minute_of_day: Minutes) -> Minutes {
        let target = minute_of_day % MINUTES_PER_DAY;
        match (target + MINUTES_PER_DAY - self.time_of_day) % MINUTES_PER_DAY {
            0 => MINUTES_PER_DAY,
            delta => delta,
        }
    }

    /// Fold a deserialized out-of-range time of day back into range
    pub fn normalize(&mut self) {
        if self.time_of_day >= MINUTES_PER_DAY {
            let overflow = self.time_of_day;
            self.time_of_day = 0;
            self.advance(overflow);
        }
    }
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new(1, 8 * MINUTES_PER_HOUR)
    }
}

//! Where the character is, and the journey in progress if any

use serde::{Deserialize, Serialize};

use crate::core::types::{LocationId, Minutes};
use crate::effects::definition::SkillScaling;

/// An active traversal of an environment location (road, forest, pass)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelState {
    pub destination: LocationId,
    #[serde(default)]
    pub destination_district: Option<String>,
    /// Minutes a character without scaling bonuses needs to cross
    pub total_minutes: Minutes,
    /// Completion fraction, 0.0 to 1.0
    #[serde(default)]
    pub progress: f64,
    /// Skill that speeds up the crossing, if any
    #[serde(default)]
    pub scaling: Option<SkillScaling>,
    /// Content keys unlocked on arrival
    #[serde(default)]
    pub arrival_unlocks: Vec<String>,
}

impl TravelState {
    pub fn new(destination: impl Into<LocationId>, total_minutes: Minutes) -> Self {
        Self {
            destination: destination.into(),
            destination_district: None,
            total_minutes,
            progress: 0.0,
            scaling: None,
            arrival_unlocks: Vec::new(),
        }
    }

    pub fn with_scaling(mut self, scaling: SkillScaling) -> Self {
        self.scaling = Some(scaling);
        self
    }

    pub fn with_unlocks(mut self, unlocks: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.arrival_unlocks = unlocks.into_iter().map(Into::into).collect();
        self
    }
}

/// Current placement of the character
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationState {
    pub location: LocationId,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub building: Option<String>,
    /// Set while the current location is an environment being crossed
    #[serde(default)]
    pub travel: Option<TravelState>,
    /// Player has paused the journey; time still passes
    #[serde(default)]
    pub travel_stopped: bool,
}

impl LocationState {
    pub fn at(location: impl Into<LocationId>) -> Self {
        Self {
            location: location.into(),
            ..Self::default()
        }
    }

    pub fn is_traveling(&self) -> bool {
        self.travel.is_some()
    }
}

//! One occupant slot per status category

use serde::{Deserialize, Serialize};

use crate::core::types::EffectId;

/// Status categories resolved by threshold conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusCategory {
    Fatigue,
    Hunger,
    Encumbrance,
}

impl StatusCategory {
    pub const ALL: [StatusCategory; 3] = [
        StatusCategory::Fatigue,
        StatusCategory::Hunger,
        StatusCategory::Encumbrance,
    ];

    /// Derived metric a candidate's system check must test to belong here
    pub fn metric_name(&self) -> &'static str {
        match self {
            StatusCategory::Fatigue => "fatigue",
            StatusCategory::Hunger => "hunger",
            StatusCategory::Encumbrance => "weight_percent",
        }
    }

    pub fn from_metric_name(stat: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| stat.trim().eq_ignore_ascii_case(category.metric_name()))
    }
}

/// Which status effect currently occupies each category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSlots {
    #[serde(default)]
    pub fatigue: Option<EffectId>,
    #[serde(default)]
    pub hunger: Option<EffectId>,
    #[serde(default)]
    pub encumbrance: Option<EffectId>,
}

impl StatusSlots {
    pub fn get(&self, category: StatusCategory) -> Option<&EffectId> {
        self.slot(category).as_ref()
    }

    /// Replace the occupant, returning the previous one
    pub fn set(
        &mut self,
        category: StatusCategory,
        occupant: Option<EffectId>,
    ) -> Option<EffectId> {
        std::mem::replace(self.slot_mut(category), occupant)
    }

    /// Clear whichever slot holds `effect_id`
    pub fn release(&mut self, effect_id: &EffectId) -> Option<StatusCategory> {
        let category = StatusCategory::ALL
            .into_iter()
            .find(|category| self.get(*category) == Some(effect_id))?;
        self.set(category, None);
        Some(category)
    }

    fn slot(&self, category: StatusCategory) -> &Option<EffectId> {
        match category {
            StatusCategory::Fatigue => &self.fatigue,
            StatusCategory::Hunger => &self.hunger,
            StatusCategory::Encumbrance => &self.encumbrance,
        }
    }

    fn slot_mut(&mut self, category: StatusCategory) -> &mut Option<EffectId> {
        match category {
            StatusCategory::Fatigue => &mut self.fatigue,
            StatusCategory::Hunger => &mut self.hunger,
            StatusCategory::Encumbrance => &mut self.encumbrance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_metric_name() {
        assert_eq!(
            StatusCategory::from_metric_name("weight_percent"),
            Some(StatusCategory::Encumbrance)
        );
        assert_eq!(StatusCategory::from_metric_name("Hunger"), Some(StatusCategory::Hunger));
        assert_eq!(StatusCategory::from_metric_name("hp_percent"), None);
    }

    #[test]
    fn test_release_clears_matching_slot_only() {
        let mut slots = StatusSlots::default();
        slots.set(StatusCategory::Fatigue, Some(EffectId::from("tired")));
        slots.set(StatusCategory::Hunger, Some(EffectId::from("peckish")));

        assert_eq!(slots.release(&EffectId::from("tired")), Some(StatusCategory::Fatigue));
        assert!(slots.get(StatusCategory::Fatigue).is_none());
        assert_eq!(slots.get(StatusCategory::Hunger), Some(&EffectId::from("peckish")));
        assert_eq!(slots.release(&EffectId::from("tired")), None);
    }
}

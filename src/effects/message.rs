//! Player-facing messages produced while effects change

use serde::{Deserialize, Serialize};

use crate::core::types::EffectId;
use crate::effects::definition::{EffectCategory, EffectDefinition};

/// What happened to the effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageEvent {
    Applied,
    /// A periodic modifier fired one or more times
    Fired,
    /// A delayed instant modifier took effect
    Landed,
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectMessage {
    pub effect_id: EffectId,
    pub event: MessageEvent,
    pub text: String,
    pub category: EffectCategory,
    /// Silent messages are returned for bookkeeping but not shown
    pub silent: bool,
}

impl EffectMessage {
    pub fn applied(definition: &EffectDefinition) -> Self {
        Self::new(definition, MessageEvent::Applied, definition.display_message().to_string())
    }

    pub fn fired(definition: &EffectDefinition, stat: &str, change: i32, times: u32) -> Self {
        let text = if times > 1 {
            format!("{}: {} {:+} (x{})", definition.name, stat, change, times)
        } else {
            format!("{}: {} {:+}", definition.name, stat, change)
        };
        Self::new(definition, MessageEvent::Fired, text)
    }

    pub fn landed(definition: &EffectDefinition, stat: &str, change: i32) -> Self {
        Self::new(
            definition,
            MessageEvent::Landed,
            format!("{}: {} {:+}", definition.name, stat, change),
        )
    }

    pub fn expired(definition: &EffectDefinition) -> Self {
        Self::new(
            definition,
            MessageEvent::Expired,
            format!("{} has worn off.", definition.name),
        )
    }

    fn new(definition: &EffectDefinition, event: MessageEvent, text: String) -> Self {
        Self {
            effect_id: definition.id.clone(),
            event,
            text,
            category: definition.category,
            silent: definition.silent,
        }
    }

    pub fn is_visible(&self) -> bool {
        !self.silent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fired_text_mentions_repeat_count() {
        let definition = EffectDefinition::new("bleeding", "Bleeding");
        let once = EffectMessage::fired(&definition, "hp", -1, 1);
        let twice = EffectMessage::fired(&definition, "hp", -1, 2);
        assert_eq!(once.text, "Bleeding: hp -1");
        assert_eq!(twice.text, "Bleeding: hp -1 (x2)");
    }

    #[test]
    fn test_applied_falls_back_to_name() {
        let mut definition = EffectDefinition::new("rested", "Rested");
        assert_eq!(EffectMessage::applied(&definition).text, "Rested");
        definition.message = "You feel refreshed.".into();
        assert_eq!(EffectMessage::applied(&definition).text, "You feel refreshed.");
    }
}

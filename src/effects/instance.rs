//! Applied occurrences of a single modifier

use serde::{Deserialize, Serialize};

use crate::core::calendar::GameTime;
use crate::core::types::{EffectId, Minutes};

/// How long an instance lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Lifetime {
    Permanent,
    Timed { remaining: Minutes, total: Minutes },
}

impl Lifetime {
    pub fn remaining(&self) -> Option<Minutes> {
        match *self {
            Lifetime::Permanent => None,
            Lifetime::Timed { remaining, .. } => Some(remaining),
        }
    }

    pub fn total(&self) -> Option<Minutes> {
        match *self {
            Lifetime::Permanent => None,
            Lifetime::Timed { total, .. } => Some(total),
        }
    }

    /// Spend `minutes`; returns true once a timed lifetime has run out
    pub fn consume(&mut self, minutes: Minutes) -> bool {
        match self {
            Lifetime::Permanent => false,
            Lifetime::Timed { remaining, .. } => {
                *remaining = remaining.saturating_sub(minutes);
                *remaining == 0
            }
        }
    }
}

/// One applied modifier of one effect definition.
///
/// Holds only a (definition id, modifier index) reference into the catalog;
/// the modifier data itself is looked up on every use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveEffectInstance {
    pub effect_id: EffectId,
    pub modifier_index: usize,
    pub lifetime: Lifetime,
    /// Minutes before the modifier starts acting
    #[serde(default)]
    pub delay_remaining: Minutes,
    /// Minutes banked toward the next periodic fire
    #[serde(default)]
    pub tick_accumulator: Minutes,
    pub applied_at: GameTime,
}

impl ActiveEffectInstance {
    pub fn new(
        effect_id: EffectId,
        modifier_index: usize,
        lifetime: Lifetime,
        delay: Minutes,
        applied_at: GameTime,
    ) -> Self {
        Self {
            effect_id,
            modifier_index,
            lifetime,
            delay_remaining: delay,
            tick_accumulator: 0,
            applied_at,
        }
    }

    /// A delayed instance contributes nothing until its delay runs out
    pub fn is_delayed(&self) -> bool {
        self.delay_remaining > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permanent_never_runs_out() {
        let mut lifetime = Lifetime::Permanent;
        assert!(!lifetime.consume(100_000));
        assert_eq!(lifetime.remaining(), None);
    }

    #[test]
    fn test_timed_runs_out_on_exact_duration() {
        let mut lifetime = Lifetime::Timed { remaining: 90, total: 90 };
        assert!(!lifetime.consume(60));
        assert_eq!(lifetime.remaining(), Some(30));
        assert!(lifetime.consume(30));
        assert_eq!(lifetime.total(), Some(90));
    }

    #[test]
    fn test_lifetime_serializes_tagged() {
        let json = serde_json::to_string(&Lifetime::Timed { remaining: 5, total: 10 }).unwrap();
        assert_eq!(json, r#"{"type":"timed","remaining":5,"total":10}"#);
    }
}

//! Effect definitions, their applied instances, and the tick pass
//!
//! - `definition`: authored records and their validated form
//! - `instance`: one applied modifier with its own timers
//! - `applicator` / `tick`: creating and advancing instances
//! - `aggregate` / `scaling`: derived values read during a pass
//! - `display`: read-only views for presentation

pub mod aggregate;
pub mod applicator;
pub mod definition;
pub mod display;
pub mod instance;
pub mod message;
pub mod scaling;
pub mod tick;

pub use aggregate::{stat_modifier_total, ModifierTotals};
pub use applicator::{apply_definition, apply_effect};
pub use definition::{
    EffectCategory, EffectDefinition, EffectRecord, Modifier, ModifierKind, ModifierRecord,
    RemovalConfig, RemovalType, SkillDefinition, SkillScaling, SystemCheck, VariantLevel,
    VariantTable,
};
pub use display::{enrich_active_effects, ActiveEffectView, ModifierView};
pub use instance::{ActiveEffectInstance, Lifetime};
pub use message::{EffectMessage, MessageEvent};
pub use tick::advance_effects;

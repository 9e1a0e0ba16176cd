use thiserror::Error;

use crate::core::types::{EffectId, Minutes, SkillId};
use crate::status::condition::ParseError;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Effect not found: {0}")]
    NotFound(EffectId),

    #[error("Skill not found: {0}")]
    SkillNotFound(SkillId),

    #[error("Effect {effect} has no modifier at index {index}")]
    InvalidReference { effect: EffectId, index: usize },

    #[error("Invalid definition '{id}': {reason}")]
    InvalidDefinition { id: String, reason: String },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Wait of {minutes} minutes is outside the allowed {min}-{max} minute range")]
    WaitOutOfRange {
        minutes: Minutes,
        min: Minutes,
        max: Minutes,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;

//! Status effects: threshold conditions, category slots and resolution

pub mod condition;
pub mod resolver;
pub mod slots;

pub use condition::{evaluate, Condition, DerivedMetrics, Metric, Operator, ParseError};
pub use resolver::{resolve_status, StatusCandidate};
pub use slots::{StatusCategory, StatusSlots};

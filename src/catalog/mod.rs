//! Effect and skill catalog
//!
//! Authored content is read through a [`DefinitionSource`] and served from a
//! [`DefinitionCache`] owned by the engine.

pub mod cache;
pub mod loader;
pub mod source;

pub use cache::DefinitionCache;
pub use loader::{TomlDirectorySource, CONFIG_FILE};
pub use source::{CatalogFile, DefinitionSource, InMemorySource};

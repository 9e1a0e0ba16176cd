//! Content directory loading
//!
//! A content directory holds TOML catalog files, conventionally under
//! `effects/` and `skills/`, though any `.toml` file below the root is read.
//! `engine.toml` at the root is the engine config and is skipped here.

use std::path::{Path, PathBuf};

use crate::catalog::source::{DefinitionSource, InMemorySource};
use crate::core::error::Result;
use crate::core::types::{EffectId, SkillId};
use crate::effects::definition::{EffectRecord, SkillDefinition};

/// File name of the engine config inside a content directory
pub const CONFIG_FILE: &str = "engine.toml";

/// Definitions read from a directory of TOML files
#[derive(Debug, Clone)]
pub struct TomlDirectorySource {
    root: PathBuf,
    inner: InMemorySource,
}

impl TomlDirectorySource {
    /// Read every catalog file below `root`
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let mut inner = InMemorySource::new();
        let files = load_directory(&root, &root, &mut inner)?;
        tracing::debug!(
            "Loaded {} effects and {} skills from {} files in {}",
            inner.effect_count(),
            inner.skill_count(),
            files,
            root.display()
        );
        Ok(Self { root, inner })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn load_directory(root: &Path, path: &Path, inner: &mut InMemorySource) -> Result<usize> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(path)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<_>>()?;
    // stable load order keeps duplicate-id errors reproducible
    entries.sort();

    let mut files = 0;
    for entry_path in entries {
        if entry_path.is_dir() {
            files += load_directory(root, &entry_path, inner)?;
        } else if entry_path.extension().is_some_and(|ext| ext == "toml") {
            if path == root && entry_path.file_name().is_some_and(|name| name == CONFIG_FILE) {
                continue;
            }
            let content = std::fs::read_to_string(&entry_path)?;
            inner.merge_toml_str(&content, &entry_path.display().to_string())?;
            files += 1;
        }
    }
    Ok(files)
}

impl DefinitionSource for TomlDirectorySource {
    fn effect(&self, id: &EffectId) -> Result<Option<EffectRecord>> {
        self.inner.effect(id)
    }

    fn skill(&self, id: &SkillId) -> Result<Option<SkillDefinition>> {
        self.inner.skill(id)
    }

    fn effect_ids(&self) -> Result<Vec<EffectId>> {
        self.inner.effect_ids()
    }
}

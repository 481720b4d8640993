//! Definition loaders
//!
//! The resolution engine asks a [`DefinitionSource`] for every layer of an
//! ancestry chain. Two sources ship with this crate:
//!
//! - [`FileDefinitionSource`] reads YAML, TOML or JSON files below a root
//!   directory.
//! - [`MemoryDefinitionSource`] serves already-deserialized records keyed
//!   by location.

use crate::schema::Definition;
use crate::{Error, Result};
use scripter_fs::{ConfigStore, NormalizedPath};
use std::collections::HashMap;

/// Loads a definition by location.
///
/// Implementations must be shareable across threads so independent
/// resolution runs can proceed in parallel.
pub trait DefinitionSource: Send + Sync {
    /// Load the definition stored at `location`.
    ///
    /// Fails with [`Error::DefinitionNotFound`] when nothing is stored
    /// there and [`Error::InvalidDefinition`] when the record is malformed.
    fn load(&self, location: &str) -> Result<Definition>;
}

impl<S: DefinitionSource + ?Sized> DefinitionSource for &S {
    fn load(&self, location: &str) -> Result<Definition> {
        (**self).load(location)
    }
}

/// Loads definitions from files below a root directory.
///
/// Relative locations (including parent references) resolve against the
/// root; absolute locations are used as-is.
#[derive(Debug, Clone)]
pub struct FileDefinitionSource {
    root: NormalizedPath,
    store: ConfigStore,
}

impl FileDefinitionSource {
    /// Create a source resolving relative locations against `root`.
    pub fn new(root: impl Into<NormalizedPath>) -> Self {
        Self {
            root: root.into(),
            store: ConfigStore::new(),
        }
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }
}

impl DefinitionSource for FileDefinitionSource {
    fn load(&self, location: &str) -> Result<Definition> {
        let path = self.root.resolve(location.trim());
        if !path.is_file() {
            return Err(Error::DefinitionNotFound {
                location: path.to_string(),
            });
        }

        tracing::debug!(%path, "Loading definition");
        let definition: Definition = self.store.load(&path).map_err(|e| match e {
            scripter_fs::Error::ConfigParse { message, .. } => Error::InvalidDefinition {
                location: path.to_string(),
                message,
            },
            other => Error::Fs(other),
        })?;

        validate(&definition, path.as_str())?;
        Ok(definition)
    }
}

/// Serves definitions from memory, keyed by location.
#[derive(Debug, Clone, Default)]
pub struct MemoryDefinitionSource {
    definitions: HashMap<String, Definition>,
}

impl MemoryDefinitionSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `definition` under `location`, replacing any previous entry.
    pub fn insert(&mut self, location: impl Into<String>, definition: Definition) {
        self.definitions.insert(location.into(), definition);
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, location: impl Into<String>, definition: Definition) -> Self {
        self.insert(location, definition);
        self
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl DefinitionSource for MemoryDefinitionSource {
    fn load(&self, location: &str) -> Result<Definition> {
        let definition = self
            .definitions
            .get(location.trim())
            .cloned()
            .ok_or_else(|| Error::DefinitionNotFound {
                location: location.to_string(),
            })?;
        validate(&definition, location)?;
        Ok(definition)
    }
}

fn validate(definition: &Definition, location: &str) -> Result<()> {
    if definition.name().trim().is_empty() {
        return Err(Error::InvalidDefinition {
            location: location.to_string(),
            message: "header.name must not be empty".to_string(),
        });
    }
    Ok(())
}

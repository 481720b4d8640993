//! Definition records and their collaborators.
//!
//! This crate owns the shape of a definition layer, the loaders that
//! produce definitions from a location, and the parser that splits a
//! parent reference into a location and a name.

pub mod error;
pub mod loader;
pub mod reference;
pub mod resolution;
pub mod schema;

pub use error::{Error, Result};
pub use loader::{DefinitionSource, FileDefinitionSource, MemoryDefinitionSource};
pub use reference::{ArrowReferenceParser, DEFAULT_SEPARATOR, ParentReference, ReferenceParser};
pub use resolution::Resolution;
pub use schema::{
    ActionBlock, ConfigurationBlock, ContextEntry, Definition, EnvironmentBlock, ExecutorBlock,
    Header, PlatformBlock, SecurityBlock, StepEntry, StepsBlock,
};

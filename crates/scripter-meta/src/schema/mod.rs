//! Schema definitions for definition layers
//!
//! This module contains the record types a definition deserializes into.
//! The resolution engine consumes these records; it never parses files
//! itself.

mod definition;

pub use definition::{
    ActionBlock, ConfigurationBlock, ContextEntry, Definition, EnvironmentBlock, ExecutorBlock,
    Header, PlatformBlock, SecurityBlock, StepEntry, StepsBlock,
};

//! Resolution engine for layered scripter definitions
//!
//! A definition may inherit from a single parent. This crate walks the
//! parent chain and folds it into one concrete [`Signal`]:
//!
//! - **Ancestry**: load the chain root-first, refusing cycles
//! - **Properties**: flatten each layer into lock-annotated properties
//! - **Resolution**: merge properties; the first ancestor to seal a value wins,
//!   otherwise the most-derived writer wins
//! - **Contexts**: merge the environment context named by the resolved
//!   configuration
//! - **Steps**: decide which layers' steps make it into the plan
//! - **Assembly**: stamp host, labels and originator, derive emit quays
//!
//! # Pipeline
//!
//! ```text
//! DefinitionSource -> AncestryBuilder -> PropertyExtractor -> PropertyResolver
//!                                                                   |
//!        Signal <- SignalAssembler <- StepAggregator <- ContextResolver
//! ```
//!
//! # Example
//!
//! ```ignore
//! use scripter_core::{Originator, SignalResolver};
//! use scripter_meta::FileDefinitionSource;
//!
//! let resolver = SignalResolver::new(FileDefinitionSource::new("/srv/templates"));
//! let signal = resolver.resolve("service.yaml", None)?;
//! println!("{} steps from {}", signal.steps.len(), signal.sender);
//! ```

pub mod ancestry;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod host;
pub mod property;
pub mod resolver;
pub mod signal;
pub mod steps;

pub use ancestry::{AncestryBuilder, AncestryChain, ChainLink};
pub use config::EngineConfig;
pub use context::ContextResolver;
pub use engine::SignalResolver;
pub use error::{Error, Result};
pub use host::{FixedHost, HostProbe, SystemHost};
pub use property::{
    AttributeName, ContextAttribute, ContextProperty, Extraction, Label, Lock, Property,
    PropertyExtractor, PropertyValue, ValueMarker,
};
pub use resolver::{PropertyResolver, ResolvedProperties, ResolvedProperty};
pub use scripter_meta::Resolution;
pub use signal::{
    EmitQuay, Originator, OriginatorQuay, Relationship, Signal, SignalAssembler, SignalStep,
};
pub use steps::StepAggregator;

//! Shared test utilities for the scripter workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`templates`]: [`TestTemplates`](templates::TestTemplates), a temporary
//!   directory of definition files

pub mod templates;

pub use templates::TestTemplates;

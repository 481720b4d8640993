//! Filesystem abstraction for scripter
//!
//! Provides forward-slash normalized paths, text reads and format-agnostic
//! deserialization of definition and engine configuration files.

pub mod config;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use path::NormalizedPath;

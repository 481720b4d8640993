//! Parent reference parsing
//!
//! A definition names its parent with a two-part reference such as
//! `templates/base.yaml => base`: the location to load and the name the
//! parent declares in its header.

use crate::Resolution;
use serde::{Deserialize, Serialize};

/// Separator used between the parent location and the parent name.
pub const DEFAULT_SEPARATOR: &str = "=>";

/// A parsed parent reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParentReference {
    /// Location handed to the definition loader
    pub path: String,
    /// Name the parent declares in its header
    pub name: String,
}

impl ParentReference {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }

    /// True when neither part carries a value.
    pub fn is_empty(&self) -> bool {
        self.path.is_empty() && self.name.is_empty()
    }
}

/// Splits a raw parent reference into location and name.
pub trait ReferenceParser: Send + Sync {
    /// Parse `reference`.
    ///
    /// Blank references are [`Resolution::Unresolved`]. References that do
    /// not split into exactly two parts yield an empty reference as
    /// [`Resolution::FellBackToDefault`].
    fn parse(&self, reference: &str) -> Resolution<ParentReference>;
}

/// Reference parser splitting on a fixed token (`=>` by default).
#[derive(Debug, Clone)]
pub struct ArrowReferenceParser {
    separator: String,
}

impl ArrowReferenceParser {
    pub fn new() -> Self {
        Self::with_separator(DEFAULT_SEPARATOR)
    }

    pub fn with_separator(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }
}

impl Default for ArrowReferenceParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ReferenceParser for ArrowReferenceParser {
    fn parse(&self, reference: &str) -> Resolution<ParentReference> {
        if reference.trim().is_empty() {
            return Resolution::Unresolved;
        }

        let parts: Vec<&str> = reference.split(self.separator.as_str()).collect();
        match parts.as_slice() {
            [path, name] => Resolution::Resolved(ParentReference::new(path.trim(), name.trim())),
            _ => {
                tracing::warn!(
                    reference,
                    separator = %self.separator,
                    "Parent reference does not contain exactly one separator; treating as rootless"
                );
                Resolution::FellBackToDefault(ParentReference::default())
            }
        }
    }
}

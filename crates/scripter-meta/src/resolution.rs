//! Outcome of a lookup that may degrade to a fallback.

use serde::{Deserialize, Serialize};

/// Result of a lookup that is allowed to fall back instead of failing.
///
/// Keeps "matched" distinguishable from "defaulted" so callers can decide
/// whether a fallback is acceptable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "value", rename_all = "snake_case")]
pub enum Resolution<T> {
    /// The lookup matched exactly.
    Resolved(T),
    /// Nothing matched; the documented fallback was used instead.
    FellBackToDefault(T),
    /// Nothing matched and there was nothing to fall back to.
    Unresolved,
}

impl<T> Default for Resolution<T> {
    fn default() -> Self {
        Self::Unresolved
    }
}

impl<T> Resolution<T> {
    /// The carried value, whether matched or defaulted.
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Resolved(value) | Self::FellBackToDefault(value) => Some(value),
            Self::Unresolved => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Resolved(value) | Self::FellBackToDefault(value) => Some(value),
            Self::Unresolved => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::FellBackToDefault(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resolution<U> {
        match self {
            Self::Resolved(value) => Resolution::Resolved(f(value)),
            Self::FellBackToDefault(value) => Resolution::FellBackToDefault(f(value)),
            Self::Unresolved => Resolution::Unresolved,
        }
    }
}

//! Property records extracted from definition layers
//!
//! Every known attribute of a definition is flattened into a [`Property`]
//! carrying its value, the layer it came from and the lock asserted by the
//! owning block. Environment contexts become [`ContextProperty`] records that
//! additionally remember which context entry they belong to.

mod extractor;

pub use extractor::{Extraction, PropertyExtractor};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Token marking a value as a placeholder meant to be overridden.
pub const OVERRIDABLE_TOKEN: &str = "$(overridable)";

/// Substring marking a value as a default placeholder.
pub const DEFAULT_TOKEN: &str = "default";

/// The fixed set of configuration and action attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttributeName {
    Containerize,
    AgentOrLabel,
    ContextName,
    ExecutionMode,
    BypassSecurity,
    AuthenticationHub,
    AuthorizationHub,
    CertificationHub,
    ExecutorOs,
    ExecutorUser,
    ExecutorHost,
    Api,
    NameOrFullPath,
    ActionType,
    ShutdownSignal,
    OsFamily,
    PackageInstaller,
    InstallationDependencies,
    ExecutionDependencies,
    InitialInputs,
    EnvironmentVariables,
}

impl AttributeName {
    pub const ALL: [AttributeName; 21] = [
        Self::Containerize,
        Self::AgentOrLabel,
        Self::ContextName,
        Self::ExecutionMode,
        Self::BypassSecurity,
        Self::AuthenticationHub,
        Self::AuthorizationHub,
        Self::CertificationHub,
        Self::ExecutorOs,
        Self::ExecutorUser,
        Self::ExecutorHost,
        Self::Api,
        Self::NameOrFullPath,
        Self::ActionType,
        Self::ShutdownSignal,
        Self::OsFamily,
        Self::PackageInstaller,
        Self::InstallationDependencies,
        Self::ExecutionDependencies,
        Self::InitialInputs,
        Self::EnvironmentVariables,
    ];

    /// Dotted attribute path, e.g. `Configuration.ExecutionMode`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Containerize => "Configuration.Containerize",
            Self::AgentOrLabel => "Configuration.AgentOrLabel",
            Self::ContextName => "Configuration.ContextName",
            Self::ExecutionMode => "Configuration.ExecutionMode",
            Self::BypassSecurity => "Configuration.BypassSecurity",
            Self::AuthenticationHub => "Configuration.Security.AuthenticationHub",
            Self::AuthorizationHub => "Configuration.Security.AuthorizationHub",
            Self::CertificationHub => "Configuration.Security.CertificationHub",
            Self::ExecutorOs => "Configuration.Executor.Os",
            Self::ExecutorUser => "Configuration.Executor.User",
            Self::ExecutorHost => "Configuration.Executor.Host",
            Self::Api => "Action.Api",
            Self::NameOrFullPath => "Action.NameOrFullPath",
            Self::ActionType => "Action.Type",
            Self::ShutdownSignal => "Action.ShutdownSignal",
            Self::OsFamily => "Action.Platform.OsFamily",
            Self::PackageInstaller => "Action.Platform.PackageInstaller",
            Self::InstallationDependencies => "Action.InstallationDependencies",
            Self::ExecutionDependencies => "Action.ExecutionDependencies",
            Self::InitialInputs => "Action.InitialInputs",
            Self::EnvironmentVariables => "Action.EnvironmentVariables",
        }
    }

    /// Look up an attribute by its dotted path.
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|name| name.as_str() == path)
    }
}

impl fmt::Display for AttributeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attributes of a single environment context entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContextAttribute {
    Name,
    Dependencies,
    InitialInputs,
    EnvironmentVariables,
}

impl ContextAttribute {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "Context.Name",
            Self::Dependencies => "Context.Dependencies",
            Self::InitialInputs => "Context.InitialInputs",
            Self::EnvironmentVariables => "Context.EnvironmentVariables",
        }
    }
}

impl fmt::Display for ContextAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A candidate value: exactly one of absent, scalar, list or dictionary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PropertyValue {
    #[default]
    Absent,
    Scalar(String),
    List(Vec<String>),
    Dictionary(BTreeMap<String, String>),
}

impl PropertyValue {
    /// Whether the value would assign anything (non-empty string, list or map).
    pub fn is_present(&self) -> bool {
        match self {
            Self::Absent => false,
            Self::Scalar(value) => !value.is_empty(),
            Self::List(values) => !values.is_empty(),
            Self::Dictionary(values) => !values.is_empty(),
        }
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_dictionary(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            Self::Dictionary(values) => Some(values),
            _ => None,
        }
    }
}

/// Lock asserted by a block's `can-overwrite` annotation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Lock {
    /// `can-overwrite: false` - descendants may not override
    Sealed,
    /// `can-overwrite: true`
    Open,
    /// No annotation; the nearest sealing ancestor governs
    #[default]
    Unspecified,
}

impl Lock {
    pub fn from_can_overwrite(can_overwrite: Option<bool>) -> Self {
        match can_overwrite {
            Some(false) => Self::Sealed,
            Some(true) => Self::Open,
            None => Self::Unspecified,
        }
    }

    pub fn is_sealed(&self) -> bool {
        matches!(self, Self::Sealed)
    }
}

/// Classification of a raw value, decided once at extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueMarker {
    #[default]
    Concrete,
    /// Carried the `$(overridable)` token
    Overridable,
    /// Mentions `default`
    DefaultPlaceholder,
}

/// One attribute value contributed by one definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: AttributeName,
    pub value: PropertyValue,
    /// Name of the definition that declared the value
    pub source: String,
    pub lock: Lock,
    pub marker: ValueMarker,
}

impl Property {
    pub fn new(name: AttributeName, value: PropertyValue, source: impl Into<String>) -> Self {
        Self {
            name,
            value,
            source: source.into(),
            lock: Lock::Unspecified,
            marker: ValueMarker::Concrete,
        }
    }

    pub fn with_lock(mut self, lock: Lock) -> Self {
        self.lock = lock;
        self
    }

    pub fn with_marker(mut self, marker: ValueMarker) -> Self {
        self.marker = marker;
        self
    }

    /// No more-derived definition may override this value.
    pub fn sealed(&self) -> bool {
        self.lock.is_sealed()
    }

    pub fn is_default(&self) -> bool {
        self.marker == ValueMarker::DefaultPlaceholder
    }
}

/// One context attribute, tagged with the index of its context entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextProperty {
    pub name: ContextAttribute,
    pub value: PropertyValue,
    pub source: String,
    /// Index of the context entry within its definition
    pub position: usize,
    pub lock: Lock,
    pub marker: ValueMarker,
}

impl ContextProperty {
    pub fn sealed(&self) -> bool {
        self.lock.is_sealed()
    }

    pub fn is_default(&self) -> bool {
        self.marker == ValueMarker::DefaultPlaceholder
    }
}

/// A header label and the definition declaring it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub value: String,
    pub source: String,
}

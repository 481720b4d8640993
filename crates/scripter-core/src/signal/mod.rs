//! The resolved execution directive
//!
//! A [`Signal`] is the single output of a resolution run. It is handed to
//! the execution dispatcher, which performs security validation,
//! feasibility checks and the actual launch.

mod assembler;

pub use assembler::SignalAssembler;

use scripter_fs::NormalizedPath;
use scripter_meta::Resolution;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fully resolved directive
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    /// Name of the most-derived definition
    pub sender: String,
    /// Operating system the signal was resolved on
    pub host_os: String,
    /// Distinct labels, first occurrence order
    pub labels: Vec<String>,

    // Configuration
    pub containerize: bool,
    pub executor: Option<String>,
    pub execution_mode: Option<String>,
    pub bypass_security: bool,
    pub authentication_hub: Option<String>,
    pub authorization_hub: Option<String>,
    pub certification_hub: Option<String>,
    /// Chosen environment context name
    pub environment: Option<String>,
    pub executor_os: Option<String>,
    pub executor_user: Option<String>,
    pub executor_host: Option<String>,

    // Action
    pub executable_path: Option<String>,
    pub action_type: Option<String>,
    pub api: Option<String>,
    pub shutdown_signal: Option<String>,
    /// Platform family the action targets
    pub signal_os: Option<String>,
    pub package_installer: Option<String>,
    pub installation_dependencies: Vec<String>,
    pub execution_dependencies: Vec<String>,
    pub arguments: Vec<String>,
    pub environment_variables: BTreeMap<String, String>,

    /// How the environment context was chosen
    pub context_selection: Resolution<usize>,
    pub steps: Vec<SignalStep>,
    pub originator_quay: Option<OriginatorQuay>,
    pub emit_quays: Vec<EmitQuay>,
}

/// A concrete execution step and the definition contributing it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignalStep {
    pub name: String,
    pub pointer: String,
    pub source: String,
}

impl SignalStep {
    pub fn new(
        name: impl Into<String>,
        pointer: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            pointer: pointer.into(),
            source: source.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relationship {
    Dependency,
    Step,
}

/// A downstream target the dispatcher consumes in order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmitQuay {
    /// File stem of `path`
    pub name: String,
    pub path: String,
    pub relationship: Relationship,
    /// Position in the source list
    pub priority: usize,
}

impl EmitQuay {
    pub fn new(path: &str, relationship: Relationship, priority: usize) -> Self {
        Self {
            name: quay_name(path),
            path: path.to_string(),
            relationship,
            priority,
        }
    }
}

/// The process that requested the resolution
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Originator {
    pub path: String,
    pub nickname: String,
    pub require_acknowledge: bool,
}

impl Originator {
    pub fn new(path: impl Into<String>, nickname: impl Into<String>, require_acknowledge: bool) -> Self {
        Self {
            path: path.into(),
            nickname: nickname.into(),
            require_acknowledge,
        }
    }

    /// Build from raw string arguments; `1`, `true` and `yes` acknowledge.
    pub fn from_args(path: &str, nickname: &str, acknowledge: &str) -> Self {
        Self::new(path.trim(), nickname.trim(), interpret_flag(acknowledge))
    }
}

/// Originator as recorded on the signal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginatorQuay {
    pub name: String,
    pub path: String,
    pub process_name: String,
    pub require_acknowledge: bool,
}

fn interpret_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}

fn quay_name(path: &str) -> String {
    NormalizedPath::new(path)
        .file_stem()
        .unwrap_or(path)
        .to_string()
}

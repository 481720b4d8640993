//! Definition layer schema
//!
//! One definition is one layer of an inheritance chain. Every block except
//! the header is optional, and every block carries its own `can-overwrite`
//! annotation deciding whether descendants may override its values.
//!
//! # Example YAML
//!
//! ```yaml
//! header:
//!   name: web-service
//!   inherits: templates/base.yaml => base
//!   labels: [linux, web]
//!
//! configuration:
//!   agent-or-label: build-agents
//!   execution-mode: async
//!   context-name: prod
//!   can-overwrite: true
//!
//! action:
//!   name-or-full-path: /usr/local/bin/serve
//!   type: binary
//!   environment-variables:
//!     - "(PORT) 8080"
//!   can-overwrite: false
//!
//! environment:
//!   contexts:
//!     - context: dev
//!       dependencies: [redis]
//!     - context: prod
//!       dependencies: [redis-cluster]
//!
//! steps:
//!   list:
//!     - step: migrate
//!       pointer: steps/migrate.yaml
//!   can-overwrite: false
//! ```

use serde::{Deserialize, Serialize};

/// Complete definition layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    /// Identity, parent reference and labels
    pub header: Header,
    #[serde(default)]
    pub configuration: ConfigurationBlock,
    #[serde(default)]
    pub action: ActionBlock,
    #[serde(default)]
    pub environment: EnvironmentBlock,
    #[serde(default)]
    pub steps: StepsBlock,
}

impl Definition {
    /// Create an otherwise empty definition with the given name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            header: Header {
                name: name.into(),
                ..Header::default()
            },
            ..Self::default()
        }
    }

    /// The definition's identifier.
    pub fn name(&self) -> &str {
        &self.header.name
    }

    /// The raw parent reference, if one is declared and not blank.
    pub fn parent_reference(&self) -> Option<&str> {
        self.header
            .inherits
            .as_deref()
            .map(str::trim)
            .filter(|reference| !reference.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Header {
    pub name: String,
    /// Parent reference in the form `<path> => <name>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherits: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
}

/// Execution configuration block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConfigurationBlock {
    #[serde(default)]
    pub containerize: Option<bool>,
    /// Executor selector: an agent name or a label agents match on
    #[serde(default)]
    pub agent_or_label: Option<String>,
    #[serde(default)]
    pub execution_mode: Option<String>,
    #[serde(default)]
    pub bypass_security: Option<bool>,
    #[serde(default)]
    pub security: SecurityBlock,
    #[serde(default)]
    pub executor: ExecutorBlock,
    /// Name of the environment context to select
    #[serde(default)]
    pub context_name: Option<String>,
    #[serde(default)]
    pub can_overwrite: Option<bool>,
}

/// Security hub references
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SecurityBlock {
    #[serde(default)]
    pub authentication_hub: Option<String>,
    #[serde(default)]
    pub authorization_hub: Option<String>,
    #[serde(default)]
    pub certification_hub: Option<String>,
}

/// Remote executor description
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ExecutorBlock {
    #[serde(default)]
    pub os: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
}

/// The executable the directive launches
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ActionBlock {
    #[serde(default)]
    pub name_or_full_path: Option<String>,
    #[serde(default, rename = "type")]
    pub action_type: Option<String>,
    #[serde(default)]
    pub api: Option<String>,
    #[serde(default)]
    pub shutdown_signal: Option<String>,
    #[serde(default)]
    pub initial_inputs: Vec<String>,
    /// Entries of the form `KEY value` or `(KEY) value`
    #[serde(default)]
    pub environment_variables: Vec<String>,
    #[serde(default)]
    pub platform: PlatformBlock,
    #[serde(default)]
    pub installation_dependencies: Vec<String>,
    #[serde(default)]
    pub execution_dependencies: Vec<String>,
    #[serde(default)]
    pub can_overwrite: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PlatformBlock {
    #[serde(default)]
    pub os_family: Option<String>,
    #[serde(default)]
    pub package_installer: Option<String>,
}

/// Environment-specific contexts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct EnvironmentBlock {
    #[serde(default)]
    pub contexts: Vec<ContextEntry>,
    #[serde(default)]
    pub can_overwrite: Option<bool>,
}

/// One named environment context
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ContextEntry {
    #[serde(default, rename = "context")]
    pub name: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub context_initial_inputs: Vec<String>,
    #[serde(default)]
    pub environment_variables: Vec<String>,
}

/// Ordered execution steps
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StepsBlock {
    #[serde(default)]
    pub list: Vec<StepEntry>,
    /// Covers the whole list, not individual entries
    #[serde(default)]
    pub can_overwrite: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepEntry {
    pub step: String,
    pub pointer: String,
}

//! Flattens a definition into property records.

use super::{
    AttributeName, ContextAttribute, ContextProperty, DEFAULT_TOKEN, Label, Lock,
    OVERRIDABLE_TOKEN, Property, PropertyValue, ValueMarker,
};
use scripter_meta::Definition;
use std::collections::BTreeMap;

/// Properties, context properties and labels taken from one or more layers,
/// in the order the layers were visited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub properties: Vec<Property>,
    pub context_properties: Vec<ContextProperty>,
    pub labels: Vec<Label>,
}

impl Extraction {
    pub fn extend(&mut self, other: Extraction) {
        self.properties.extend(other.properties);
        self.context_properties.extend(other.context_properties);
        self.labels.extend(other.labels);
    }
}

/// Pure transform from a [`Definition`] to its property records.
///
/// Only present attributes produce a record: non-empty strings, non-empty
/// lists and non-empty dictionaries.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertyExtractor;

impl PropertyExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract every layer in order, root ancestor first.
    pub fn extract_all<'a>(&self, definitions: impl IntoIterator<Item = &'a Definition>) -> Extraction {
        let mut extraction = Extraction::default();
        for definition in definitions {
            extraction.extend(self.extract(definition));
        }
        extraction
    }

    pub fn extract(&self, definition: &Definition) -> Extraction {
        let source = definition.name();
        let mut properties = Vec::new();

        let configuration = &definition.configuration;
        let lock = Lock::from_can_overwrite(configuration.can_overwrite);
        for (name, raw) in [
            (AttributeName::AgentOrLabel, &configuration.agent_or_label),
            (AttributeName::ContextName, &configuration.context_name),
            (AttributeName::ExecutionMode, &configuration.execution_mode),
            (AttributeName::AuthenticationHub, &configuration.security.authentication_hub),
            (AttributeName::AuthorizationHub, &configuration.security.authorization_hub),
            (AttributeName::CertificationHub, &configuration.security.certification_hub),
            (AttributeName::ExecutorOs, &configuration.executor.os),
            (AttributeName::ExecutorUser, &configuration.executor.user),
            (AttributeName::ExecutorHost, &configuration.executor.host),
        ] {
            if let Some(property) = scalar_property(name, raw.as_deref(), source, lock) {
                properties.push(property);
            }
        }
        for (name, flag) in [
            (AttributeName::Containerize, configuration.containerize),
            (AttributeName::BypassSecurity, configuration.bypass_security),
        ] {
            if let Some(flag) = flag {
                properties.push(
                    Property::new(name, PropertyValue::Scalar(flag.to_string()), source)
                        .with_lock(lock),
                );
            }
        }

        let action = &definition.action;
        let lock = Lock::from_can_overwrite(action.can_overwrite);
        for (name, raw) in [
            (AttributeName::Api, &action.api),
            (AttributeName::NameOrFullPath, &action.name_or_full_path),
            (AttributeName::ActionType, &action.action_type),
            (AttributeName::ShutdownSignal, &action.shutdown_signal),
            (AttributeName::OsFamily, &action.platform.os_family),
            (AttributeName::PackageInstaller, &action.platform.package_installer),
        ] {
            if let Some(property) = scalar_property(name, raw.as_deref(), source, lock) {
                properties.push(property);
            }
        }
        for (name, raw) in [
            (AttributeName::InstallationDependencies, &action.installation_dependencies),
            (AttributeName::ExecutionDependencies, &action.execution_dependencies),
            (AttributeName::InitialInputs, &action.initial_inputs),
        ] {
            let (values, marker) = clean_list(raw);
            if !values.is_empty() {
                properties.push(
                    Property::new(name, PropertyValue::List(values), source)
                        .with_lock(lock)
                        .with_marker(marker),
                );
            }
        }
        let (variables, marker) = parse_variables(&action.environment_variables);
        if !variables.is_empty() {
            properties.push(
                Property::new(
                    AttributeName::EnvironmentVariables,
                    PropertyValue::Dictionary(variables),
                    source,
                )
                .with_lock(lock)
                .with_marker(marker),
            );
        }

        let lock = Lock::from_can_overwrite(definition.environment.can_overwrite);
        let mut context_properties = Vec::new();
        for (position, context) in definition.environment.contexts.iter().enumerate() {
            let mut push = |name, value: PropertyValue, marker| {
                if value.is_present() {
                    context_properties.push(ContextProperty {
                        name,
                        value,
                        source: source.to_string(),
                        position,
                        lock,
                        marker,
                    });
                }
            };
            if let Some(raw) = context.name.as_deref() {
                let (value, marker) = clean_scalar(raw);
                push(ContextAttribute::Name, PropertyValue::Scalar(value), marker);
            }
            let (values, marker) = clean_list(&context.dependencies);
            push(ContextAttribute::Dependencies, PropertyValue::List(values), marker);
            let (values, marker) = clean_list(&context.context_initial_inputs);
            push(ContextAttribute::InitialInputs, PropertyValue::List(values), marker);
            let (variables, marker) = parse_variables(&context.environment_variables);
            push(
                ContextAttribute::EnvironmentVariables,
                PropertyValue::Dictionary(variables),
                marker,
            );
        }

        let labels = definition
            .header
            .labels
            .iter()
            .map(|label| label.trim())
            .filter(|label| !label.is_empty())
            .map(|label| Label {
                value: label.to_string(),
                source: source.to_string(),
            })
            .collect();

        Extraction {
            properties,
            context_properties,
            labels,
        }
    }
}

fn scalar_property(
    name: AttributeName,
    raw: Option<&str>,
    source: &str,
    lock: Lock,
) -> Option<Property> {
    let (value, marker) = clean_scalar(raw?);
    if value.is_empty() {
        return None;
    }
    Some(
        Property::new(name, PropertyValue::Scalar(value), source)
            .with_lock(lock)
            .with_marker(marker),
    )
}

/// Strip the overridable token and surrounding whitespace, then classify.
fn clean_scalar(raw: &str) -> (String, ValueMarker) {
    let tagged = raw.contains(OVERRIDABLE_TOKEN);
    let value = raw.replace(OVERRIDABLE_TOKEN, "").trim().to_string();
    let marker = if value.contains(DEFAULT_TOKEN) {
        ValueMarker::DefaultPlaceholder
    } else if tagged {
        ValueMarker::Overridable
    } else {
        ValueMarker::Concrete
    };
    (value, marker)
}

/// Drop overridable-token entries and blanks, trim the rest, then classify.
fn clean_list(raw: &[String]) -> (Vec<String>, ValueMarker) {
    let mut tagged = false;
    let mut values = Vec::with_capacity(raw.len());
    for entry in raw {
        let entry = entry.trim();
        if entry == OVERRIDABLE_TOKEN {
            tagged = true;
        } else if !entry.is_empty() {
            values.push(entry.to_string());
        }
    }
    let marker = if values.iter().any(|value| value.contains(DEFAULT_TOKEN)) {
        ValueMarker::DefaultPlaceholder
    } else if tagged {
        ValueMarker::Overridable
    } else {
        ValueMarker::Concrete
    };
    (values, marker)
}

/// Turn `KEY value` / `(KEY) value` entries into a dictionary.
///
/// Entries without a value are dropped; later keys replace earlier ones.
fn parse_variables(raw: &[String]) -> (BTreeMap<String, String>, ValueMarker) {
    let (entries, list_marker) = clean_list(raw);
    let mut variables = BTreeMap::new();
    for entry in entries {
        if let Some((key, value)) = entry.split_once(' ') {
            let key = key.trim_start_matches('(').trim_end_matches(')');
            if !key.is_empty() {
                variables.insert(key.to_string(), value.trim().to_string());
            }
        }
    }
    let marker = if variables
        .iter()
        .any(|(key, value)| key == DEFAULT_TOKEN || value == DEFAULT_TOKEN)
    {
        ValueMarker::DefaultPlaceholder
    } else if list_marker == ValueMarker::Overridable {
        ValueMarker::Overridable
    } else {
        ValueMarker::Concrete
    };
    (variables, marker)
}

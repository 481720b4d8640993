//! Environment context selection
//!
//! Each definition may declare several contexts. The one whose name equals
//! the resolved `Configuration.ContextName` is chosen by its position, and
//! every context attribute recorded at that position (from any definition
//! in the chain) is merged into the signal, later definitions overwriting
//! earlier ones. Without a match the first entry is used.

use crate::property::{ContextAttribute, ContextProperty, PropertyValue};
use crate::signal::Signal;
use scripter_meta::Resolution;

/// Context entry chosen when no name matches, even if it declares nothing.
const FALLBACK_POSITION: usize = 0;

#[derive(Debug, Clone, Copy, Default)]
pub struct ContextResolver;

impl ContextResolver {
    pub fn new() -> Self {
        Self
    }

    /// Choose the context position for `environment`.
    ///
    /// Falls back to the first context entry when nothing matches, and is
    /// [`Resolution::Unresolved`] only when no context declared anything.
    pub fn select(
        &self,
        environment: Option<&str>,
        properties: &[ContextProperty],
    ) -> Resolution<usize> {
        if properties.is_empty() {
            return Resolution::Unresolved;
        }

        let matched = environment.and_then(|wanted| {
            properties
                .iter()
                .filter(|p| p.name == ContextAttribute::Name)
                .find(|p| p.value.as_scalar() == Some(wanted))
        });

        match matched {
            Some(property) => {
                tracing::debug!(
                    environment = environment.unwrap_or_default(),
                    position = property.position,
                    source = %property.source,
                    "Selected environment context"
                );
                Resolution::Resolved(property.position)
            }
            None => {
                tracing::warn!(
                    environment = environment.unwrap_or_default(),
                    position = FALLBACK_POSITION,
                    "No context matches the chosen environment, using the first context"
                );
                Resolution::FellBackToDefault(FALLBACK_POSITION)
            }
        }
    }

    /// Select a context for the signal's environment and merge it in.
    pub fn apply(&self, signal: &mut Signal, properties: &[ContextProperty]) -> Resolution<usize> {
        let selection = self.select(signal.environment.as_deref(), properties);
        if let Some(&position) = selection.value() {
            for property in properties.iter().filter(|p| p.position == position) {
                merge(signal, property);
            }
        }
        signal.context_selection = selection.clone();
        selection
    }
}

fn merge(signal: &mut Signal, property: &ContextProperty) {
    match (property.name, &property.value) {
        (ContextAttribute::Dependencies, PropertyValue::List(values)) => {
            signal.execution_dependencies = values.clone();
        }
        (ContextAttribute::InitialInputs, PropertyValue::List(values)) => {
            signal.arguments = values.clone();
        }
        (ContextAttribute::EnvironmentVariables, PropertyValue::Dictionary(values)) => {
            signal.environment_variables = values.clone();
        }
        _ => {}
    }
}

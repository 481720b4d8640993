//! Property resolution with lock semantics
//!
//! Properties are folded in chain order, root ancestor first. A name that
//! has been sealed is frozen for every later (more-derived) layer; all other
//! names follow "last writer wins".
//!
//! Net effect: the first ancestor to both set and seal an attribute wins
//! outright. Without a seal, the most-derived layer setting the attribute
//! wins.

use crate::property::{AttributeName, Property, PropertyValue, ValueMarker};
use std::collections::{BTreeMap, HashSet};

/// The winning value for one attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProperty {
    pub value: PropertyValue,
    /// Definition that supplied the winning value
    pub source: String,
    pub marker: ValueMarker,
}

/// One resolved value per attribute name, plus the sender.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedProperties {
    values: BTreeMap<AttributeName, ResolvedProperty>,
    /// Attribute name -> definition that sealed it
    sealed_by: BTreeMap<AttributeName, String>,
    sender: String,
}

impl ResolvedProperties {
    /// Name of the most-derived definition.
    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn get(&self, name: AttributeName) -> Option<&ResolvedProperty> {
        self.values.get(&name)
    }

    pub fn value(&self, name: AttributeName) -> &PropertyValue {
        static ABSENT: PropertyValue = PropertyValue::Absent;
        self.values.get(&name).map(|p| &p.value).unwrap_or(&ABSENT)
    }

    pub fn scalar(&self, name: AttributeName) -> Option<&str> {
        self.value(name).as_scalar()
    }

    /// Resolved list, empty when the attribute was never set.
    pub fn list(&self, name: AttributeName) -> &[String] {
        self.value(name).as_list().unwrap_or(&[])
    }

    pub fn dictionary(&self, name: AttributeName) -> Option<&BTreeMap<String, String>> {
        self.value(name).as_dictionary()
    }

    /// Boolean attribute; anything but a literal `true` is false.
    pub fn flag(&self, name: AttributeName) -> bool {
        self.scalar(name)
            .is_some_and(|value| value.eq_ignore_ascii_case("true"))
    }

    pub fn source_of(&self, name: AttributeName) -> Option<&str> {
        self.values.get(&name).map(|p| p.source.as_str())
    }

    pub fn is_sealed(&self, name: AttributeName) -> bool {
        self.sealed_by.contains_key(&name)
    }

    /// Definition that sealed `name`, if any did.
    pub fn sealed_by(&self, name: AttributeName) -> Option<&str> {
        self.sealed_by.get(&name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AttributeName, &ResolvedProperty)> {
        self.values.iter().map(|(name, property)| (*name, property))
    }
}

/// Folds a property stream into [`ResolvedProperties`].
#[derive(Debug, Default)]
pub struct PropertyResolver {
    locked: HashSet<AttributeName>,
    resolved: ResolvedProperties,
}

impl PropertyResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a whole stream in one call.
    pub fn resolve<'a>(
        sender: impl Into<String>,
        properties: impl IntoIterator<Item = &'a Property>,
    ) -> ResolvedProperties {
        let mut resolver = Self::new();
        for property in properties {
            resolver.apply(property);
        }
        resolver.finish(sender)
    }

    /// Apply one property. Returns `false` when the name was already sealed
    /// and the property was skipped.
    pub fn apply(&mut self, property: &Property) -> bool {
        if self.locked.contains(&property.name) {
            tracing::debug!(
                attribute = %property.name,
                source = %property.source,
                sealed_by = self.resolved.sealed_by(property.name).unwrap_or_default(),
                "Ignoring override of sealed attribute"
            );
            return false;
        }

        if property.value.is_present() {
            self.resolved.values.insert(
                property.name,
                ResolvedProperty {
                    value: property.value.clone(),
                    source: property.source.clone(),
                    marker: property.marker,
                },
            );
        }

        if property.sealed() {
            self.locked.insert(property.name);
            self.resolved
                .sealed_by
                .insert(property.name, property.source.clone());
        }
        true
    }

    pub fn is_locked(&self, name: AttributeName) -> bool {
        self.locked.contains(&name)
    }

    pub fn finish(mut self, sender: impl Into<String>) -> ResolvedProperties {
        self.resolved.sender = sender.into();
        self.resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::Lock;

    fn scalar(name: AttributeName, value: &str, source: &str, lock: Lock) -> Property {
        Property::new(name, PropertyValue::Scalar(value.into()), source).with_lock(lock)
    }

    #[test]
    fn sealed_ancestor_wins() {
        let props = [
            scalar(AttributeName::ActionType, "script", "root", Lock::Sealed),
            scalar(AttributeName::ActionType, "binary", "child", Lock::Open),
        ];

        let resolved = PropertyResolver::resolve("child", &props);
        assert_eq!(resolved.scalar(AttributeName::ActionType), Some("script"));
        assert_eq!(resolved.source_of(AttributeName::ActionType), Some("root"));
        assert_eq!(resolved.sealed_by(AttributeName::ActionType), Some("root"));
    }

    #[test]
    fn last_unsealed_writer_wins() {
        let props = [
            scalar(AttributeName::ExecutionMode, "sync", "root", Lock::Open),
            scalar(AttributeName::ExecutionMode, "async", "child", Lock::Unspecified),
        ];

        let resolved = PropertyResolver::resolve("child", &props);
        assert_eq!(resolved.scalar(AttributeName::ExecutionMode), Some("async"));
        assert!(!resolved.is_sealed(AttributeName::ExecutionMode));
    }

    #[test]
    fn a_layer_may_override_then_seal() {
        let props = [
            scalar(AttributeName::Api, "v1", "root", Lock::Open),
            scalar(AttributeName::Api, "v2", "middle", Lock::Sealed),
            scalar(AttributeName::Api, "v3", "leaf", Lock::Open),
        ];

        let resolved = PropertyResolver::resolve("leaf", &props);
        assert_eq!(resolved.scalar(AttributeName::Api), Some("v2"));
    }

    #[test]
    fn skipped_property_reports_false() {
        let mut resolver = PropertyResolver::new();
        assert!(resolver.apply(&scalar(AttributeName::Api, "v1", "root", Lock::Sealed)));
        assert!(resolver.is_locked(AttributeName::Api));
        assert!(!resolver.apply(&scalar(AttributeName::Api, "v2", "leaf", Lock::Open)));
    }

    #[test]
    fn absent_value_still_seals() {
        let props = [
            Property::new(AttributeName::Api, PropertyValue::Absent, "root").with_lock(Lock::Sealed),
            scalar(AttributeName::Api, "v2", "leaf", Lock::Open),
        ];

        let resolved = PropertyResolver::resolve("leaf", &props);
        assert_eq!(resolved.scalar(AttributeName::Api), None);
        assert!(resolved.is_sealed(AttributeName::Api));
    }

    #[test]
    fn seals_are_per_attribute() {
        let props = [
            scalar(AttributeName::Api, "v1", "root", Lock::Sealed),
            scalar(AttributeName::ShutdownSignal, "SIGTERM", "root", Lock::Sealed),
            scalar(AttributeName::ExecutionMode, "async", "leaf", Lock::Open),
        ];

        let resolved = PropertyResolver::resolve("leaf", &props);
        assert_eq!(resolved.len(), 3);
        assert_eq!(resolved.sender(), "leaf");
        assert_eq!(resolved.source_of(AttributeName::ExecutionMode), Some("leaf"));
    }

    #[test]
    fn unset_list_resolves_empty() {
        let resolved = PropertyResolver::resolve("leaf", std::iter::empty());
        assert!(resolved.is_empty());
        assert!(resolved.list(AttributeName::InitialInputs).is_empty());
        assert!(!resolved.flag(AttributeName::Containerize));
    }
}

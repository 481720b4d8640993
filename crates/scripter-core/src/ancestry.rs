//! Ancestry chain building
//!
//! Starting from one definition, parents are loaded recursively before the
//! definition itself is appended, so the resulting chain runs from the root
//! ancestor to the starting ("leaf") definition. Any load failure aborts the
//! whole chain: precedence is meaningless without every ancestor.

use crate::{Error, Result};
use scripter_meta::{Definition, DefinitionSource, ParentReference, ReferenceParser, Resolution};

/// One loaded layer and the parent it declared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainLink {
    /// Location the definition was loaded from
    pub location: String,
    pub definition: Definition,
    /// Outcome of parsing the declared parent reference
    pub parent: Resolution<ParentReference>,
}

impl ChainLink {
    pub fn name(&self) -> &str {
        self.definition.name()
    }

    /// The parent reference when it parsed cleanly.
    pub fn parent_reference(&self) -> Option<&ParentReference> {
        match &self.parent {
            Resolution::Resolved(reference) => Some(reference),
            _ => None,
        }
    }
}

/// Definitions ordered root ancestor first, leaf last
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AncestryChain {
    links: Vec<ChainLink>,
}

impl AncestryChain {
    /// Build a chain from already-ordered links (root first).
    pub fn from_links(links: Vec<ChainLink>) -> Self {
        Self { links }
    }

    /// Build a chain from already-loaded definitions (root first), parsing
    /// each parent reference with `parser`.
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = Definition>,
        parser: &dyn ReferenceParser,
    ) -> Self {
        let links = definitions
            .into_iter()
            .map(|definition| ChainLink {
                location: definition.name().to_string(),
                parent: parse_parent(&definition, parser),
                definition,
            })
            .collect();
        Self { links }
    }

    pub fn links(&self) -> &[ChainLink] {
        &self.links
    }

    pub fn definitions(&self) -> impl Iterator<Item = &Definition> {
        self.links.iter().map(|link| &link.definition)
    }

    pub fn root(&self) -> Option<&Definition> {
        self.links.first().map(|link| &link.definition)
    }

    pub fn leaf(&self) -> Option<&Definition> {
        self.links.last().map(|link| &link.definition)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Definition names, root first.
    pub fn names(&self) -> Vec<&str> {
        self.links.iter().map(ChainLink::name).collect()
    }

    fn find(&self, name: &str) -> Option<&ChainLink> {
        self.links.iter().find(|link| link.name() == name)
    }

    /// Names of `name` and its ancestors, root first, found by following
    /// parent reference names through the loaded chain.
    ///
    /// Empty when `name` is not part of the chain. Stops at the first parent
    /// name that is not loaded, or on a repeated name.
    pub fn ancestor_names(&self, name: &str) -> Vec<String> {
        let mut lineage: Vec<String> = Vec::new();
        let mut current = self.find(name);
        while let Some(link) = current {
            if lineage.iter().any(|seen| seen == link.name()) {
                break;
            }
            lineage.push(link.name().to_string());
            current = link
                .parent_reference()
                .and_then(|parent| self.find(&parent.name));
        }
        lineage.reverse();
        lineage
    }

    /// Every name related to `name` by inheritance in this chain: its
    /// ancestors, itself, and the definitions derived from it. Chain order.
    pub fn lineage_of(&self, name: &str) -> Vec<String> {
        let ancestors = self.ancestor_names(name);
        if ancestors.is_empty() {
            return ancestors;
        }

        let mut lineage: Vec<String> = Vec::new();
        for link in &self.links {
            let candidate = link.name();
            let related = ancestors.iter().any(|a| a == candidate)
                || self
                    .ancestor_names(candidate)
                    .iter()
                    .any(|ancestor| ancestor == name);
            if related && !lineage.iter().any(|seen| seen == candidate) {
                lineage.push(candidate.to_string());
            }
        }
        lineage
    }
}

/// Loads an [`AncestryChain`] through the injected collaborators.
pub struct AncestryBuilder<'a> {
    source: &'a dyn DefinitionSource,
    parser: &'a dyn ReferenceParser,
    max_depth: usize,
}

impl<'a> AncestryBuilder<'a> {
    pub fn new(
        source: &'a dyn DefinitionSource,
        parser: &'a dyn ReferenceParser,
        max_depth: usize,
    ) -> Self {
        Self {
            source,
            parser,
            max_depth,
        }
    }

    /// Load `location` and all of its ancestors.
    ///
    /// # Errors
    ///
    /// - [`Error::Meta`] when any layer fails to load
    /// - [`Error::CyclicInheritance`] when a location is visited twice
    /// - [`Error::AncestryTooDeep`] when the chain exceeds the depth limit
    pub fn build(&self, location: &str) -> Result<AncestryChain> {
        let mut visited = Vec::new();
        let mut links = Vec::new();
        self.collect(location.trim(), &mut visited, &mut links)?;
        Ok(AncestryChain { links })
    }

    fn collect(
        &self,
        location: &str,
        visited: &mut Vec<String>,
        links: &mut Vec<ChainLink>,
    ) -> Result<()> {
        if visited.iter().any(|seen| seen == location) {
            let mut chain = visited.clone();
            chain.push(location.to_string());
            return Err(Error::CyclicInheritance { chain });
        }
        if visited.len() >= self.max_depth {
            return Err(Error::AncestryTooDeep {
                location: location.to_string(),
                max_depth: self.max_depth,
            });
        }
        visited.push(location.to_string());

        let definition = self.source.load(location)?;
        tracing::debug!(
            location,
            name = definition.name(),
            depth = visited.len(),
            "Loaded ancestry layer"
        );

        let parent = parse_parent(&definition, self.parser);
        if let Some(reference) = parent.value() {
            if reference.path.is_empty() {
                tracing::warn!(
                    location,
                    name = definition.name(),
                    "Parent reference has no location; treating definition as root"
                );
            } else {
                self.collect(&reference.path, visited, links)?;
                let loaded = links.last().map(ChainLink::name).unwrap_or_default();
                if !reference.name.is_empty() && loaded != reference.name {
                    tracing::warn!(
                        expected = %reference.name,
                        found = loaded,
                        "Parent declares a different name than referenced"
                    );
                }
            }
        }

        links.push(ChainLink {
            location: location.to_string(),
            definition,
            parent,
        });
        Ok(())
    }
}

fn parse_parent(definition: &Definition, parser: &dyn ReferenceParser) -> Resolution<ParentReference> {
    match definition.parent_reference() {
        Some(raw) => parser.parse(raw),
        None => Resolution::Unresolved,
    }
}

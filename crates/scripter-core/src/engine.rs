//! The resolution facade
//!
//! [`SignalResolver`] owns the injected collaborators (definition source,
//! parent reference parser and host probe) and runs the whole pipeline for
//! one starting definition.

use crate::ancestry::{AncestryBuilder, AncestryChain};
use crate::config::EngineConfig;
use crate::context::ContextResolver;
use crate::host::{HostProbe, SystemHost};
use crate::property::PropertyExtractor;
use crate::resolver::PropertyResolver;
use crate::signal::{Originator, Signal, SignalAssembler};
use crate::steps::StepAggregator;
use crate::Result;
use scripter_meta::{ArrowReferenceParser, DefinitionSource, ReferenceParser};

/// Resolves a definition and its ancestors into a [`Signal`]
///
/// A resolver holds no per-run state; one instance can serve concurrent
/// resolutions from several threads.
pub struct SignalResolver {
    source: Box<dyn DefinitionSource>,
    parser: Box<dyn ReferenceParser>,
    host: Box<dyn HostProbe>,
    config: EngineConfig,
}

impl SignalResolver {
    /// Create a resolver reading definitions from `source`, using the
    /// `=>` reference parser, the real host and the default configuration.
    pub fn new(source: impl DefinitionSource + 'static) -> Self {
        let config = EngineConfig::default();
        Self {
            source: Box::new(source),
            parser: Box::new(ArrowReferenceParser::with_separator(
                config.parent_separator.clone(),
            )),
            host: Box::new(SystemHost),
            config,
        }
    }

    pub fn with_host(mut self, host: impl HostProbe + 'static) -> Self {
        self.host = Box::new(host);
        self
    }

    pub fn with_parser(mut self, parser: impl ReferenceParser + 'static) -> Self {
        self.parser = Box::new(parser);
        self
    }

    /// Apply `config`. Replaces the reference parser with one using the
    /// configured separator, so call [`with_parser`](Self::with_parser)
    /// afterwards to keep a custom parser.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.parser = Box::new(ArrowReferenceParser::with_separator(
            config.parent_separator.clone(),
        ));
        self.config = config;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Load the ancestry chain for `location` without resolving it.
    pub fn ancestry(&self, location: &str) -> Result<AncestryChain> {
        AncestryBuilder::new(
            self.source.as_ref(),
            self.parser.as_ref(),
            self.config.max_ancestry_depth,
        )
        .build(location)
    }

    /// Resolve the definition at `location` into a finished signal.
    ///
    /// # Arguments
    ///
    /// * `location` - Where the most-derived definition lives
    /// * `originator` - The requesting process, if any
    ///
    /// # Errors
    ///
    /// Fails when any ancestor cannot be loaded or the chain is cyclic or
    /// too deep. No partial signal is produced.
    pub fn resolve(&self, location: &str, originator: Option<&Originator>) -> Result<Signal> {
        let chain = self.ancestry(location)?;
        Ok(self.resolve_chain(&chain, originator))
    }

    /// Resolve an already-loaded chain.
    pub fn resolve_chain(&self, chain: &AncestryChain, originator: Option<&Originator>) -> Signal {
        let sender = chain.leaf().map(|leaf| leaf.name()).unwrap_or_default();
        let extraction = PropertyExtractor::new().extract_all(chain.definitions());
        let resolved = PropertyResolver::resolve(sender, &extraction.properties);

        let mut signal =
            SignalAssembler::new(self.host.as_ref()).assemble(&resolved, &extraction.labels, originator);

        if signal.environment.as_deref() == Some(self.config.default_environment.as_str()) {
            tracing::debug!(
                sender = %signal.sender,
                "Default environment chosen, skipping contexts and steps"
            );
            return signal;
        }

        ContextResolver::new().apply(&mut signal, &extraction.context_properties);
        let steps = StepAggregator::new().aggregate(chain);
        SignalAssembler::finish(&mut signal, steps);

        tracing::debug!(
            sender = %signal.sender,
            steps = signal.steps.len(),
            quays = signal.emit_quays.len(),
            "Resolved signal"
        );
        signal
    }
}

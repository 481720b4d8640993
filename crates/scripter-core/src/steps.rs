//! Step plan aggregation across the ancestry chain
//!
//! A definition whose steps block carries a `can-overwrite` annotation and
//! either allows override or lists no steps is *overridable*. Every other
//! definition contributes its steps as candidates. A candidate reaches the
//! final plan only when some definition in its source's lineage is
//! overridable. A definition without the annotation never opens anything.

use crate::ancestry::AncestryChain;
use crate::signal::SignalStep;
use scripter_meta::StepsBlock;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, Default)]
pub struct StepAggregator;

impl StepAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Names of the definitions whose steps block is overridable.
    pub fn overridable_sources(&self, chain: &AncestryChain) -> BTreeSet<String> {
        chain
            .definitions()
            .filter(|definition| is_overridable(&definition.steps))
            .map(|definition| definition.name().to_string())
            .collect()
    }

    /// Steps of every non-overridable definition, in chain order.
    pub fn candidate_steps(&self, chain: &AncestryChain) -> Vec<SignalStep> {
        let overridable = self.overridable_sources(chain);
        chain
            .definitions()
            .filter(|definition| !overridable.contains(definition.name()))
            .flat_map(|definition| {
                definition.steps.list.iter().map(move |entry| {
                    SignalStep::new(
                        entry.step.trim(),
                        entry.pointer.trim(),
                        definition.name(),
                    )
                })
            })
            .collect()
    }

    /// Final ordered step plan, without duplicates.
    pub fn aggregate(&self, chain: &AncestryChain) -> Vec<SignalStep> {
        let overridable = self.overridable_sources(chain);
        let mut plan: Vec<SignalStep> = Vec::new();

        for step in self.candidate_steps(chain) {
            // Candidates never come from an overridable source, so only
            // relatives can open them.
            let opened_by = chain
                .lineage_of(&step.source)
                .into_iter()
                .find(|name| overridable.contains(name));

            match opened_by {
                Some(opened_by) if !plan.contains(&step) => {
                    tracing::debug!(
                        step = %step.name,
                        source = %step.source,
                        opened_by = %opened_by,
                        "Including step"
                    );
                    plan.push(step);
                }
                Some(_) => {}
                None => {
                    tracing::debug!(
                        step = %step.name,
                        source = %step.source,
                        "Dropping step, no overridable definition in its lineage"
                    );
                }
            }
        }
        plan
    }
}

fn is_overridable(steps: &StepsBlock) -> bool {
    match steps.can_overwrite {
        Some(can_overwrite) => can_overwrite || steps.list.is_empty(),
        None => false,
    }
}

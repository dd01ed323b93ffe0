use crate::{
    domain::{Criterion, IdAllocator},
    extract::{ExtractionInput, Strategy},
};

/// Wraps criterion strings stored directly on the work item.
///
/// Some trackers keep acceptance criteria in a dedicated field rather
/// than in the description; those strings are already discrete, so each
/// one simply becomes a criterion. Identifiers are namespaced by the
/// item key (`PROJ-123-AC-1`, ...) so they cannot collide with the
/// `AC-n` identifiers derived from free text.
#[derive(Debug, Default)]
pub struct ExplicitExtractor;

impl Strategy for ExplicitExtractor {
    fn extract(&self, input: &ExtractionInput) -> Vec<Criterion> {
        let mut ids = IdAllocator::scoped(input.key().clone());

        input
            .explicit()
            .iter()
            .filter_map(|raw| {
                let criterion = Criterion::new(ids.next_id(), raw);
                if criterion.is_none() {
                    tracing::debug!("skipping blank entry in explicit criteria list");
                }
                criterion
            })
            .collect()
    }
}

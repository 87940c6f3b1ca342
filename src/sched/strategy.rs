use crate::common::{LinkId, Mac48, StaSlot};
use crate::registry::StationRegistry;

/// One station chosen for a multi-user opportunity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub slot: StaSlot,
    pub aid: u16,
    pub addr: Mac48,
}

/// Candidate-selection capability composed by the engine.
///
/// Implementations own their per-link rotation state; the engine never
/// reaches into it. `select` must not return a station twice within one
/// call and must honor `excluded` for the current cycle only.
pub trait SelectionStrategy {
    /// Up to `max_count` queued, eligible stations on `link`, in serving
    /// order. An empty result means nothing to schedule, not an error.
    fn select(
        &mut self,
        link: LinkId,
        max_count: usize,
        registry: &StationRegistry,
        excluded: &[StaSlot],
    ) -> Vec<Candidate>;

    /// A station became eligible on `link`.
    fn station_joined(&mut self, link: LinkId, slot: StaSlot);

    /// A station stopped being eligible on `link`.
    fn station_left(&mut self, link: LinkId, slot: StaSlot);

    /// Rebuild the rotation for `link` from the registry's current
    /// eligible set.
    fn rebuild(&mut self, link: LinkId, registry: &StationRegistry);
}

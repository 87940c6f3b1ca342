//! Resource-unit allocation for one multi-user exchange.

use crate::common::{Mac48, StaSlot};

use super::strategy::Candidate;

/// Index of one disjoint resource unit within the capacity declared by the
/// caller for this exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuIndex(pub u8);

/// One station's assignment within an allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuAssignment {
    pub slot: StaSlot,
    pub aid: u16,
    pub addr: Mac48,
    pub ru: RuIndex,
}

/// Station-to-resource-unit mapping for one multi-user exchange.
///
/// Resource units are disjoint and every covered candidate appears exactly
/// once. An empty allocation is the declared "no multi-user opportunity
/// this round" outcome, not a failure.
#[derive(Debug, Clone, Default)]
pub struct RuAllocation {
    entries: Vec<RuAssignment>,
}

impl RuAllocation {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[RuAssignment] {
        &self.entries
    }

    pub fn ru_of(&self, slot: StaSlot) -> Option<RuIndex> {
        self.entries.iter().find(|e| e.slot == slot).map(|e| e.ru)
    }

    pub fn stations(&self) -> impl Iterator<Item = StaSlot> + '_ {
        self.entries.iter().map(|e| e.slot)
    }
}

/// Map a prefix of `candidates` onto disjoint resource units.
///
/// Covers as many candidates as fit within `capacity`, preserving their
/// relative order.
pub fn build_allocation(candidates: &[Candidate], capacity: usize) -> RuAllocation {
    assert!(capacity <= u8::MAX as usize + 1, "capacity beyond RU index space");

    let count = candidates.len().min(capacity);
    let entries = candidates[..count]
        .iter()
        .enumerate()
        .map(|(i, c)| RuAssignment {
            slot: c.slot,
            aid: c.aid,
            addr: c.addr,
            ru: RuIndex(i as u8),
        })
        .collect();

    RuAllocation { entries }
}

//! Station Registry: per-station state shared with the scheduler.
//!
//! The registry is owned by the association/queue collaborators; the
//! scheduler reads it and stores `StaSlot` arena indices only, never
//! mutating station entities itself.

use std::collections::HashMap;

use crate::common::{LinkId, LinkMask, Mac48, SimTime, StaSlot};

/// Association identifiers cycle within the 802.11 AID space.
const MAX_AID: u16 = 2007;

/// Per-station state.
#[derive(Debug, Clone)]
pub struct StationRecord {
    pub addr: Mac48,
    /// Association identifier assigned at association time.
    pub aid: u16,
    /// Links the station currently operates on.
    pub links: LinkMask,
    /// Capability flag: station supports MU exchanges.
    pub mu_capable: bool,
    /// Queue occupancy: station has traffic pending (downlink-buffered or
    /// reported uplink). Maintained by the queue collaborator.
    pub buffered: bool,
    /// Monotonic association sequence; lower means associated earlier.
    pub assoc_seq: u64,
    pub last_served: Option<SimTime>,
}

impl StationRecord {
    /// Associated, MU capable and operating on `link`.
    pub fn eligible_on(&self, link: LinkId) -> bool {
        self.mu_capable && self.links.contains(link)
    }
}

/// Arena of station records with stable slot indices.
#[derive(Debug, Default)]
pub struct StationRegistry {
    slots: Vec<Option<StationRecord>>,
    by_addr: HashMap<Mac48, StaSlot>,
    next_assoc_seq: u64,
    next_aid: u16,
}

impl StationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit a station, reusing the first free arena slot.
    pub fn associate(&mut self, addr: Mac48, links: LinkMask, mu_capable: bool) -> StaSlot {
        assert!(
            !self.by_addr.contains_key(&addr),
            "station {} already associated",
            addr
        );

        let aid = self.next_aid % MAX_AID + 1;
        self.next_aid = aid;
        let assoc_seq = self.next_assoc_seq;
        self.next_assoc_seq += 1;

        let record = StationRecord {
            addr,
            aid,
            links,
            mu_capable,
            buffered: false,
            assoc_seq,
            last_served: None,
        };

        let slot = match self.slots.iter().position(|s| s.is_none()) {
            Some(idx) => {
                self.slots[idx] = Some(record);
                StaSlot(idx as u16)
            }
            None => {
                self.slots.push(Some(record));
                StaSlot((self.slots.len() - 1) as u16)
            }
        };

        self.by_addr.insert(addr, slot);
        tracing::debug!("associated {} as aid {} in slot {}", addr, aid, slot);
        slot
    }

    /// Remove a station, freeing its slot for reuse.
    pub fn disassociate(&mut self, slot: StaSlot) -> Option<StationRecord> {
        let record = self.slots.get_mut(slot.0 as usize)?.take()?;
        self.by_addr.remove(&record.addr);
        tracing::debug!("disassociated {} from slot {}", record.addr, slot);
        Some(record)
    }

    pub fn get(&self, slot: StaSlot) -> Option<&StationRecord> {
        self.slots.get(slot.0 as usize)?.as_ref()
    }

    pub fn slot_of(&self, addr: Mac48) -> Option<StaSlot> {
        self.by_addr.get(&addr).copied()
    }

    pub fn set_buffered(&mut self, slot: StaSlot, buffered: bool) {
        if let Some(record) = self.record_mut(slot) {
            record.buffered = buffered;
        }
    }

    pub fn set_links(&mut self, slot: StaSlot, links: LinkMask) {
        if let Some(record) = self.record_mut(slot) {
            record.links = links;
        }
    }

    pub fn set_mu_capable(&mut self, slot: StaSlot, mu_capable: bool) {
        if let Some(record) = self.record_mut(slot) {
            record.mu_capable = mu_capable;
        }
    }

    /// Stamp a station as served. Called by the completion collaborator,
    /// not by the scheduler.
    pub fn mark_served(&mut self, slot: StaSlot, at: SimTime) {
        if let Some(record) = self.record_mut(slot) {
            record.last_served = Some(at);
        }
    }

    /// All stations eligible for MU scheduling on `link`.
    pub fn iter_eligible(&self, link: LinkId) -> impl Iterator<Item = (StaSlot, &StationRecord)> {
        self.slots.iter().enumerate().filter_map(move |(idx, s)| {
            let record = s.as_ref()?;
            record
                .eligible_on(link)
                .then_some((StaSlot(idx as u16), record))
        })
    }

    /// Address of the earliest-associated station eligible on `link`.
    pub fn earliest_associated(&self, link: LinkId) -> Option<Mac48> {
        self.iter_eligible(link)
            .min_by_key(|(_, record)| record.assoc_seq)
            .map(|(_, record)| record.addr)
    }

    pub fn station_count(&self) -> usize {
        self.by_addr.len()
    }

    fn record_mut(&mut self, slot: StaSlot) -> Option<&mut StationRecord> {
        self.slots.get_mut(slot.0 as usize)?.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(last: u8) -> Mac48 {
        Mac48::new([0x02, 0, 0, 0, 0, last])
    }

    #[test]
    fn test_slot_reuse_after_disassociation() {
        let mut reg = StationRegistry::new();
        let a = reg.associate(addr(1), LinkMask::single(LinkId(0)), true);
        let b = reg.associate(addr(2), LinkMask::single(LinkId(0)), true);
        assert_eq!(reg.station_count(), 2);

        reg.disassociate(a);
        assert!(reg.get(a).is_none());
        assert_eq!(reg.station_count(), 1);

        // Freed slot is reused, with a fresh association sequence
        let c = reg.associate(addr(3), LinkMask::single(LinkId(0)), true);
        assert_eq!(c, a);
        let rec_b = reg.get(b).unwrap(); // testing
        let rec_c = reg.get(c).unwrap(); // testing
        assert!(rec_c.assoc_seq > rec_b.assoc_seq);
        assert_eq!(reg.slot_of(addr(3)), Some(c));
    }

    #[test]
    fn test_eligibility_and_earliest_query() {
        let mut reg = StationRegistry::new();
        let a = reg.associate(addr(1), LinkMask::single(LinkId(0)), true);
        let b = reg.associate(addr(2), LinkMask::from_links(&[LinkId(0), LinkId(1)]), true);
        let _c = reg.associate(addr(3), LinkMask::single(LinkId(0)), false); // not MU capable

        let on_link0: Vec<StaSlot> = reg.iter_eligible(LinkId(0)).map(|(s, _)| s).collect();
        assert_eq!(on_link0, vec![a, b]);
        let on_link1: Vec<StaSlot> = reg.iter_eligible(LinkId(1)).map(|(s, _)| s).collect();
        assert_eq!(on_link1, vec![b]);

        assert_eq!(reg.earliest_associated(LinkId(0)), Some(addr(1)));
        assert_eq!(reg.earliest_associated(LinkId(1)), Some(addr(2)));
        assert_eq!(reg.earliest_associated(LinkId(2)), None);

        // Dropping the earliest moves the anchor to the next oldest
        reg.disassociate(a);
        assert_eq!(reg.earliest_associated(LinkId(0)), Some(addr(2)));
    }

    #[test]
    fn test_queue_occupancy_updates() {
        let mut reg = StationRegistry::new();
        let a = reg.associate(addr(1), LinkMask::single(LinkId(0)), true);
        assert!(!reg.get(a).unwrap().buffered); // testing

        reg.set_buffered(a, true);
        assert!(reg.get(a).unwrap().buffered); // testing

        reg.mark_served(a, SimTime::from_micros(42));
        assert_eq!(reg.get(a).unwrap().last_served, Some(SimTime::from_micros(42))); // testing
    }
}

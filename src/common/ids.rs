use std::fmt;

/// Radio link identifier for multi-link operation. 0-7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkId(pub u8);

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index of a station record in the registry arena. The scheduler holds
/// these indices and never owns station state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StaSlot(pub u16);

impl fmt::Display for StaSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Set of links a station operates on, one bit per `LinkId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinkMask(u8);

impl LinkMask {
    pub fn empty() -> Self {
        LinkMask(0)
    }

    pub fn single(link: LinkId) -> Self {
        let mut mask = LinkMask(0);
        mask.insert(link);
        mask
    }

    pub fn from_links(links: &[LinkId]) -> Self {
        let mut mask = LinkMask(0);
        for &link in links {
            mask.insert(link);
        }
        mask
    }

    pub fn contains(&self, link: LinkId) -> bool {
        assert!(link.0 < 8, "Invalid link id {}", link.0);
        self.0 & (1 << link.0) != 0
    }

    pub fn insert(&mut self, link: LinkId) {
        assert!(link.0 < 8, "Invalid link id {}", link.0);
        self.0 |= 1 << link.0;
    }

    pub fn remove(&mut self, link: LinkId) {
        assert!(link.0 < 8, "Invalid link id {}", link.0);
        self.0 &= !(1 << link.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

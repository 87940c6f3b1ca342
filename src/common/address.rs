use std::fmt;
use std::str::FromStr;

/// 48-bit IEEE hardware address, link-scoped identity of a station.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Mac48([u8; 6]);

impl Mac48 {
    pub const BROADCAST: Mac48 = Mac48([0xff; 6]);

    pub fn new(octets: [u8; 6]) -> Self {
        Mac48(octets)
    }

    pub fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl fmt::Display for Mac48 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

impl fmt::Debug for Mac48 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mac48({})", self)
    }
}

impl FromStr for Mac48 {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 6 {
            return Err(format!("Invalid hardware address {}", s));
        }
        let mut octets = [0u8; 6];
        for (i, part) in parts.iter().enumerate() {
            octets[i] = u8::from_str_radix(part, 16)
                .map_err(|_| format!("Invalid octet {} in hardware address {}", part, s))?;
        }
        Ok(Mac48(octets))
    }
}

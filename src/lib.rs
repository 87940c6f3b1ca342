//! Multi-user (MU) scheduling core for an 802.11-style access point MAC.
//!
//! Decides, for each transmission opportunity granted on a radio link, which
//! associated stations to serve in one multi-user exchange (downlink MU or
//! solicited uplink via trigger frame), keeps per-link round-robin fairness,
//! and recovers from solicited stations that never respond. Driven by a
//! discrete-event loop; frame construction and PHY belong to collaborators.

pub mod common;
pub mod events;
pub mod registry;
pub mod sched;

pub use common::{DlMuTxParams, LinkId, LinkMask, Mac48, MessageQueue, SchedMsg, SimTime, StaSlot, UlTriggerParams};
pub use events::{EventQueue, SchedEvent, TimerHandle, TimerScheduler};
pub use registry::{StationRecord, StationRegistry};
pub use sched::{
    Candidate, MuScheduler, RoundRobin, RuAllocation, RuIndex, SchedError, SelectionStrategy,
    TxFormat, build_allocation,
};

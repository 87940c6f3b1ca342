use std::collections::VecDeque;

use crate::common::LinkId;
use crate::sched::allocation::RuAllocation;

/// Downlink MU PPDU parameters for the frame-construction collaborator.
#[derive(Debug, Clone)]
pub struct DlMuTxParams {
    pub link_id: LinkId,
    pub alloc: RuAllocation,
}

/// Trigger frame parameters soliciting an uplink MU response.
#[derive(Debug, Clone)]
pub struct UlTriggerParams {
    pub link_id: LinkId,
    pub alloc: RuAllocation,
    /// Window the solicited stations have to respond, in microseconds.
    pub response_window_us: u64,
}

/// Outbound primitives from the scheduler to the transmission collaborator.
#[derive(Debug, Clone)]
pub enum SchedMsg {
    DlMuTx(DlMuTxParams),
    UlMuTrigger(UlTriggerParams),
}

/// FIFO of outbound scheduler primitives, drained by the caller after each
/// engine invocation.
#[derive(Debug, Default)]
pub struct MessageQueue {
    msgs: VecDeque<SchedMsg>,
}

impl MessageQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_back(&mut self, msg: SchedMsg) {
        self.msgs.push_back(msg);
    }

    pub fn pop_front(&mut self) -> Option<SchedMsg> {
        self.msgs.pop_front()
    }

    pub fn len(&self) -> usize {
        self.msgs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.msgs.is_empty()
    }
}

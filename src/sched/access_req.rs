//! Solicited-uplink recovery: the Armed/Resolved/TimedOut lifecycle of a
//! pending access request.

use std::collections::HashMap;

use uuid::Uuid;

use crate::common::{LinkId, SimTime, StaSlot};
use crate::events::{TimerHandle, TimerScheduler};

use super::error::SchedError;

/// A solicited-uplink request armed on one link, waiting for any solicited
/// station to respond before `deadline`.
#[derive(Debug)]
pub struct PendingAccessRequest {
    /// Session identifier, carried through logs for correlation.
    pub session: Uuid,
    /// Stations solicited by the trigger frame.
    pub stations: Vec<StaSlot>,
    pub deadline: SimTime,
    /// Cancellation handle for the deadline timer.
    pub timer: TimerHandle,
}

/// Tracks at most one pending access request per link, plus the stations
/// excluded from the immediate next selection after a timeout.
#[derive(Debug, Default)]
pub struct AccessReqTracker {
    pending: HashMap<LinkId, PendingAccessRequest>,
    excluded: HashMap<LinkId, Vec<StaSlot>>,
}

impl AccessReqTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self, link: LinkId) -> bool {
        self.pending.contains_key(&link)
    }

    pub fn pending(&self, link: LinkId) -> Option<&PendingAccessRequest> {
        self.pending.get(&link)
    }

    /// Arm a request (Armed state). Rejected while another request is
    /// pending on the same link; the existing request is left untouched.
    pub fn arm(
        &mut self,
        link: LinkId,
        stations: Vec<StaSlot>,
        deadline: SimTime,
        timer: TimerHandle,
    ) -> Result<Uuid, SchedError> {
        if self.pending.contains_key(&link) {
            return Err(SchedError::SolicitationPending(link));
        }

        let session = Uuid::new_v4();
        tracing::debug!(
            "link {}: armed access request {} for {} stations, deadline {}",
            link,
            session,
            stations.len(),
            deadline
        );
        self.pending.insert(
            link,
            PendingAccessRequest {
                session,
                stations,
                deadline,
                timer,
            },
        );
        Ok(session)
    }

    /// A response (or explicit failure notification) arrived from `sta`.
    /// Resolves the request if `sta` was solicited; the deadline timer is
    /// cancelled exactly once. Returns true when the request resolved.
    pub fn resolve(&mut self, link: LinkId, sta: StaSlot, timers: &mut dyn TimerScheduler) -> bool {
        let solicited = match self.pending.get(&link) {
            None => return false,
            Some(req) => req.stations.contains(&sta),
        };
        if !solicited {
            tracing::trace!(
                "link {}: response from non-solicited station slot {}, ignored",
                link,
                sta
            );
            return false;
        }

        let Some(req) = self.pending.remove(&link) else {
            return false;
        };
        timers.cancel(req.timer);
        tracing::debug!("link {}: access request {} resolved", link, req.session);
        true
    }

    /// The deadline timer fired (TimedOut state). Moves the solicited
    /// stations into the one-cycle exclusion list and returns them. None
    /// when no request is pending, i.e. a stale event for an
    /// already-resolved request.
    pub fn timed_out(&mut self, link: LinkId) -> Option<Vec<StaSlot>> {
        let req = self.pending.remove(&link)?;
        tracing::warn!(
            "link {}: access request {} timed out, excluding {} stations for one cycle",
            link,
            req.session,
            req.stations.len()
        );
        self.excluded.insert(link, req.stations.clone());
        Some(req.stations)
    }

    /// Exclusions recorded by a timeout, consumed by the next selection on
    /// the link.
    pub fn take_excluded(&mut self, link: LinkId) -> Vec<StaSlot> {
        self.excluded.remove(&link).unwrap_or_default()
    }
}

//! Multi-link scheduling engine: the access-grant entry point composing the
//! selection strategy, allocation builder, transmission-type tracker and
//! access-request timeout handler.

use apsched_config::{FallbackPolicy, SharedConfig};

use crate::common::{
    DlMuTxParams, LinkId, Mac48, MessageQueue, SchedMsg, SimTime, StaSlot, UlTriggerParams,
};
use crate::events::{SchedEvent, TimerScheduler};
use crate::registry::StationRegistry;

use super::access_req::AccessReqTracker;
use super::allocation::build_allocation;
use super::error::SchedError;
use super::rotation::RoundRobin;
use super::strategy::SelectionStrategy;
use super::txrecord::TxTracker;

/// Transmission format decided for one access grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxFormat {
    /// Nothing to schedule this cycle.
    NoTx,
    /// Downlink multi-user PPDU.
    DlMuTx,
    /// Solicited uplink via trigger frame.
    UlMuTx,
}

/// One engine instance serves all configured links.
///
/// The engine owns its rotation, allocation and timer state only. Station
/// state lives in the registry and is read through `StaSlot` indices; the
/// registry's owning collaborator is the only writer there.
pub struct MuScheduler {
    config: SharedConfig,
    links: Vec<LinkId>,
    strategy: Box<dyn SelectionStrategy>,
    tx_records: TxTracker,
    access_req: AccessReqTracker,
}

impl MuScheduler {
    /// Engine with the default round-robin strategy.
    pub fn new(config: SharedConfig) -> Self {
        Self::with_strategy(config, Box::new(RoundRobin::new()))
    }

    pub fn with_strategy(config: SharedConfig, strategy: Box<dyn SelectionStrategy>) -> Self {
        let links = config
            .config()
            .links
            .ids
            .iter()
            .map(|&id| LinkId(id))
            .collect();
        Self {
            config,
            links,
            strategy,
            tx_records: TxTracker::new(),
            access_req: AccessReqTracker::new(),
        }
    }

    pub fn links(&self) -> &[LinkId] {
        &self.links
    }

    fn check_link(&self, link: LinkId) -> Result<(), SchedError> {
        if self.links.contains(&link) {
            Ok(())
        } else {
            Err(SchedError::UnknownLink(link))
        }
    }

    /// Entry point for a transmission opportunity granted on `link`.
    ///
    /// Runs candidate selection and allocation, decides the transmission
    /// format, arms the response deadline when soliciting uplink, and
    /// pushes the resulting plan onto `queue` for the transmission
    /// collaborator. An empty candidate set yields `TxFormat::NoTx` with
    /// nothing pushed.
    pub fn notify_access_granted(
        &mut self,
        queue: &mut MessageQueue,
        registry: &StationRegistry,
        timers: &mut dyn TimerScheduler,
        link: LinkId,
    ) -> Result<TxFormat, SchedError> {
        self.check_link(link)?;
        let cfg = self.config.config();

        let excluded = self.access_req.take_excluded(link);
        let candidates =
            self.strategy
                .select(link, cfg.mu.max_ru_count as usize, registry, &excluded);
        if candidates.is_empty() {
            tracing::debug!("link {}: no queued eligible stations, passing on opportunity", link);
            return Ok(TxFormat::NoTx);
        }

        // Solicit uplink after a completed downlink MU exchange, unless
        // disabled, suspended, or a solicitation is still outstanding.
        let ul_wanted = cfg.mu.ul_enabled
            && !self.config.state_read().ul_mu_suspended
            && self.tx_records.last_tx_is_dl_mu(link)
            && !self.access_req.is_pending(link);

        let alloc = build_allocation(&candidates, cfg.mu.max_ru_count as usize);

        if ul_wanted {
            let deadline = timers.now().plus_micros(cfg.mu.response_window_us);
            let timer = timers.schedule_at(deadline, SchedEvent::AccessReqTimeout { link_id: link });
            let stations: Vec<StaSlot> = alloc.stations().collect();
            self.access_req.arm(link, stations, deadline, timer)?;

            tracing::info!(
                "link {}: soliciting uplink MU from {} stations, window {}us",
                link,
                alloc.len(),
                cfg.mu.response_window_us
            );
            queue.push_back(SchedMsg::UlMuTrigger(UlTriggerParams {
                link_id: link,
                alloc,
                response_window_us: cfg.mu.response_window_us,
            }));
            Ok(TxFormat::UlMuTx)
        } else {
            tracing::info!("link {}: downlink MU to {} stations", link, alloc.len());
            queue.push_back(SchedMsg::DlMuTx(DlMuTxParams {
                link_id: link,
                alloc,
            }));
            Ok(TxFormat::DlMuTx)
        }
    }

    /// Response (or explicit failure notification) from a solicited
    /// station. Returns true when it resolved the pending access request.
    pub fn notify_solicited_response(
        &mut self,
        timers: &mut dyn TimerScheduler,
        link: LinkId,
        sta: StaSlot,
    ) -> Result<bool, SchedError> {
        self.check_link(link)?;
        Ok(self.access_req.resolve(link, sta, timers))
    }

    /// Completion of a transmission attempt on `link`.
    pub fn record_completion(
        &mut self,
        link: LinkId,
        was_dl_mu: bool,
        at: SimTime,
    ) -> Result<(), SchedError> {
        self.check_link(link)?;
        self.tx_records.record_completion(link, was_dl_mu, at);
        Ok(())
    }

    /// Whether the last completed transmission on `link` was a downlink MU
    /// exchange. False for a link with no recorded completion.
    pub fn last_tx_is_dl_mu(&self, link: LinkId) -> bool {
        self.tx_records.last_tx_is_dl_mu(link)
    }

    /// Address of the earliest-associated station eligible on `link`.
    pub fn first_assoc_sta(&self, registry: &StationRegistry, link: LinkId) -> Option<Mac48> {
        registry.earliest_associated(link)
    }

    /// Timer event dispatch from the event loop.
    pub fn handle_event(
        &mut self,
        queue: &mut MessageQueue,
        registry: &StationRegistry,
        timers: &mut dyn TimerScheduler,
        event: SchedEvent,
    ) {
        match event {
            SchedEvent::AccessReqTimeout { link_id } => {
                self.access_req_timeout(queue, registry, timers, link_id);
            }
        }
    }

    /// Deadline passed with no solicited response: apply the fallback
    /// policy. Recoverable; operation continues with degraded multiplexing
    /// for this cycle.
    fn access_req_timeout(
        &mut self,
        queue: &mut MessageQueue,
        registry: &StationRegistry,
        timers: &mut dyn TimerScheduler,
        link: LinkId,
    ) {
        let Some(stations) = self.access_req.timed_out(link) else {
            tracing::debug!("link {}: timeout event for resolved access request, discarded", link);
            return;
        };

        match self.config.config().mu.fallback {
            FallbackPolicy::Reschedule => {
                // Produce a reduced or alternate plan right away, with the
                // silent stations excluded for this cycle
                match self.notify_access_granted(queue, registry, timers, link) {
                    Ok(format) => {
                        tracing::debug!("link {}: fallback rescheduling produced {:?}", link, format)
                    }
                    Err(e) => tracing::warn!("link {}: fallback rescheduling rejected: {}", link, e),
                }
            }
            FallbackPolicy::Defer => {
                tracing::debug!(
                    "link {}: deferring {} excluded stations to the next access grant",
                    link,
                    stations.len()
                );
            }
        }
    }

    /// A station finished associating; fold it into the rotations of the
    /// links it is eligible on.
    pub fn notify_station_associated(&mut self, registry: &StationRegistry, slot: StaSlot) {
        for &link in &self.links {
            if registry.get(slot).is_some_and(|r| r.eligible_on(link)) {
                self.strategy.station_joined(link, slot);
            }
        }
    }

    /// A station disassociated; drop it from every rotation.
    pub fn notify_station_disassociated(&mut self, slot: StaSlot) {
        for &link in &self.links {
            self.strategy.station_left(link, slot);
        }
    }

    /// Link membership or MU capability changed; re-derive per-link
    /// eligibility.
    pub fn notify_capability_changed(&mut self, registry: &StationRegistry, slot: StaSlot) {
        for &link in &self.links {
            match registry.get(slot) {
                Some(r) if r.eligible_on(link) => self.strategy.station_joined(link, slot),
                _ => self.strategy.station_left(link, slot),
            }
        }
    }
}

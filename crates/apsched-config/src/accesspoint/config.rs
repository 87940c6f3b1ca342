use std::sync::{Arc, RwLock};

use crate::accesspoint::{ApState, CfgLinks, CfgMu};

/// Static scheduler configuration, immutable after construction.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub debug_log: Option<String>,

    pub mu: CfgMu,
    pub links: CfgLinks,
}

impl SchedulerConfig {
    /// Validate that all required configuration fields are properly set.
    pub fn validate(&self) -> Result<(), &str> {
        if self.mu.max_ru_count == 0 || self.mu.max_ru_count > 8 {
            return Err("mu.max_ru_count must be between 1 and 8");
        }
        if self.mu.response_window_us == 0 {
            return Err("mu.response_window_us must be non-zero");
        }

        if self.links.ids.is_empty() {
            return Err("links.ids must name at least one link");
        }
        if self.links.ids.iter().any(|&id| id >= 8) {
            return Err("links.ids entries must be below 8");
        }
        let mut ids = self.links.ids.clone();
        ids.sort_unstable();
        ids.dedup();
        if ids.len() != self.links.ids.len() {
            return Err("links.ids entries must be unique");
        }

        Ok(())
    }
}

/// Global shared configuration: immutable config + mutable state.
#[derive(Clone)]
pub struct SharedConfig {
    /// Read-only configuration (immutable after construction).
    cfg: Arc<SchedulerConfig>,
    /// Mutable state guarded with RwLock (write by the driver, read by others).
    state: Arc<RwLock<ApState>>,
}

impl SharedConfig {
    pub fn from_config(cfg: SchedulerConfig) -> Self {
        Self::from_parts(cfg, ApState::default())
    }

    pub fn from_parts(cfg: SchedulerConfig, state: ApState) -> Self {
        // Check config for validity before returning the SharedConfig object
        match cfg.validate() {
            Ok(_) => {}
            Err(e) => panic!("Invalid scheduler configuration: {}", e),
        }

        Self {
            cfg: Arc::new(cfg),
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Access immutable config.
    pub fn config(&self) -> Arc<SchedulerConfig> {
        Arc::clone(&self.cfg)
    }

    /// Read guard for mutable state.
    pub fn state_read(&self) -> std::sync::RwLockReadGuard<'_, ApState> {
        self.state.read().expect("ApState RwLock blocked")
    }

    /// Write guard for mutable state.
    pub fn state_write(&self) -> std::sync::RwLockWriteGuard<'_, ApState> {
        self.state.write().expect("ApState RwLock blocked")
    }
}

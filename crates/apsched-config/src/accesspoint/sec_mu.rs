use serde::Deserialize;
use std::collections::HashMap;
use toml::Value;

/// Recovery policy applied when a solicited-uplink response window expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum FallbackPolicy {
    /// Immediately produce a reduced or alternate plan on the same link.
    Reschedule,
    /// Record the exclusion and wait for the next access grant.
    Defer,
}

#[derive(Debug, Clone)]
pub struct CfgMu {
    /// Maximum multiplexing degree: disjoint resource units (and thus
    /// stations) per multi-user exchange. 1-8.
    pub max_ru_count: u8,
    /// Whether solicited uplink MU is enabled at all.
    pub ul_enabled: bool,
    /// Response window armed after a trigger frame, in microseconds of
    /// simulated time.
    pub response_window_us: u64,
    pub fallback: FallbackPolicy,
}

#[derive(Default, Deserialize)]
pub struct MuDto {
    pub max_ru_count: Option<u8>,
    pub ul_enabled: Option<bool>,
    pub response_window_us: Option<u64>,
    pub fallback: Option<FallbackPolicy>,

    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

pub fn mu_dto_to_cfg(mu: MuDto) -> CfgMu {
    CfgMu {
        max_ru_count: mu.max_ru_count.unwrap_or(4),
        ul_enabled: mu.ul_enabled.unwrap_or(true),
        response_window_us: mu.response_window_us.unwrap_or(512),
        fallback: mu.fallback.unwrap_or(FallbackPolicy::Reschedule),
    }
}

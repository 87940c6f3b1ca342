use serde::Deserialize;
use std::collections::HashMap;
use toml::Value;

#[derive(Debug, Clone)]
pub struct CfgLinks {
    /// Identifiers of the active radio links (multi-link operation). 0-7.
    pub ids: Vec<u8>,
}

#[derive(Default, Deserialize)]
pub struct LinksDto {
    pub ids: Option<Vec<u8>>,

    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

pub fn links_dto_to_cfg(li: LinksDto) -> CfgLinks {
    CfgLinks {
        // Single-link operation on link 0 when the section is omitted
        ids: li.ids.unwrap_or_else(|| vec![0]),
    }
}

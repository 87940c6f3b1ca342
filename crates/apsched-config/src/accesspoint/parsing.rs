use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;
use toml::Value;

use super::config::{SchedulerConfig, SharedConfig};
use super::sec_links::{LinksDto, links_dto_to_cfg};
use super::sec_mu::{MuDto, mu_dto_to_cfg};
use super::state::ApState;

/// Build `SharedConfig` from a TOML configuration file
pub fn from_toml_str(toml_str: &str) -> Result<SharedConfig, Box<dyn std::error::Error>> {
    let root: TomlConfigRoot = toml::from_str(toml_str)?;

    // Various sanity checks
    let expected_config_version = "0.3";
    if !root.config_version.eq(expected_config_version) {
        return Err(format!(
            "Unrecognized config_version: {}, expect {}",
            root.config_version, expected_config_version
        )
        .into());
    }
    if !root.extra.is_empty() {
        return Err(format!("Unrecognized top-level fields: {:?}", sorted_keys(&root.extra)).into());
    }
    if !root.mu.extra.is_empty() {
        return Err(format!("Unrecognized fields in mu: {:?}", sorted_keys(&root.mu.extra)).into());
    }
    if !root.links.extra.is_empty() {
        return Err(format!("Unrecognized fields in links: {:?}", sorted_keys(&root.links.extra)).into());
    }

    // Build config from required and optional values
    let cfg = SchedulerConfig {
        debug_log: root.debug_log,
        mu: mu_dto_to_cfg(root.mu),
        links: links_dto_to_cfg(root.links),
    };

    // Mutable runtime state
    let state = ApState::default();

    Ok(SharedConfig::from_parts(cfg, state))
}

/// Build `SharedConfig` from any reader.
pub fn from_reader<R: Read>(reader: R) -> Result<SharedConfig, Box<dyn std::error::Error>> {
    let mut contents = String::new();
    let mut reader = BufReader::new(reader);
    reader.read_to_string(&mut contents)?;
    from_toml_str(&contents)
}

/// Build `SharedConfig` from a file path.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<SharedConfig, Box<dyn std::error::Error>> {
    let f = File::open(path)?;
    let r = BufReader::new(f);
    let cfg = from_reader(r)?;
    Ok(cfg)
}

fn sorted_keys(map: &HashMap<String, Value>) -> Vec<&str> {
    let mut v: Vec<&str> = map.keys().map(|s| s.as_str()).collect();
    v.sort_unstable();
    v
}

/// ----------------------- DTOs for input shape -----------------------

#[derive(Deserialize)]
struct TomlConfigRoot {
    config_version: String,
    debug_log: Option<String>,

    #[serde(default)]
    mu: MuDto,
    #[serde(default)]
    links: LinksDto,

    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accesspoint::sec_mu::FallbackPolicy;

    #[test]
    fn test_full_config() {
        let toml = r#"
config_version = "0.3"

[mu]
max_ru_count = 2
ul_enabled = true
response_window_us = 256
fallback = "Defer"

[links]
ids = [0, 1]
"#;
        let shared = from_toml_str(toml).unwrap(); // testing
        let cfg = shared.config();
        assert_eq!(cfg.mu.max_ru_count, 2);
        assert!(cfg.mu.ul_enabled);
        assert_eq!(cfg.mu.response_window_us, 256);
        assert_eq!(cfg.mu.fallback, FallbackPolicy::Defer);
        assert_eq!(cfg.links.ids, vec![0, 1]);
        assert!(!shared.state_read().ul_mu_suspended);
    }

    #[test]
    fn test_defaults_applied() {
        let toml = "config_version = \"0.3\"\n";
        let shared = from_toml_str(toml).unwrap(); // testing
        let cfg = shared.config();
        assert_eq!(cfg.mu.max_ru_count, 4);
        assert_eq!(cfg.mu.fallback, FallbackPolicy::Reschedule);
        assert_eq!(cfg.links.ids, vec![0]);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let toml = r#"
config_version = "0.3"

[mu]
max_ru_cuont = 2
"#;
        let res = from_toml_str(toml);
        assert!(res.is_err());
        assert!(res.err().unwrap().to_string().contains("max_ru_cuont"));
    }

    #[test]
    fn test_bad_version_rejected() {
        let toml = "config_version = \"0.1\"\n";
        assert!(from_toml_str(toml).is_err());
    }

    #[test]
    #[should_panic(expected = "max_ru_count")]
    fn test_invalid_ru_count_panics() {
        let toml = r#"
config_version = "0.3"

[mu]
max_ru_count = 9
"#;
        let _ = from_toml_str(toml);
    }

    #[test]
    #[should_panic(expected = "links.ids")]
    fn test_duplicate_links_panic() {
        let toml = r#"
config_version = "0.3"

[links]
ids = [1, 1]
"#;
        let _ = from_toml_str(toml);
    }
}

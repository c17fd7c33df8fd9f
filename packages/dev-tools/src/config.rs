//! Environment-driven store configuration for the dev tools
//!
//! # Environment Variables
//!
//! - `DOMTREE_ROOT_ID`: id of the designated root node (default: `root-node`)
//! - `DOMTREE_PROTECT_ROOT`: `true`/`false`, refuse to remove the root (default: `true`)
//! - `DOMTREE_EVENT_CAPACITY`: event channel capacity (default: 128)
//!
//! Values that do not parse, or that `StoreConfig::validate` rejects, fall back
//! to the defaults with a warning.

use domtree_core::StoreConfig;
use std::str::FromStr;

pub const ROOT_ID_VAR: &str = "DOMTREE_ROOT_ID";
pub const PROTECT_ROOT_VAR: &str = "DOMTREE_PROTECT_ROOT";
pub const EVENT_CAPACITY_VAR: &str = "DOMTREE_EVENT_CAPACITY";

/// Build a store configuration from the process environment
pub fn store_config_from_env() -> StoreConfig {
    store_config_from_lookup(|key| std::env::var(key).ok())
}

/// Build a store configuration from an arbitrary variable lookup
pub fn store_config_from_lookup<F>(lookup: F) -> StoreConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = StoreConfig::default();

    if let Some(root_id) = lookup(ROOT_ID_VAR).filter(|v| !v.trim().is_empty()) {
        config = accept(config.clone().with_root_id(root_id.trim()), config, ROOT_ID_VAR);
    }
    if let Some(protect_root) = parse_var(&lookup, PROTECT_ROOT_VAR) {
        config.protect_root = protect_root;
    }
    if let Some(capacity) = parse_var(&lookup, EVENT_CAPACITY_VAR) {
        config = accept(
            config.clone().with_event_channel_capacity(capacity),
            config,
            EVENT_CAPACITY_VAR,
        );
    }

    config
}

/// Keep `candidate` if it validates, otherwise warn and keep `current`
fn accept(candidate: StoreConfig, current: StoreConfig, key: &str) -> StoreConfig {
    match candidate.validate() {
        Ok(()) => candidate,
        Err(e) => {
            tracing::warn!("Ignoring {}: {}", key, e);
            current
        }
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring {}={:?}: not a valid value", key, raw);
            None
        }
    }
}

//! Layered settings loading.
//!
//! Three layers, in priority order: compiled defaults, the user's JSON
//! settings file (deep-merged over the defaults), and `DRAFT_*` environment
//! variables on top. Loading finishes with a clamp pass, so an out-of-range
//! file value can never reach a session.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::warn;

use crate::errors::Result;
use crate::types::{BoundarySetting, DraftSettings, EmptyAssignSetting};

/// Path of the user settings file: `~/.draft/settings.json`.
#[must_use]
pub fn settings_path() -> PathBuf {
    let home = std::env::var_os("HOME").map_or_else(|| PathBuf::from("."), PathBuf::from);
    home.join(".draft").join("settings.json")
}

/// Recursively merge `overlay` over `base`.
///
/// Objects merge key by key; any other value in `overlay` replaces the
/// base value outright.
#[must_use]
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => overlay_value,
                };
                let _ = base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }
        (_, overlay) => overlay,
    }
}

/// Load settings from the default path.
///
/// A missing file is not an error on first run; defaults plus environment
/// overrides apply.
pub fn load_settings() -> Result<DraftSettings> {
    let path = settings_path();
    if path.exists() {
        load_settings_from_path(&path)
    } else {
        let mut settings = DraftSettings::default();
        apply_env_overrides(&mut settings);
        settings.clamp();
        Ok(settings)
    }
}

/// Load settings from a specific file path.
///
/// The file is deep-merged over compiled defaults, then environment
/// overrides and the clamp pass apply.
pub fn load_settings_from_path(path: &Path) -> Result<DraftSettings> {
    let raw = std::fs::read_to_string(path)?;
    let file_value: Value = serde_json::from_str(&raw)?;
    let defaults = serde_json::to_value(DraftSettings::default())?;
    let mut settings: DraftSettings = serde_json::from_value(deep_merge(defaults, file_value))?;
    apply_env_overrides(&mut settings);
    settings.clamp();
    Ok(settings)
}

/// Apply `DRAFT_*` environment overrides (highest priority layer).
fn apply_env_overrides(settings: &mut DraftSettings) {
    if let Some(value) = env_parse::<u64>("DRAFT_INACTIVITY_TIMEOUT_SECONDS") {
        settings.session.inactivity_timeout_seconds = value;
    }
    if let Some(value) = env_parse::<usize>("DRAFT_MAX_PARTICIPANTS") {
        settings.session.max_participants = value;
    }
    if let Some(value) = env_parse::<usize>("DRAFT_MAX_ITEMS") {
        settings.session.max_items = value;
    }
    if let Some(value) = env_parse::<usize>("DRAFT_PAGE_CAPACITY") {
        settings.session.selection_page_capacity = value;
    }
    if let Some(raw) = env_string("DRAFT_EMPTY_ASSIGN") {
        match raw.to_ascii_lowercase().as_str() {
            "ignore" => settings.policy.empty_assign = EmptyAssignSetting::Ignore,
            "reject" => settings.policy.empty_assign = EmptyAssignSetting::Reject,
            other => warn!(value = other, "unrecognized DRAFT_EMPTY_ASSIGN, ignoring"),
        }
    }
    if let Some(raw) = env_string("DRAFT_BOUNDARY_POLICY") {
        match raw.to_ascii_lowercase().as_str() {
            "repeatturn" | "repeat_turn" => {
                settings.policy.boundary = BoundarySetting::RepeatTurn;
            }
            "advanceimmediately" | "advance_immediately" => {
                settings.policy.boundary = BoundarySetting::AdvanceImmediately;
            }
            other => warn!(value = other, "unrecognized DRAFT_BOUNDARY_POLICY, ignoring"),
        }
    }
    if let Some(level) = env_string("DRAFT_LOG_LEVEL") {
        settings.logging.level = level;
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = env_string(key)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "unparseable environment override, ignoring");
            None
        }
    }
}

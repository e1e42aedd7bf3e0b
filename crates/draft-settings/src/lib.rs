//! # draft-settings
//!
//! Configuration management with layered sources for the draft engine.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults** — [`DraftSettings::default()`]
//! 2. **User file** — `~/.draft/settings.json` (deep-merged over defaults)
//! 3. **Environment variables** — `DRAFT_*` overrides (highest priority)
//!
//! The registry takes its configuration by injection; the cached global
//! here is a convenience for hosts that want one process-wide copy, and it
//! is reloadable so a settings change on disk can be picked up without a
//! restart.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::*;

use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;

/// Global settings singleton.
///
/// `RwLock<Option<Arc<DraftSettings>>>` rather than `OnceLock` so the
/// cached value can be swapped on reload. Reads are cheap (shared lock +
/// `Arc::clone`); writes only happen on reload, which is rare.
static SETTINGS: RwLock<Option<Arc<DraftSettings>>> = RwLock::new(None);

/// Get the global settings instance.
///
/// On first call, loads from `~/.draft/settings.json` with env overrides;
/// later calls return the cached value. If loading fails, compiled
/// defaults apply. Returns an `Arc` so callers hold a consistent snapshot
/// even if another thread reloads concurrently.
pub fn get_settings() -> Arc<DraftSettings> {
    {
        let guard = SETTINGS.read();
        if let Some(ref settings) = *guard {
            return Arc::clone(settings);
        }
    }

    let mut guard = SETTINGS.write();
    // Another thread may have initialized while we waited for the lock.
    if let Some(ref settings) = *guard {
        return Arc::clone(settings);
    }

    let settings = Arc::new(match load_settings() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!(error = %e, "failed to load settings, using defaults");
            DraftSettings::default()
        }
    });
    *guard = Some(Arc::clone(&settings));
    settings
}

/// Initialize the global settings with a specific value.
///
/// Replaces any previously cached settings. Useful for tests and host
/// startup where the configuration is already in hand.
pub fn init_settings(settings: DraftSettings) {
    let mut guard = SETTINGS.write();
    *guard = Some(Arc::new(settings));
}

/// Reload settings from a specific file path and swap the global cache.
///
/// All subsequent [`get_settings`] calls return the new values. A failed
/// reload falls back to compiled defaults rather than keeping stale data.
pub fn reload_settings_from_path(path: &Path) {
    let new = Arc::new(match load_settings_from_path(path) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!(error = %e, ?path, "failed to reload settings, falling back to defaults");
            DraftSettings::default()
        }
    });
    let mut guard = SETTINGS.write();
    *guard = Some(new);
    tracing::info!(?path, "settings reloaded from disk");
}

/// Reset the global settings cache (test-only).
#[cfg(test)]
pub(crate) fn reset_settings() {
    let mut guard = SETTINGS.write();
    *guard = None;
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

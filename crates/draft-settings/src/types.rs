//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase")]` and implement
//! [`Default`] with production default values. `#[serde(default)]` allows
//! partial JSON: missing fields take their default during deserialization.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Platform ceiling on select-control options; capacities above this are
/// silently unusable.
const PAGE_CAPACITY_CEILING: usize = 25;

/// Platform ceiling on the roster size.
const PARTICIPANT_CEILING: usize = 20;

/// Root settings for a draft host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DraftSettings {
    /// Settings schema version.
    pub version: String,
    /// Application name.
    pub name: String,
    /// Per-session limits and timers.
    pub session: SessionSettings,
    /// Behavior choices the source deployments disagree on.
    pub policy: PolicySettings,
    /// Logging configuration.
    pub logging: LoggingSettings,
}

impl Default for DraftSettings {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            name: "draft".to_string(),
            session: SessionSettings::default(),
            policy: PolicySettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl DraftSettings {
    /// Clamp out-of-range values and correct invalid invariants.
    ///
    /// Called automatically during loading. Bad values are corrected with a
    /// warning rather than rejected, so a hand-edited settings file never
    /// takes the host down.
    pub fn clamp(&mut self) {
        let s = &mut self.session;
        if s.selection_page_capacity == 0 || s.selection_page_capacity > PAGE_CAPACITY_CEILING {
            warn!(
                value = s.selection_page_capacity,
                ceiling = PAGE_CAPACITY_CEILING,
                "selectionPageCapacity out of range, clamping"
            );
            s.selection_page_capacity = s.selection_page_capacity.clamp(1, PAGE_CAPACITY_CEILING);
        }
        if s.max_participants == 0 || s.max_participants > PARTICIPANT_CEILING {
            warn!(
                value = s.max_participants,
                ceiling = PARTICIPANT_CEILING,
                "maxParticipants out of range, clamping"
            );
            s.max_participants = s.max_participants.clamp(1, PARTICIPANT_CEILING);
        }
        if s.inactivity_timeout_seconds < 60 {
            warn!(
                value = s.inactivity_timeout_seconds,
                "inactivityTimeoutSeconds below one minute, clamping to 60"
            );
            s.inactivity_timeout_seconds = 60;
        }
    }
}

/// Per-session limits and timers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionSettings {
    /// Seconds of inactivity before the watchdog ends a session.
    pub inactivity_timeout_seconds: u64,
    /// Roster ceiling.
    pub max_participants: usize,
    /// Item pool ceiling; `0` means unbounded.
    pub max_items: usize,
    /// Items per selection page.
    pub selection_page_capacity: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            inactivity_timeout_seconds: 1800,
            max_participants: 20,
            max_items: 100,
            selection_page_capacity: 25,
        }
    }
}

/// Behavior choices the source deployments disagree on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PolicySettings {
    /// What `assign` does with an empty selection buffer.
    pub empty_assign: EmptyAssignSetting,
    /// What happens at each end of the snake order.
    pub boundary: BoundarySetting,
}

/// Empty-buffer `assign` handling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EmptyAssignSetting {
    /// Silently do nothing.
    #[default]
    Ignore,
    /// Reject the call with an explanation.
    Reject,
}

/// End-of-order reversal handling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BoundarySetting {
    /// The boundary participant picks twice in a row.
    #[default]
    RepeatTurn,
    /// Move straight to the next participant after reversing.
    AdvanceImmediately,
}

/// Logging configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

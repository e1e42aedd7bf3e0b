//! Registry configuration.

use std::time::Duration;

use draft_engine::{BoundaryPolicy, EmptyAssignPolicy, EngineConfig};
use draft_settings::{BoundarySetting, DraftSettings, EmptyAssignSetting};

/// Configuration injected into a [`SessionRegistry`](crate::SessionRegistry).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Idle time before the watchdog ends a session.
    pub inactivity_timeout: Duration,
    /// Engine tunables handed to each new session.
    pub engine: EngineConfig,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            inactivity_timeout: Duration::from_secs(1800),
            engine: EngineConfig::default(),
        }
    }
}

impl RegistryConfig {
    /// Map loaded settings onto registry configuration.
    #[must_use]
    pub fn from_settings(settings: &DraftSettings) -> Self {
        Self {
            inactivity_timeout: Duration::from_secs(settings.session.inactivity_timeout_seconds),
            engine: EngineConfig {
                max_participants: settings.session.max_participants,
                max_items: settings.session.max_items,
                page_capacity: settings.session.selection_page_capacity,
                empty_assign: match settings.policy.empty_assign {
                    EmptyAssignSetting::Ignore => EmptyAssignPolicy::Ignore,
                    EmptyAssignSetting::Reject => EmptyAssignPolicy::Reject,
                },
                boundary: match settings.policy.boundary {
                    BoundarySetting::RepeatTurn => BoundaryPolicy::RepeatTurn,
                    BoundarySetting::AdvanceImmediately => BoundaryPolicy::AdvanceImmediately,
                },
            },
        }
    }
}

//! The [`DraftError`] hierarchy.
//!
//! Every error here is local and recoverable from the process's point of
//! view: a rejected operation leaves the session untouched and the caller
//! free to retry. Nothing in this taxonomy is fatal.

use crate::ids::{ParticipantId, SessionHandle, SurfaceId};

/// Errors surfaced by the draft engine and registry.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    /// Handle absent from the registry (expired, destroyed, or never existed).
    #[error("Session not found: {0}")]
    SessionNotFound(SessionHandle),

    /// Actor is neither the owner nor, for picking-scoped operations, the
    /// current picker.
    #[error("Participant {actor} may not perform {op}")]
    Unauthorized {
        /// Who attempted the operation.
        actor: ParticipantId,
        /// Operation name.
        op: &'static str,
    },

    /// The operation does not apply to the session's current status.
    #[error("{op} is not valid while the session is {status}")]
    InvalidState {
        /// Operation name.
        op: &'static str,
        /// Status label at the time of the call.
        status: &'static str,
    },

    /// `assign` with an empty selection buffer, under the reject policy.
    #[error("No items are selected")]
    EmptySelection,

    /// A selection event named a page that no longer exists.
    #[error("Selection page {page} is no longer valid")]
    StaleSelection {
        /// Page index from the event.
        page: usize,
    },

    /// `undo` with no retained snapshot.
    #[error("There is nothing to undo")]
    NothingToUndo,

    /// A render was requested for a surface not attached to the session.
    #[error("Surface {surface} is not attached to this session")]
    UnknownSurface {
        /// The surface named by the caller.
        surface: SurfaceId,
    },

    /// Creation rejected: entrant count above the configured ceiling.
    #[error("Too many participants ({count}); the maximum is {max}")]
    TooManyParticipants {
        /// Offered entrant count.
        count: usize,
        /// Configured ceiling.
        max: usize,
    },

    /// Creation rejected: item count above the configured ceiling.
    #[error("Too many items ({count}); the maximum is {max}")]
    TooManyItems {
        /// Offered item count.
        count: usize,
        /// Configured ceiling.
        max: usize,
    },

    /// Creation rejected: no entrants.
    #[error("A draft needs at least one participant")]
    NoParticipants,

    /// Creation rejected: no items.
    #[error("A draft needs at least one item")]
    NoItems,
}

impl DraftError {
    /// Stable snake_case label for metrics and logging.
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self {
            Self::SessionNotFound(_) => "session_not_found",
            Self::Unauthorized { .. } => "unauthorized",
            Self::InvalidState { .. } => "invalid_state",
            Self::EmptySelection => "empty_selection",
            Self::StaleSelection { .. } => "stale_selection",
            Self::NothingToUndo => "nothing_to_undo",
            Self::UnknownSurface { .. } => "unknown_surface",
            Self::TooManyParticipants { .. } => "too_many_participants",
            Self::TooManyItems { .. } => "too_many_items",
            Self::NoParticipants => "no_participants",
            Self::NoItems => "no_items",
        }
    }

    /// Whether the caller can retry against the same session.
    ///
    /// False only where the session itself is gone or was never created.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::SessionNotFound(_)
            | Self::UnknownSurface { .. }
            | Self::TooManyParticipants { .. }
            | Self::TooManyItems { .. }
            | Self::NoParticipants
            | Self::NoItems => false,
            Self::Unauthorized { .. }
            | Self::InvalidState { .. }
            | Self::EmptySelection
            | Self::StaleSelection { .. }
            | Self::NothingToUndo => true,
        }
    }
}

//! Lifecycle notification events.
//!
//! Every mutation the registry applies produces a [`DraftEvent`] on the
//! broadcast channel, so hosts can react to drafts starting, items being
//! claimed, and sessions ending (complete / cancelled / timed out) without
//! polling. Events carry a camelCase JSON wire format; integrations rely on
//! the exact type strings and field names.

use serde::{Deserialize, Serialize};

use crate::ids::{ParticipantId, SessionHandle};

/// Common fields for all draft events.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseEvent {
    /// Session this event belongs to.
    pub handle: SessionHandle,
    /// ISO 8601 timestamp.
    pub timestamp: String,
}

impl BaseEvent {
    /// Create a new base event with the current UTC timestamp.
    #[must_use]
    pub fn now(handle: SessionHandle) -> Self {
        Self {
            handle,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Declarative macro that generates [`DraftEvent`], its `base()` and
/// `event_type()` accessors, and a compile-time `VARIANT_COUNT`.
///
/// Adding a new variant requires ONE edit (inside this invocation).
/// The compiler enforces exhaustive matching everywhere else.
macro_rules! draft_events {
    ($(
        $(#[doc = $doc:literal])*
        $variant:ident {
            $(
                $(#[$fmeta:meta])*
                $field:ident : $ty:ty
            ),*
            $(,)?
        } => $rename:literal
    ),* $(,)?) => {
        /// Session lifecycle event with handle context.
        ///
        /// Broadcast by the registry's emitter after each successful
        /// mutation and on every terminal transition.
        #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
        #[serde(tag = "type")]
        #[allow(missing_docs)]
        pub enum DraftEvent {
            $(
                $(#[doc = $doc])*
                #[serde(rename = $rename)]
                $variant {
                    #[serde(flatten)]
                    base: BaseEvent,
                    $(
                        $(#[$fmeta])*
                        $field: $ty,
                    )*
                },
            )*
        }

        impl DraftEvent {
            /// Get the base event fields.
            #[must_use]
            pub fn base(&self) -> &BaseEvent {
                match self {
                    $(Self::$variant { base, .. } => base,)*
                }
            }

            /// Get the event type string (for type discrimination).
            #[must_use]
            pub fn event_type(&self) -> &str {
                match self {
                    $(Self::$variant { .. } => $rename,)*
                }
            }

            /// The session this event belongs to.
            #[must_use]
            pub fn handle(&self) -> SessionHandle {
                self.base().handle
            }
        }

        /// Number of `DraftEvent` variants (compile-time constant for tests).
        #[cfg(test)]
        pub(crate) const VARIANT_COUNT: usize = [$($rename),*].len();
    };
}

draft_events! {
    // -- Setup --

    /// A session was created and is awaiting its first action.
    SessionCreated {
        participants: usize,
        items: usize,
    } => "session_created",

    /// Participants were removed from the roster before the start.
    ParticipantsRemoved {
        removed: Vec<ParticipantId>,
    } => "participants_removed",

    // -- Picking --

    /// The draft moved out of setup; the first picker is on the clock.
    DraftStarted {} => "draft_started",

    /// The turn cursor moved (after an assign or skip).
    TurnAdvanced {
        seat: usize,
        round: u32,
        reversed: bool,
    } => "turn_advanced",

    /// The current picker claimed the buffered items.
    ItemsAssigned {
        picker: ParticipantId,
        indices: Vec<usize>,
    } => "items_assigned",

    /// The current turn was skipped with nothing claimed.
    TurnSkipped {} => "turn_skipped",

    /// The most recent assign or skip was rolled back.
    ActionUndone {
        restored: Vec<usize>,
    } => "action_undone",

    // -- Terminal --

    /// Every item was assigned.
    DraftComplete {} => "draft_complete",

    /// Roster removal emptied the session before it started.
    DraftCancelled {} => "draft_cancelled",

    /// The inactivity watchdog fired.
    DraftTimedOut {} => "draft_timed_out",
}

// ─────────────────────────────────────────────────────────────────────────────
// Factory helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Create a session-created event.
#[must_use]
pub fn session_created_event(handle: SessionHandle, participants: usize, items: usize) -> DraftEvent {
    DraftEvent::SessionCreated {
        base: BaseEvent::now(handle),
        participants,
        items,
    }
}

/// Create a draft-started event.
#[must_use]
pub fn draft_started_event(handle: SessionHandle) -> DraftEvent {
    DraftEvent::DraftStarted {
        base: BaseEvent::now(handle),
    }
}

/// Create a draft-complete event.
#[must_use]
pub fn draft_complete_event(handle: SessionHandle) -> DraftEvent {
    DraftEvent::DraftComplete {
        base: BaseEvent::now(handle),
    }
}

/// Create a draft-cancelled event.
#[must_use]
pub fn draft_cancelled_event(handle: SessionHandle) -> DraftEvent {
    DraftEvent::DraftCancelled {
        base: BaseEvent::now(handle),
    }
}

/// Create a draft-timed-out event.
#[must_use]
pub fn draft_timed_out_event(handle: SessionHandle) -> DraftEvent {
    DraftEvent::DraftTimedOut {
        base: BaseEvent::now(handle),
    }
}

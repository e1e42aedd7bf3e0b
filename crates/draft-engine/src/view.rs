//! Pure derivation of render descriptors from session state.
//!
//! A [`SurfaceView`] is the structured view model for one attached surface;
//! turning it into platform markup is the caller's job. Derivation is
//! referentially transparent: rendering the same unchanged session twice
//! yields equal descriptors, so the coordinator may recompute at will.
//!
//! Which controls appear is a pure function of session status. There are no
//! per-phase view classes; the status tag decides everything.

use serde::{Deserialize, Serialize};

use draft_core::ParticipantId;
use draft_core::text::ellipsize;

use crate::config::BoundaryPolicy;
use crate::selection::paginate;
use crate::session::{Session, SessionStatus};
use crate::turn::Direction;

/// Platform ceiling on select-option label length, in bytes.
const MAX_LABEL_BYTES: usize = 100;

/// Which attached surface a descriptor targets.
///
/// A session renders across two messages: a primary control panel and a
/// stable-numbered item list that only exists while picking is possible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceRole {
    /// Roster, assignments, turn banner, and controls.
    Primary,
    /// The remaining-items panel; transient.
    ItemList,
}

/// Whether the surface should keep rendering or be torn down.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    /// Update in place.
    Keep,
    /// Delete the surface; it has no further content.
    Retire,
}

/// One line of the stable-numbered item list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemLine {
    /// Original 1-based number; never renumbered.
    #[serde(rename = "displayIndex")]
    pub display_index: usize,
    /// Item name.
    pub name: String,
}

/// Roster entry with roll annotation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterLine {
    /// 1-based seat number.
    pub seat: usize,
    /// Participant id.
    pub id: ParticipantId,
    /// Display name.
    pub name: String,
    /// Primary roll.
    pub roll: u8,
    /// Tie value when the roll was shared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tie: Option<u8>,
}

/// Items grouped under the participant who claimed them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentGroup {
    /// 1-based seat number.
    pub seat: usize,
    /// Participant id.
    pub id: ParticipantId,
    /// Display name.
    pub name: String,
    /// Claimed item names in display order.
    pub items: Vec<String>,
}

/// Headline state of the session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Banner {
    /// Ready to start; the owner must act.
    Ready {
        /// The session owner.
        owner: ParticipantId,
    },
    /// A picker is on the clock.
    Turn {
        /// The picker's id.
        picker: ParticipantId,
        /// The picker's display name.
        #[serde(rename = "pickerName")]
        picker_name: String,
        /// The picker's 1-based seat number.
        seat: usize,
        /// Zero-based round counter.
        round: u32,
        /// Current direction of travel.
        direction: Direction,
        /// Whether this is the boundary seat's repeated turn.
        again: bool,
    },
    /// Every item was assigned.
    Complete,
    /// Roster removal emptied the session.
    Cancelled,
    /// The inactivity watchdog fired.
    TimedOut,
}

/// One option inside a select control.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Item index or participant id, depending on the control.
    pub value: u64,
    /// Label, truncated to the platform ceiling.
    pub label: String,
    /// Whether the option renders pre-selected.
    pub selected: bool,
}

/// An interactive control on the primary surface.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Control {
    /// Multi-select listing one page of available items.
    ItemSelect {
        /// Page index, the value echoed back by `select` events.
        page: usize,
        /// Display number of the first item on the page.
        first: usize,
        /// Display number of the last item on the page.
        last: usize,
        /// Options with current buffer state.
        options: Vec<SelectOption>,
        /// Upper bound on simultaneous choices.
        #[serde(rename = "maxValues")]
        max_values: usize,
    },
    /// Commit the selection buffer.
    Assign {
        /// Disabled until something is selected.
        enabled: bool,
    },
    /// Pass the current turn.
    Skip,
    /// Roll back the most recent commit.
    Undo {
        /// Disabled when no snapshot is retained.
        enabled: bool,
    },
    /// Begin the draft.
    Start,
    /// Multi-select of removable (non-owner) participants.
    RemoveSelect {
        /// Options labelled with name and roll.
        options: Vec<SelectOption>,
        /// Upper bound on simultaneous choices.
        #[serde(rename = "maxValues")]
        max_values: usize,
    },
    /// Commit the removal choice.
    Remove {
        /// Disabled when nobody can be removed.
        enabled: bool,
    },
}

/// The complete view model for one surface.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceView {
    /// Which surface this descriptor targets.
    pub role: SurfaceRole,
    /// Keep updating or tear down.
    pub disposition: Disposition,
    /// Headline state.
    pub banner: Banner,
    /// Roster in seat order (primary surface only).
    pub roster: Vec<RosterLine>,
    /// Per-participant assignment groups (primary surface only).
    pub assignments: Vec<AssignmentGroup>,
    /// Remaining items: the full list on the item-list surface, unclaimed
    /// leftovers on a terminal primary surface, empty otherwise.
    pub remaining: Vec<ItemLine>,
    /// Interactive controls (primary surface only).
    pub controls: Vec<Control>,
}

/// Derive the descriptor for one attached surface. Never mutates.
#[must_use]
pub fn render(session: &Session, role: SurfaceRole) -> SurfaceView {
    let status = session.status();
    let terminal = status.is_terminal();

    let disposition = if role == SurfaceRole::ItemList && terminal {
        Disposition::Retire
    } else {
        Disposition::Keep
    };

    let remaining = match role {
        SurfaceRole::ItemList => remaining_lines(session),
        SurfaceRole::Primary if terminal => remaining_lines(session),
        SurfaceRole::Primary => Vec::new(),
    };

    let (roster, assignments, controls) = match role {
        SurfaceRole::Primary => (
            roster_lines(session),
            assignment_groups(session),
            controls_for(session),
        ),
        SurfaceRole::ItemList => (Vec::new(), Vec::new(), Vec::new()),
    };

    SurfaceView {
        role,
        disposition,
        banner: banner_for(session),
        roster,
        assignments,
        remaining,
        controls,
    }
}

fn banner_for(session: &Session) -> Banner {
    match session.status() {
        SessionStatus::Setup => Banner::Ready {
            owner: session.owner(),
        },
        SessionStatus::Picking => {
            let picker = session
                .current_picker()
                .expect("picking status implies a seated picker");
            let seat = session
                .turns()
                .current_seat()
                .expect("picking status implies a seated picker");
            Banner::Turn {
                picker: picker.id,
                picker_name: picker.name.clone(),
                seat: seat + 1,
                round: session.turns().round(),
                direction: session.turns().direction(),
                again: session.turns().just_reversed()
                    && session.config().boundary == BoundaryPolicy::RepeatTurn,
            }
        }
        SessionStatus::Complete => Banner::Complete,
        SessionStatus::Cancelled => Banner::Cancelled,
        SessionStatus::TimedOut => Banner::TimedOut,
    }
}

fn roster_lines(session: &Session) -> Vec<RosterLine> {
    session
        .participants()
        .iter()
        .enumerate()
        .map(|(i, p)| RosterLine {
            seat: i + 1,
            id: p.id,
            name: p.name.clone(),
            roll: p.roll,
            tie: p.tie,
        })
        .collect()
}

fn assignment_groups(session: &Session) -> Vec<AssignmentGroup> {
    session
        .participants()
        .iter()
        .enumerate()
        .map(|(i, p)| AssignmentGroup {
            seat: i + 1,
            id: p.id,
            name: p.name.clone(),
            items: session
                .items()
                .iter()
                .filter(|item| item.assigned_to == Some(p.id))
                .map(|item| item.name.clone())
                .collect(),
        })
        .collect()
}

fn remaining_lines(session: &Session) -> Vec<ItemLine> {
    session
        .items()
        .iter()
        .filter(|item| item.assigned_to.is_none())
        .map(|item| ItemLine {
            display_index: item.display_index,
            name: item.name.clone(),
        })
        .collect()
}

/// The control set applicable to the session's status.
fn controls_for(session: &Session) -> Vec<Control> {
    match session.status() {
        SessionStatus::Setup => setup_controls(session),
        SessionStatus::Picking => picking_controls(session),
        SessionStatus::Complete | SessionStatus::Cancelled | SessionStatus::TimedOut => Vec::new(),
    }
}

fn setup_controls(session: &Session) -> Vec<Control> {
    let options: Vec<SelectOption> = session
        .participants()
        .iter()
        .filter(|p| p.id != session.owner())
        .map(|p| SelectOption {
            value: p.id.get(),
            label: ellipsize(&format!("{} (Roll: {})", p.name, p.roll), MAX_LABEL_BYTES),
            selected: false,
        })
        .collect();

    let mut controls = Vec::new();
    let removable = !options.is_empty();
    if removable {
        let max_values = options.len();
        controls.push(Control::RemoveSelect {
            options,
            max_values,
        });
    }
    controls.push(Control::Remove { enabled: removable });
    controls.push(Control::Start);
    controls
}

fn picking_controls(session: &Session) -> Vec<Control> {
    let available = session.available_indices();
    let pages = paginate(&available, session.config().page_capacity);

    let mut controls = Vec::with_capacity(pages.len() + 3);
    for (page, slice) in pages.iter().enumerate() {
        let options: Vec<SelectOption> = slice
            .iter()
            .map(|&index| {
                let item = &session.items()[index];
                SelectOption {
                    value: index as u64,
                    label: ellipsize(
                        &format!("{}. {}", item.display_index, item.name),
                        MAX_LABEL_BYTES,
                    ),
                    selected: session.selection().contains(index),
                }
            })
            .collect();
        let first = session.items()[slice[0]].display_index;
        let last = session.items()[slice[slice.len() - 1]].display_index;
        let max_values = options.len();
        controls.push(Control::ItemSelect {
            page,
            first,
            last,
            options,
            max_values,
        });
    }

    controls.push(Control::Assign {
        enabled: !session.selection().is_empty(),
    });
    controls.push(Control::Skip);
    controls.push(Control::Undo {
        enabled: session.can_undo(),
    });
    controls
}

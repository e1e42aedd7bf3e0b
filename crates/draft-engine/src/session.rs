//! The [`Session`] aggregate and its six operations.
//!
//! A session owns the ranked roster, the item pool, the turn sequencer, the
//! selection buffer, and the single undo snapshot. All mutation goes
//! through the operations here; the async registry wraps each call in the
//! session's lock and handles rendering and notification afterwards.

use tracing::debug;

use draft_core::{DraftError, ParticipantId, SessionHandle};

use crate::config::{EmptyAssignPolicy, EngineConfig};
use crate::ranking::RankedParticipant;
use crate::selection::{SelectionBuffer, paginate};
use crate::turn::{TurnCursor, TurnOrder, TurnSnapshot};

/// One item in the shared pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Item {
    /// Stable 1-based number shown to users; never renumbered.
    pub display_index: usize,
    /// Free-form item name.
    pub name: String,
    /// Present once a picker has claimed the item.
    pub assigned_to: Option<ParticipantId>,
}

/// Where the session is in its life.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    /// Created; roster still editable; the draft has not started.
    Setup,
    /// Turns are running.
    Picking,
    /// Every item was assigned.
    Complete,
    /// Roster removal emptied the session before it started.
    Cancelled,
    /// The inactivity watchdog fired.
    TimedOut,
}

impl SessionStatus {
    /// Stable label for errors and logging.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Picking => "picking",
            Self::Complete => "complete",
            Self::Cancelled => "cancelled",
            Self::TimedOut => "timed_out",
        }
    }

    /// Whether no further transitions exist.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Cancelled | Self::TimedOut)
    }
}

/// The single retained undo record, captured immediately before each
/// assign/skip commit. Depth is one: each new commit overwrites it.
#[derive(Clone, Debug, PartialEq, Eq)]
struct ActionSnapshot {
    turn: TurnSnapshot,
    assigned: Vec<usize>,
}

/// Result of [`Session::assign`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssignOutcome {
    /// Items were claimed and the turn advanced.
    Assigned {
        /// The picker the items went to.
        picker: ParticipantId,
        /// Claimed item indices, ascending.
        indices: Vec<usize>,
    },
    /// Empty buffer under the ignore policy; nothing changed.
    Ignored,
}

/// Result of [`Session::skip`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipOutcome {
    /// The session was in setup; the draft has now started.
    Started,
    /// The current turn was skipped.
    Skipped,
}

/// Result of [`Session::remove_participants`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RemovalOutcome {
    /// The named participants were removed; the draft can still start.
    Removed(Vec<ParticipantId>),
    /// Removal emptied the roster; the session is now cancelled.
    Cancelled(Vec<ParticipantId>),
}

/// A draft session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    handle: SessionHandle,
    owner: ParticipantId,
    participants: Vec<RankedParticipant>,
    items: Vec<Item>,
    turns: TurnOrder,
    selection: SelectionBuffer,
    last_action: Option<ActionSnapshot>,
    status: SessionStatus,
    config: EngineConfig,
}

impl Session {
    /// Create a session from a ranked roster and raw item names.
    ///
    /// The pool arrives as free-form line-per-item input, so blank names
    /// are dropped before numbering. Fails when the roster or pool is
    /// empty or exceeds the configured ceilings.
    pub fn new(
        handle: SessionHandle,
        owner: ParticipantId,
        participants: Vec<RankedParticipant>,
        item_names: Vec<String>,
        config: EngineConfig,
    ) -> Result<Self, DraftError> {
        if participants.is_empty() {
            return Err(DraftError::NoParticipants);
        }
        if participants.len() > config.max_participants {
            return Err(DraftError::TooManyParticipants {
                count: participants.len(),
                max: config.max_participants,
            });
        }

        let items: Vec<Item> = item_names
            .into_iter()
            .map(|name| name.trim().to_owned())
            .filter(|name| !name.is_empty())
            .enumerate()
            .map(|(i, name)| Item {
                display_index: i + 1,
                name,
                assigned_to: None,
            })
            .collect();

        if items.is_empty() {
            return Err(DraftError::NoItems);
        }
        if config.max_items > 0 && items.len() > config.max_items {
            return Err(DraftError::TooManyItems {
                count: items.len(),
                max: config.max_items,
            });
        }

        let seats = participants.len();
        Ok(Self {
            handle,
            owner,
            participants,
            items,
            turns: TurnOrder::new(seats, config.boundary),
            selection: SelectionBuffer::default(),
            last_action: None,
            status: SessionStatus::Setup,
            config,
        })
    }

    // ─────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────

    /// Session handle (the primary surface id).
    #[must_use]
    pub fn handle(&self) -> SessionHandle {
        self.handle
    }

    /// The owning participant.
    #[must_use]
    pub fn owner(&self) -> ParticipantId {
        self.owner
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Engine configuration this session was created with.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The roster in seat order.
    #[must_use]
    pub fn participants(&self) -> &[RankedParticipant] {
        &self.participants
    }

    /// The item pool in display order.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// The turn sequencer.
    #[must_use]
    pub fn turns(&self) -> &TurnOrder {
        &self.turns
    }

    /// The uncommitted selection.
    #[must_use]
    pub fn selection(&self) -> &SelectionBuffer {
        &self.selection
    }

    /// Whether an undo snapshot is retained.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.last_action.is_some()
    }

    /// The participant on the clock, if the draft is running.
    #[must_use]
    pub fn current_picker(&self) -> Option<&RankedParticipant> {
        self.turns
            .current_seat()
            .and_then(|seat| self.participants.get(seat))
    }

    /// Whether any item is still unassigned.
    #[must_use]
    pub fn has_unassigned(&self) -> bool {
        self.items.iter().any(|item| item.assigned_to.is_none())
    }

    /// Indices of unassigned items in stable order.
    #[must_use]
    pub fn available_indices(&self) -> Vec<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.assigned_to.is_none())
            .map(|(index, _)| index)
            .collect()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Operations
    // ─────────────────────────────────────────────────────────────────────

    /// Begin the draft: the first seat goes on the clock.
    pub fn start(&mut self, actor: ParticipantId) -> Result<(), DraftError> {
        self.authorize(actor, "start", false)?;
        if self.status != SessionStatus::Setup {
            return Err(self.invalid_state("start"));
        }
        self.turns.advance(self.has_unassigned());
        self.status = SessionStatus::Picking;
        debug!(handle = %self.handle, "draft started");
        Ok(())
    }

    /// Merge a selection event for one page into the buffer.
    ///
    /// `values` are 0-based item indices limited to the named page; indices
    /// outside the page are ignored. A page index with no current slice is
    /// a stale reference and fails with [`DraftError::StaleSelection`],
    /// leaving the buffer untouched.
    pub fn select(
        &mut self,
        actor: ParticipantId,
        page: usize,
        values: &[usize],
    ) -> Result<(), DraftError> {
        self.authorize(actor, "select", true)?;
        if self.status != SessionStatus::Picking {
            return Err(self.invalid_state("select"));
        }
        let available = self.available_indices();
        let pages = paginate(&available, self.config.page_capacity);
        let Some(slice) = pages.get(page).copied() else {
            return Err(DraftError::StaleSelection { page });
        };
        self.selection.merge_page(slice, values);
        Ok(())
    }

    /// Commit the selection buffer to the current picker and advance.
    pub fn assign(&mut self, actor: ParticipantId) -> Result<AssignOutcome, DraftError> {
        self.authorize(actor, "assign", true)?;
        if self.status != SessionStatus::Picking {
            return Err(self.invalid_state("assign"));
        }
        if self.selection.is_empty() {
            return match self.config.empty_assign {
                EmptyAssignPolicy::Ignore => Ok(AssignOutcome::Ignored),
                EmptyAssignPolicy::Reject => Err(DraftError::EmptySelection),
            };
        }

        let picker = self
            .current_picker()
            .expect("picking status implies a seated picker")
            .id;
        let snapshot = ActionSnapshot {
            turn: self.turns.snapshot(),
            assigned: self.selection.indices().collect(),
        };
        let indices = self.selection.take();
        for &index in &indices {
            self.items[index].assigned_to = Some(picker);
        }
        self.last_action = Some(snapshot);
        self.advance_turn();
        debug!(handle = %self.handle, %picker, count = indices.len(), "items assigned");
        Ok(AssignOutcome::Assigned { picker, indices })
    }

    /// Skip the current turn, or start the draft when still in setup.
    ///
    /// Starting this way records no snapshot: there is nothing to undo yet.
    pub fn skip(&mut self, actor: ParticipantId) -> Result<SkipOutcome, DraftError> {
        self.authorize(actor, "skip", false)?;
        match self.status {
            SessionStatus::Setup => {
                self.turns.advance(self.has_unassigned());
                self.status = SessionStatus::Picking;
                debug!(handle = %self.handle, "draft started via skip");
                Ok(SkipOutcome::Started)
            }
            SessionStatus::Picking => {
                self.last_action = Some(ActionSnapshot {
                    turn: self.turns.snapshot(),
                    assigned: Vec::new(),
                });
                self.selection.clear();
                self.advance_turn();
                debug!(handle = %self.handle, "turn skipped");
                Ok(SkipOutcome::Skipped)
            }
            SessionStatus::Complete | SessionStatus::Cancelled | SessionStatus::TimedOut => {
                Err(self.invalid_state("skip"))
            }
        }
    }

    /// Roll back the most recent assign or skip.
    ///
    /// Restores exactly the snapshotted turn state, un-assigns exactly the
    /// snapshotted indices, and clears both the snapshot and the selection
    /// buffer.
    pub fn undo(&mut self, actor: ParticipantId) -> Result<Vec<usize>, DraftError> {
        self.authorize(actor, "undo", false)?;
        let Some(snapshot) = self.last_action.take() else {
            return Err(DraftError::NothingToUndo);
        };
        for &index in &snapshot.assigned {
            self.items[index].assigned_to = None;
        }
        self.turns.restore(snapshot.turn);
        // Snapshots are only captured while picking, so that is where undo
        // lands, even when the commit had finished the draft.
        self.status = SessionStatus::Picking;
        self.selection.clear();
        debug!(handle = %self.handle, restored = snapshot.assigned.len(), "action undone");
        Ok(snapshot.assigned)
    }

    /// Remove participants from the roster before the draft starts.
    ///
    /// Survivor order is preserved. Removing everyone cancels the session.
    pub fn remove_participants(
        &mut self,
        actor: ParticipantId,
        ids: &[ParticipantId],
    ) -> Result<RemovalOutcome, DraftError> {
        self.authorize(actor, "remove_participants", false)?;
        if self.status != SessionStatus::Setup {
            return Err(self.invalid_state("remove_participants"));
        }

        let removed: Vec<ParticipantId> = self
            .participants
            .iter()
            .filter(|p| ids.contains(&p.id))
            .map(|p| p.id)
            .collect();
        if removed.is_empty() {
            return Ok(RemovalOutcome::Removed(removed));
        }

        self.participants.retain(|p| !ids.contains(&p.id));
        if self.participants.is_empty() {
            self.status = SessionStatus::Cancelled;
            debug!(handle = %self.handle, "roster emptied; session cancelled");
            return Ok(RemovalOutcome::Cancelled(removed));
        }
        self.turns.set_seats(self.participants.len());
        debug!(handle = %self.handle, removed = removed.len(), "participants removed");
        Ok(RemovalOutcome::Removed(removed))
    }

    /// Transition to `TimedOut` (no-op when already terminal).
    ///
    /// Called by the registry when the inactivity watchdog fires.
    pub fn time_out(&mut self) {
        if !self.status.is_terminal() {
            self.status = SessionStatus::TimedOut;
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────

    /// Advance the sequencer and fold a finished draft into the status.
    fn advance_turn(&mut self) {
        self.turns.advance(self.has_unassigned());
        if self.turns.cursor() == TurnCursor::Complete {
            self.status = SessionStatus::Complete;
        }
    }

    /// The owner may do anything; the current picker may additionally run
    /// picking-scoped operations (`select`, `assign`).
    fn authorize(
        &self,
        actor: ParticipantId,
        op: &'static str,
        picker_may: bool,
    ) -> Result<(), DraftError> {
        if actor == self.owner {
            return Ok(());
        }
        if picker_may && self.current_picker().is_some_and(|p| p.id == actor) {
            return Ok(());
        }
        Err(DraftError::Unauthorized { actor, op })
    }

    fn invalid_state(&self, op: &'static str) -> DraftError {
        DraftError::InvalidState {
            op,
            status: self.status.as_str(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const OWNER: ParticipantId = ParticipantId::new(1);
    const P2: ParticipantId = ParticipantId::new(2);
    const P3: ParticipantId = ParticipantId::new(3);
    const OUTSIDER: ParticipantId = ParticipantId::new(99);

    fn roster(ids: &[ParticipantId]) -> Vec<RankedParticipant> {
        // Descending rolls so seat order matches the id order given.
        ids.iter()
            .enumerate()
            .map(|(i, &id)| RankedParticipant {
                id,
                name: format!("player-{id}"),
                roll: (100 - i) as u8,
                tie: None,
            })
            .collect()
    }

    fn items(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("item-{i}")).collect()
    }

    fn session(participant_ids: &[ParticipantId], item_count: usize) -> Session {
        Session::new(
            SessionHandle::new(500),
            OWNER,
            roster(participant_ids),
            items(item_count),
            EngineConfig::default(),
        )
        .unwrap()
    }

    // --- Creation ---

    #[test]
    fn creation_validates_limits() {
        let config = EngineConfig::default();
        assert_matches!(
            Session::new(SessionHandle::new(1), OWNER, vec![], items(3), config),
            Err(DraftError::NoParticipants)
        );
        assert_matches!(
            Session::new(
                SessionHandle::new(1),
                OWNER,
                roster(&[OWNER]),
                vec![],
                config
            ),
            Err(DraftError::NoItems)
        );

        let many: Vec<ParticipantId> = (1..=21).map(ParticipantId::new).collect();
        assert_matches!(
            Session::new(SessionHandle::new(1), OWNER, roster(&many), items(3), config),
            Err(DraftError::TooManyParticipants { count: 21, max: 20 })
        );
        assert_matches!(
            Session::new(
                SessionHandle::new(1),
                OWNER,
                roster(&[OWNER]),
                items(101),
                config
            ),
            Err(DraftError::TooManyItems {
                count: 101,
                max: 100
            })
        );
    }

    #[test]
    fn blank_item_names_are_dropped_before_numbering() {
        let session = Session::new(
            SessionHandle::new(1),
            OWNER,
            roster(&[OWNER]),
            vec!["  ".into(), "sword".into(), String::new(), "shield".into()],
            EngineConfig::default(),
        )
        .unwrap();
        assert_eq!(session.items().len(), 2);
        assert_eq!(session.items()[0].display_index, 1);
        assert_eq!(session.items()[1].name, "shield");
        assert_eq!(session.items()[1].display_index, 2);
    }

    #[test]
    fn zero_max_items_is_unbounded() {
        let config = EngineConfig {
            max_items: 0,
            ..EngineConfig::default()
        };
        let session = Session::new(
            SessionHandle::new(1),
            OWNER,
            roster(&[OWNER]),
            items(250),
            config,
        )
        .unwrap();
        assert_eq!(session.items().len(), 250);
    }

    // --- Start / skip ---

    #[test]
    fn start_moves_to_first_seat() {
        let mut session = session(&[OWNER, P2, P3], 4);
        assert_eq!(session.status(), SessionStatus::Setup);
        session.start(OWNER).unwrap();
        assert_eq!(session.status(), SessionStatus::Picking);
        assert_eq!(session.current_picker().unwrap().id, OWNER);
    }

    #[test]
    fn start_twice_is_invalid() {
        let mut session = session(&[OWNER, P2], 4);
        session.start(OWNER).unwrap();
        assert_matches!(
            session.start(OWNER),
            Err(DraftError::InvalidState {
                op: "start",
                status: "picking"
            })
        );
    }

    #[test]
    fn skip_from_setup_starts_without_snapshot() {
        let mut session = session(&[OWNER, P2], 4);
        assert_eq!(session.skip(OWNER).unwrap(), SkipOutcome::Started);
        assert_eq!(session.status(), SessionStatus::Picking);
        assert!(!session.can_undo(), "starting must not create a snapshot");
    }

    #[test]
    fn skip_path_follows_snake_order() {
        // Scenario: three seats, four items; skips walk 0, 1, 2 and the
        // fourth call reverses while keeping seat 2.
        let mut session = session(&[OWNER, P2, P3], 4);
        session.start(OWNER).unwrap();
        assert_eq!(session.current_picker().unwrap().id, OWNER);

        let _ = session.skip(OWNER).unwrap();
        assert_eq!(session.current_picker().unwrap().id, P2);
        let _ = session.skip(OWNER).unwrap();
        assert_eq!(session.current_picker().unwrap().id, P3);

        let _ = session.skip(OWNER).unwrap();
        assert_eq!(session.current_picker().unwrap().id, P3, "boundary repeat");
        assert_eq!(session.turns().round(), 1);
        assert!(session.turns().just_reversed());
    }

    // --- Select / assign ---

    #[test]
    fn select_then_assign_commits_to_picker() {
        let mut session = session(&[OWNER, P2], 5);
        session.start(OWNER).unwrap();
        session.select(OWNER, 0, &[0, 2]).unwrap();
        assert_eq!(session.selection().len(), 2);

        let outcome = session.assign(OWNER).unwrap();
        assert_eq!(
            outcome,
            AssignOutcome::Assigned {
                picker: OWNER,
                indices: vec![0, 2]
            }
        );
        assert_eq!(session.items()[0].assigned_to, Some(OWNER));
        assert_eq!(session.items()[2].assigned_to, Some(OWNER));
        assert!(session.selection().is_empty());
        assert_eq!(session.current_picker().unwrap().id, P2);
    }

    #[test]
    fn select_before_start_is_invalid() {
        let mut session = session(&[OWNER, P2], 5);
        assert_matches!(
            session.select(OWNER, 0, &[0]),
            Err(DraftError::InvalidState {
                op: "select",
                status: "setup"
            })
        );
    }

    #[test]
    fn select_stale_page_leaves_buffer_unchanged() {
        let mut session = session(&[OWNER, P2], 5);
        session.start(OWNER).unwrap();
        session.select(OWNER, 0, &[1]).unwrap();
        assert_matches!(
            session.select(OWNER, 4, &[2]),
            Err(DraftError::StaleSelection { page: 4 })
        );
        assert_eq!(session.selection().indices().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn pages_accumulate_independently() {
        // Scenario: 30 items span two pages; selections on each page land
        // together in the buffer.
        let mut session = session(&[OWNER, P2], 30);
        session.start(OWNER).unwrap();
        session.select(OWNER, 0, &[0, 1]).unwrap();
        session.select(OWNER, 1, &[26]).unwrap();
        assert_eq!(
            session.selection().indices().collect::<Vec<_>>(),
            vec![0, 1, 26]
        );
    }

    #[test]
    fn empty_assign_ignored_by_default() {
        let mut session = session(&[OWNER, P2], 3);
        session.start(OWNER).unwrap();
        assert_eq!(session.assign(OWNER).unwrap(), AssignOutcome::Ignored);
        assert_eq!(session.current_picker().unwrap().id, OWNER, "turn kept");
    }

    #[test]
    fn empty_assign_rejected_under_reject_policy() {
        let config = EngineConfig {
            empty_assign: EmptyAssignPolicy::Reject,
            ..EngineConfig::default()
        };
        let mut session = Session::new(
            SessionHandle::new(2),
            OWNER,
            roster(&[OWNER, P2]),
            items(3),
            config,
        )
        .unwrap();
        session.start(OWNER).unwrap();
        assert_matches!(session.assign(OWNER), Err(DraftError::EmptySelection));
    }

    #[test]
    fn assigning_everything_completes_the_draft() {
        let mut session = session(&[OWNER, P2], 2);
        session.start(OWNER).unwrap();
        session.select(OWNER, 0, &[0, 1]).unwrap();
        let _ = session.assign(OWNER).unwrap();
        assert_eq!(session.status(), SessionStatus::Complete);
        assert!(!session.has_unassigned());
        assert_matches!(
            session.skip(OWNER),
            Err(DraftError::InvalidState {
                op: "skip",
                status: "complete"
            })
        );
    }

    // --- Undo ---

    #[test]
    fn undo_restores_assignment_and_turn() {
        // Scenario: picker claims two of five items; undo returns both to
        // the pool and puts the same seat back on the clock.
        let mut session = session(&[OWNER, P2], 5);
        session.start(OWNER).unwrap();
        session.select(OWNER, 0, &[1, 3]).unwrap();
        let _ = session.assign(OWNER).unwrap();
        assert_eq!(session.current_picker().unwrap().id, P2);

        let restored = session.undo(OWNER).unwrap();
        assert_eq!(restored, vec![1, 3]);
        assert_eq!(session.items()[1].assigned_to, None);
        assert_eq!(session.items()[3].assigned_to, None);
        assert_eq!(session.current_picker().unwrap().id, OWNER);
        assert!(!session.can_undo(), "snapshot is cleared");
        assert!(session.selection().is_empty());
    }

    #[test]
    fn undo_does_not_touch_other_assignments() {
        let mut session = session(&[OWNER, P2], 4);
        session.start(OWNER).unwrap();
        session.select(OWNER, 0, &[0]).unwrap();
        let _ = session.assign(OWNER).unwrap(); // P2 now on the clock
        session.select(P2, 0, &[1]).unwrap();
        let _ = session.assign(P2).unwrap();

        // Only the latest commit can be undone, and only its indices move.
        let restored = session.undo(OWNER).unwrap();
        assert_eq!(restored, vec![1]);
        assert_eq!(
            session.items()[0].assigned_to,
            Some(OWNER),
            "earlier commit untouched"
        );
        assert_eq!(session.items()[1].assigned_to, None);
        assert_eq!(session.current_picker().unwrap().id, P2);
    }

    #[test]
    fn undo_after_completing_reopens_picking() {
        let mut session = session(&[OWNER], 1);
        session.start(OWNER).unwrap();
        session.select(OWNER, 0, &[0]).unwrap();
        let _ = session.assign(OWNER).unwrap();
        assert_eq!(session.status(), SessionStatus::Complete);

        let _ = session.undo(OWNER).unwrap();
        assert_eq!(session.status(), SessionStatus::Picking);
        assert!(session.has_unassigned());
    }

    #[test]
    fn undo_without_snapshot_fails() {
        let mut session = session(&[OWNER, P2], 3);
        assert_matches!(session.undo(OWNER), Err(DraftError::NothingToUndo));
        session.start(OWNER).unwrap();
        assert_matches!(session.undo(OWNER), Err(DraftError::NothingToUndo));
    }

    #[test]
    fn snapshot_depth_is_one() {
        let mut session = session(&[OWNER, P2], 4);
        session.start(OWNER).unwrap();
        session.select(OWNER, 0, &[0]).unwrap();
        let _ = session.assign(OWNER).unwrap();
        let _ = session.skip(OWNER).unwrap();

        // The skip overwrote the assign snapshot; undo rolls back the skip
        // only, leaving item 0 assigned.
        let restored = session.undo(OWNER).unwrap();
        assert!(restored.is_empty());
        assert_eq!(session.items()[0].assigned_to, Some(OWNER));
        assert_matches!(session.undo(OWNER), Err(DraftError::NothingToUndo));
    }

    // --- Removal ---

    #[test]
    fn removal_preserves_survivor_order() {
        let mut session = session(&[OWNER, P2, P3], 3);
        let outcome = session.remove_participants(OWNER, &[P2]).unwrap();
        assert_eq!(outcome, RemovalOutcome::Removed(vec![P2]));
        let ids: Vec<_> = session.participants().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![OWNER, P3]);
        assert_eq!(session.turns().seats(), 2);
    }

    #[test]
    fn removing_everyone_cancels() {
        // Scenario: removing every participant pre-start cancels rather
        // than erroring.
        let mut session = session(&[OWNER, P2], 3);
        let outcome = session.remove_participants(OWNER, &[OWNER, P2]).unwrap();
        assert_eq!(outcome, RemovalOutcome::Cancelled(vec![OWNER, P2]));
        assert_eq!(session.status(), SessionStatus::Cancelled);
    }

    #[test]
    fn removal_after_start_is_invalid() {
        let mut session = session(&[OWNER, P2], 3);
        session.start(OWNER).unwrap();
        assert_matches!(
            session.remove_participants(OWNER, &[P2]),
            Err(DraftError::InvalidState {
                op: "remove_participants",
                status: "picking"
            })
        );
    }

    #[test]
    fn removing_nobody_is_a_no_op() {
        let mut session = session(&[OWNER, P2], 3);
        let outcome = session.remove_participants(OWNER, &[OUTSIDER]).unwrap();
        assert_eq!(outcome, RemovalOutcome::Removed(vec![]));
        assert_eq!(session.participants().len(), 2);
    }

    // --- Authorization ---

    #[test]
    fn outsiders_are_rejected_everywhere() {
        let mut session = session(&[OWNER, P2], 3);
        assert_matches!(
            session.skip(OUTSIDER),
            Err(DraftError::Unauthorized { .. })
        );
        session.start(OWNER).unwrap();
        assert_matches!(
            session.select(OUTSIDER, 0, &[0]),
            Err(DraftError::Unauthorized { .. })
        );
        assert_matches!(
            session.assign(OUTSIDER),
            Err(DraftError::Unauthorized { .. })
        );
        assert_matches!(session.undo(OUTSIDER), Err(DraftError::Unauthorized { .. }));
    }

    #[test]
    fn current_picker_may_select_and_assign_only() {
        let mut session = session(&[OWNER, P2, P3], 4);
        session.start(OWNER).unwrap();
        let _ = session.skip(OWNER).unwrap(); // P2 on the clock

        session.select(P2, 0, &[0]).unwrap();
        let _ = session.assign(P2).unwrap();

        // The turn moved on to P3; P2 is neither owner nor picker now.
        assert_eq!(session.current_picker().unwrap().id, P3);
        assert_matches!(
            session.select(P2, 0, &[1]),
            Err(DraftError::Unauthorized { .. })
        );
        assert_matches!(session.skip(P2), Err(DraftError::Unauthorized { .. }));
        assert_matches!(session.undo(P2), Err(DraftError::Unauthorized { .. }));

        // Even as the picker, P2 could never skip or undo.
        let _ = session.skip(OWNER).unwrap(); // boundary repeat keeps P3
        assert_matches!(session.skip(P3), Err(DraftError::Unauthorized { .. }));
        assert_matches!(session.undo(P3), Err(DraftError::Unauthorized { .. }));
    }

    // --- Timeout ---

    #[test]
    fn time_out_is_sticky_but_not_after_terminal() {
        let mut first = session(&[OWNER], 1);
        first.start(OWNER).unwrap();
        first.select(OWNER, 0, &[0]).unwrap();
        let _ = first.assign(OWNER).unwrap();
        assert_eq!(first.status(), SessionStatus::Complete);
        first.time_out();
        assert_eq!(first.status(), SessionStatus::Complete);

        let mut other = session(&[OWNER, P2], 3);
        other.time_out();
        assert_eq!(other.status(), SessionStatus::TimedOut);
        assert_matches!(
            other.skip(OWNER),
            Err(DraftError::InvalidState {
                op: "skip",
                status: "timed_out"
            })
        );
    }
}

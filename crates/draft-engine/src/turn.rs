//! Snake-order turn progression.
//!
//! Seats advance `0 -> N-1`, then back `N-1 -> 0`, and so on. At each end
//! of the order the direction flips and the round counter increments; the
//! configured [`BoundaryPolicy`] decides whether the boundary seat picks a
//! second, consecutive time (the canonical behavior) or the cursor moves
//! straight on in the new direction.

use serde::{Deserialize, Serialize};

use crate::config::BoundaryPolicy;

/// Direction of travel through the seat order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Seat indices increasing.
    #[default]
    Forward,
    /// Seat indices decreasing.
    Reverse,
}

impl Direction {
    fn flipped(self) -> Self {
        match self {
            Self::Forward => Self::Reverse,
            Self::Reverse => Self::Forward,
        }
    }

    fn step(self) -> isize {
        match self {
            Self::Forward => 1,
            Self::Reverse => -1,
        }
    }
}

/// Where the cursor sits in the draft.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnCursor {
    /// The draft has not started (the source encodes this as turn = -1).
    NotStarted,
    /// A seat is on the clock (turn in `0..N`).
    Seat(usize),
    /// Every item is assigned (turn = N).
    Complete,
}

/// Restorable slice of sequencer state, captured before each commit for
/// single-level undo.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurnSnapshot {
    cursor: TurnCursor,
    direction: Direction,
    round: u32,
    just_reversed: bool,
}

/// The snake-draft sequencer over seat indices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnOrder {
    seats: usize,
    cursor: TurnCursor,
    direction: Direction,
    round: u32,
    just_reversed: bool,
    boundary: BoundaryPolicy,
}

impl TurnOrder {
    /// A fresh sequencer over `seats` seats, not yet started.
    #[must_use]
    pub fn new(seats: usize, boundary: BoundaryPolicy) -> Self {
        Self {
            seats,
            cursor: TurnCursor::NotStarted,
            direction: Direction::Forward,
            round: 0,
            just_reversed: false,
            boundary,
        }
    }

    /// Current cursor position.
    #[must_use]
    pub fn cursor(&self) -> TurnCursor {
        self.cursor
    }

    /// Seat on the clock, if any.
    #[must_use]
    pub fn current_seat(&self) -> Option<usize> {
        match self.cursor {
            TurnCursor::Seat(seat) => Some(seat),
            TurnCursor::NotStarted | TurnCursor::Complete => None,
        }
    }

    /// Zero-based round counter (a round ends at each reversal).
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Current direction of travel.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Whether the most recent advance flipped the direction.
    #[must_use]
    pub fn just_reversed(&self) -> bool {
        self.just_reversed
    }

    /// Number of seats in the order.
    #[must_use]
    pub fn seats(&self) -> usize {
        self.seats
    }

    /// Shrink the order after pre-start roster removal.
    ///
    /// Only meaningful while the cursor is [`TurnCursor::NotStarted`]; the
    /// roster is immutable once picking begins.
    pub fn set_seats(&mut self, seats: usize) {
        debug_assert_eq!(self.cursor, TurnCursor::NotStarted);
        self.seats = seats;
    }

    /// Move the cursor to the next turn.
    ///
    /// With no items remaining the draft is over regardless of position.
    /// From `NotStarted` the cursor lands on seat 0. Otherwise the cursor
    /// steps in the current direction; stepping out of bounds flips the
    /// direction, increments the round, and applies the boundary policy.
    pub fn advance(&mut self, items_remain: bool) {
        self.just_reversed = false;
        if !items_remain {
            self.cursor = TurnCursor::Complete;
            return;
        }
        if self.seats == 0 {
            return;
        }
        match self.cursor {
            TurnCursor::NotStarted => self.cursor = TurnCursor::Seat(0),
            TurnCursor::Complete => {}
            TurnCursor::Seat(seat) => {
                let next = seat as isize + self.direction.step();
                if (0..self.seats as isize).contains(&next) {
                    self.cursor = TurnCursor::Seat(next as usize);
                } else {
                    self.direction = self.direction.flipped();
                    self.round += 1;
                    self.just_reversed = true;
                    if self.boundary == BoundaryPolicy::AdvanceImmediately && self.seats > 1 {
                        // One step in the new direction is always in bounds
                        // when more than one seat exists.
                        let stepped = seat as isize + self.direction.step();
                        self.cursor = TurnCursor::Seat(stepped as usize);
                    }
                }
            }
        }
    }

    /// Capture the restorable state for an undo snapshot.
    #[must_use]
    pub fn snapshot(&self) -> TurnSnapshot {
        TurnSnapshot {
            cursor: self.cursor,
            direction: self.direction,
            round: self.round,
            just_reversed: self.just_reversed,
        }
    }

    /// Restore state captured by [`snapshot`](Self::snapshot).
    pub fn restore(&mut self, snapshot: TurnSnapshot) {
        self.cursor = snapshot.cursor;
        self.direction = snapshot.direction;
        self.round = snapshot.round;
        self.just_reversed = snapshot.just_reversed;
    }
}

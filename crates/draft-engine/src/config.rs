//! Engine tunables, fixed per session at creation.

/// What `assign` does when the selection buffer is empty.
///
/// Source deployments disagree on this, so it is a policy rather than a
/// hard-coded behavior.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EmptyAssignPolicy {
    /// Silently do nothing; the turn does not advance.
    #[default]
    Ignore,
    /// Reject the call with an `EmptySelection` error.
    Reject,
}

/// What happens to the cursor when the snake reaches either end of the
/// seat order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BoundaryPolicy {
    /// The boundary participant picks again before the order reverses.
    #[default]
    RepeatTurn,
    /// The cursor moves straight to the next participant in the new
    /// direction.
    AdvanceImmediately,
}

/// Tunables threaded into a [`Session`](crate::session::Session) at
/// creation time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Roster ceiling. The platform's member list caps this at 20.
    pub max_participants: usize,
    /// Item pool ceiling; `0` means unbounded.
    pub max_items: usize,
    /// Items per selection page. The platform's select control caps this
    /// at 25.
    pub page_capacity: usize,
    /// Empty-buffer `assign` handling.
    pub empty_assign: EmptyAssignPolicy,
    /// End-of-order reversal handling.
    pub boundary: BoundaryPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_participants: 20,
            max_items: 100,
            page_capacity: 25,
            empty_assign: EmptyAssignPolicy::default(),
            boundary: BoundaryPolicy::default(),
        }
    }
}

//! # draft-engine
//!
//! The pure draft session engine.
//!
//! - **Ranking**: random rolls plus tie-break permutations into a strict
//!   seat order
//! - **Turn order**: the snake sequencer with configurable boundary policy
//! - **Selection**: per-page buffer merging for paginated select controls
//! - **Session**: the aggregate with assign / skip / undo / removal and
//!   single-level history
//! - **View**: pure state-to-descriptor derivation for attached surfaces
//!
//! Everything here is synchronous and side-effect free apart from the RNG
//! injected into ranking. Locking, timers, and render dispatch live in
//! `draft-runtime`.
//!
//! ## Crate Position
//!
//! Depends on: draft-core. Depended on by: draft-runtime.

#![deny(unsafe_code)]

pub mod config;
pub mod ranking;
pub mod selection;
pub mod session;
pub mod turn;
pub mod view;

pub use config::{BoundaryPolicy, EmptyAssignPolicy, EngineConfig};
pub use ranking::{Entrant, RankedParticipant, rank};
pub use selection::SelectionBuffer;
pub use session::{AssignOutcome, Item, RemovalOutcome, Session, SessionStatus, SkipOutcome};
pub use turn::{Direction, TurnCursor, TurnOrder};
pub use view::{Banner, Control, Disposition, SurfaceRole, SurfaceView, render};

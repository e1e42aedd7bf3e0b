//! # draft-core
//!
//! Foundation types shared by every draft crate.
//!
//! - **Branded IDs**: [`ids::ParticipantId`], [`ids::SurfaceId`],
//!   [`ids::SessionHandle`] as newtypes over platform snowflakes
//! - **Errors**: [`errors::DraftError`] hierarchy via `thiserror`
//! - **Events**: [`events::DraftEvent`] lifecycle notifications with a
//!   camelCase JSON wire format
//! - **Text**: UTF-8-safe label truncation helpers
//! - **Logging**: `tracing` subscriber bootstrap
//!
//! ## Crate Position
//!
//! Foundation crate. Depended on by all other draft crates.

#![deny(unsafe_code)]

pub mod errors;
pub mod events;
pub mod ids;
pub mod logging;
pub mod text;

pub use errors::DraftError;
pub use events::{BaseEvent, DraftEvent};
pub use ids::{ParticipantId, SessionHandle, SurfaceId};

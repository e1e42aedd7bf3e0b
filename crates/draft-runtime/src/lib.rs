//! # draft-runtime
//!
//! Async coordination for the draft engine.
//!
//! - **Registry**: session store keyed by primary surface id, one `tokio`
//!   mutex per session, no global lock
//! - **Watchdog**: cancellable inactivity timer, rearmed under the session
//!   lock after every successful mutation
//! - **Coordinator**: view fan-out to attached surfaces; delivery failures
//!   are swallowed and logged
//! - **Emitter**: broadcast channel carrying lifecycle notifications
//!
//! ## Crate Position
//!
//! Aggregation layer. Depends on: draft-core, draft-engine, draft-settings.
//! This is the crate hosts embed.

#![deny(unsafe_code)]

pub mod config;
pub mod coordinator;
pub mod emitter;
pub mod registry;
pub mod surface;
pub mod testutil;

pub use config::RegistryConfig;
pub use coordinator::{SurfaceUpdate, ViewCoordinator};
pub use emitter::EventEmitter;
pub use registry::SessionRegistry;
pub use surface::{OutputSurface, SurfaceBinding, SurfaceError};

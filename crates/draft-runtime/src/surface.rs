//! Output surface abstraction.
//!
//! A surface is an external rendered representation of session state,
//! typically a chat message. Surfaces are owned and transported by the
//! caller; the engine only hands them freshly derived views.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use draft_core::SurfaceId;
use draft_engine::{SurfaceRole, SurfaceView};

/// Error delivering a view to a surface.
///
/// These never propagate into the engine's mutation path; the coordinator
/// swallows and logs them.
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    /// The surface no longer exists (deleted message, vanished channel).
    #[error("surface is gone")]
    Gone,
    /// The platform rejected or failed the update.
    #[error("delivery failed: {0}")]
    Delivery(String),
}

/// A caller-owned render target.
#[async_trait]
pub trait OutputSurface: Send + Sync {
    /// Apply a freshly derived view.
    async fn apply(&self, view: &SurfaceView) -> Result<(), SurfaceError>;

    /// Tear the surface down entirely.
    ///
    /// Dispatched for transient surfaces once the session reaches a
    /// terminal state.
    async fn retire(&self) -> Result<(), SurfaceError>;
}

/// An attachment of one surface to a session.
#[derive(Clone)]
pub struct SurfaceBinding {
    /// Platform identity of the surface.
    pub id: SurfaceId,
    /// Which descriptor the surface renders.
    pub role: SurfaceRole,
    /// The render target itself.
    pub surface: Arc<dyn OutputSurface>,
}

impl SurfaceBinding {
    /// Bind a surface under the given role.
    pub fn new(id: impl Into<SurfaceId>, role: SurfaceRole, surface: Arc<dyn OutputSurface>) -> Self {
        Self {
            id: id.into(),
            role,
            surface,
        }
    }
}

impl fmt::Debug for SurfaceBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurfaceBinding")
            .field("id", &self.id)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

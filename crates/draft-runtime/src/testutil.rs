//! Shared test support.
//!
//! [`RecordingSurface`] stands in for a platform message in tests: it
//! records every applied view, remembers whether it was retired, and can be
//! told to fail every delivery.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use draft_core::SurfaceId;
use draft_engine::{SurfaceRole, SurfaceView};

use crate::surface::{OutputSurface, SurfaceBinding, SurfaceError};

#[derive(Default)]
struct RecordingState {
    applied: Vec<SurfaceView>,
    retired: bool,
}

/// An in-memory surface that records everything dispatched to it.
#[derive(Clone, Default)]
pub struct RecordingSurface {
    state: Arc<Mutex<RecordingState>>,
    fail: bool,
}

impl RecordingSurface {
    /// A healthy surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A surface whose every delivery fails, as if the platform message
    /// had been deleted.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            state: Arc::default(),
            fail: true,
        }
    }

    /// Bind this surface to a session under `role`.
    #[must_use]
    pub fn binding(&self, id: u64, role: SurfaceRole) -> SurfaceBinding {
        SurfaceBinding::new(SurfaceId::new(id), role, Arc::new(self.clone()))
    }

    /// Every view applied so far, oldest first.
    #[must_use]
    pub fn applied(&self) -> Vec<SurfaceView> {
        self.state.lock().applied.clone()
    }

    /// The most recently applied view.
    #[must_use]
    pub fn last_view(&self) -> Option<SurfaceView> {
        self.state.lock().applied.last().cloned()
    }

    /// Whether the surface was torn down.
    #[must_use]
    pub fn is_retired(&self) -> bool {
        self.state.lock().retired
    }
}

#[async_trait]
impl OutputSurface for RecordingSurface {
    async fn apply(&self, view: &SurfaceView) -> Result<(), SurfaceError> {
        if self.fail {
            return Err(SurfaceError::Gone);
        }
        self.state.lock().applied.push(view.clone());
        Ok(())
    }

    async fn retire(&self) -> Result<(), SurfaceError> {
        if self.fail {
            return Err(SurfaceError::Gone);
        }
        self.state.lock().retired = true;
        Ok(())
    }
}

//! View fan-out to attached output surfaces.
//!
//! Descriptors are computed under the session lock (cheap, pure) and
//! dispatched after the lock is released, so surface I/O never extends a
//! critical section. A failure against one surface is swallowed, logged,
//! and counted; it neither rolls back the mutation nor skips the others.

use draft_core::SessionHandle;
use draft_engine::{Disposition, Session, SurfaceView, render};
use metrics::counter;
use tracing::{debug, warn};

use crate::surface::SurfaceBinding;

/// One planned surface update.
#[derive(Clone, Debug)]
pub struct SurfaceUpdate {
    /// Where the view goes.
    pub binding: SurfaceBinding,
    /// The freshly derived view.
    pub view: SurfaceView,
}

/// Recomputes and dispatches descriptors for every attached surface.
#[derive(Clone, Copy, Debug, Default)]
pub struct ViewCoordinator;

impl ViewCoordinator {
    /// Derive a view for every binding. Pure; called under the session
    /// lock so all surfaces see the same state.
    #[must_use]
    pub fn plan(session: &Session, bindings: &[SurfaceBinding]) -> Vec<SurfaceUpdate> {
        bindings
            .iter()
            .map(|binding| SurfaceUpdate {
                binding: binding.clone(),
                view: render(session, binding.role),
            })
            .collect()
    }

    /// Deliver planned updates, swallowing per-surface failures.
    pub async fn dispatch(self, handle: SessionHandle, updates: Vec<SurfaceUpdate>) {
        let recipients = updates.len();
        for update in updates {
            let result = match update.view.disposition {
                Disposition::Retire => update.binding.surface.retire().await,
                Disposition::Keep => update.binding.surface.apply(&update.view).await,
            };
            if let Err(e) = result {
                counter!("draft_render_failures_total").increment(1);
                warn!(
                    %handle,
                    surface = %update.binding.id,
                    error = %e,
                    "failed to deliver view to surface"
                );
            }
        }
        debug!(%handle, recipients, "views dispatched");
    }
}

//! The session registry and lifecycle manager.
//!
//! Owns every live [`Session`] behind a per-session `tokio` mutex inside a
//! sharded map, so unrelated sessions never contend. Each mutating call
//! runs the engine operation under the lock, replans views and rearms the
//! inactivity watchdog while still holding it, then dispatches surface I/O
//! after release. Terminal transitions (complete, cancelled, timed out)
//! remove the entry and cancel the watchdog; a removed handle behaves as if
//! it never existed.

use std::sync::Arc;

use dashmap::DashMap;
use metrics::{counter, gauge};
use tokio::sync::{Mutex, broadcast};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use draft_core::events::{
    self, BaseEvent, DraftEvent, draft_started_event, draft_timed_out_event,
};
use draft_core::{DraftError, ParticipantId, SessionHandle, SurfaceId};
use draft_engine::ranking::{Entrant, rank};
use draft_engine::{
    AssignOutcome, RemovalOutcome, Session, SessionStatus, SkipOutcome, SurfaceView, TurnCursor,
};

use crate::config::RegistryConfig;
use crate::coordinator::ViewCoordinator;
use crate::emitter::EventEmitter;
use crate::surface::SurfaceBinding;

/// Everything guarded by one session's lock: the session itself, its
/// attached surfaces, and the watchdog token. Sharing the lock is what
/// keeps a stale timer from firing against an already-mutated session.
struct SessionState {
    session: Session,
    surfaces: Vec<SurfaceBinding>,
    watchdog: Option<CancellationToken>,
    /// Set by `destroy`; makes queued waiters treat the session as gone.
    destroyed: bool,
}

struct SessionEntry {
    state: Mutex<SessionState>,
}

/// What a mutation closure reports back to the pipeline.
enum Effect {
    /// State changed: emit these events and redispatch every surface.
    Changed(Vec<DraftEvent>),
    /// Nothing observable changed; just count the activity.
    Unchanged,
}

/// Multi-session coordinator: registry, watchdog, and render pipeline.
pub struct SessionRegistry {
    entries: DashMap<SessionHandle, Arc<SessionEntry>>,
    emitter: EventEmitter,
    coordinator: ViewCoordinator,
    config: RegistryConfig,
}

impl SessionRegistry {
    /// Create a registry with the given configuration.
    #[must_use]
    pub fn new(config: RegistryConfig) -> Arc<Self> {
        Arc::new(Self {
            entries: DashMap::new(),
            emitter: EventEmitter::new(),
            coordinator: ViewCoordinator,
            config,
        })
    }

    /// Subscribe to lifecycle notifications.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DraftEvent> {
        self.emitter.subscribe()
    }

    /// Number of live sessions.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.entries.len()
    }

    /// Whether a handle is currently registered.
    #[must_use]
    pub fn contains(&self, handle: SessionHandle) -> bool {
        self.entries.contains_key(&handle)
    }

    /// The configuration this registry was built with.
    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────

    /// Rank the entrants, validate limits, and register a new session.
    ///
    /// The session's handle is the primary surface's id. Surfaces receive
    /// their initial views before this returns.
    #[instrument(skip_all, fields(owner = %owner))]
    pub async fn create(
        self: &Arc<Self>,
        entrants: &[Entrant],
        item_names: Vec<String>,
        owner: ParticipantId,
        primary: SurfaceBinding,
        extra_surfaces: Vec<SurfaceBinding>,
    ) -> Result<SessionHandle, DraftError> {
        let handle = SessionHandle::from(primary.id);
        let mut rng = rand::rng();
        let ranked = rank(&mut rng, entrants);
        let session = Session::new(handle, owner, ranked, item_names, self.config.engine)?;

        // Replacing a live handle is a caller bug, but never leak its
        // watchdog.
        if self.destroy(handle).await {
            warn!(%handle, "replaced an existing session under the same handle");
        }

        let mut surfaces = vec![primary];
        surfaces.extend(extra_surfaces);

        let entry = Arc::new(SessionEntry {
            state: Mutex::new(SessionState {
                session,
                surfaces,
                watchdog: None,
                destroyed: false,
            }),
        });

        let updates = {
            let mut state = entry.state.lock().await;
            self.arm_watchdog(handle, &mut state);
            let _ = self.emitter.emit(events::session_created_event(
                handle,
                state.session.participants().len(),
                state.session.items().len(),
            ));
            ViewCoordinator::plan(&state.session, &state.surfaces)
        };

        let _ = self.entries.insert(handle, entry);
        gauge!("draft_sessions_active").set(self.entries.len() as f64);
        info!(%handle, "session created");

        self.coordinator.dispatch(handle, updates).await;
        Ok(handle)
    }

    /// Tear a session down. Idempotent: an absent handle is a no-op.
    ///
    /// Unconditionally cancels the watchdog. No final render is dispatched;
    /// this is the host's own teardown path.
    #[instrument(skip(self))]
    pub async fn destroy(&self, handle: SessionHandle) -> bool {
        let Some((_, entry)) = self.entries.remove(&handle) else {
            return false;
        };
        let mut state = entry.state.lock().await;
        state.destroyed = true;
        if let Some(token) = state.watchdog.take() {
            token.cancel();
        }
        gauge!("draft_sessions_active").set(self.entries.len() as f64);
        info!(%handle, "session destroyed");
        true
    }

    // ─────────────────────────────────────────────────────────────────────
    // Operations
    // ─────────────────────────────────────────────────────────────────────

    /// Begin the draft.
    pub async fn start(
        self: &Arc<Self>,
        handle: SessionHandle,
        actor: ParticipantId,
    ) -> Result<(), DraftError> {
        self.mutate(handle, |session| {
            session.start(actor)?;
            Ok(((), Effect::Changed(vec![draft_started_event(handle)])))
        })
        .await
    }

    /// Merge a selection event for one page into the session's buffer.
    ///
    /// A stale page reference is ignored: items were reassigned while the
    /// event was in flight, and the control is about to be redrawn anyway.
    pub async fn select(
        self: &Arc<Self>,
        handle: SessionHandle,
        actor: ParticipantId,
        page: usize,
        values: &[usize],
    ) -> Result<(), DraftError> {
        let result = self
            .mutate(handle, |session| {
                session.select(actor, page, values)?;
                Ok(((), Effect::Changed(Vec::new())))
            })
            .await;
        match result {
            Err(DraftError::StaleSelection { page }) => {
                debug!(%handle, page, "stale selection reference ignored");
                Ok(())
            }
            other => other,
        }
    }

    /// Commit the selection buffer to the current picker.
    pub async fn assign(
        self: &Arc<Self>,
        handle: SessionHandle,
        actor: ParticipantId,
    ) -> Result<AssignOutcome, DraftError> {
        self.mutate(handle, |session| {
            let outcome = session.assign(actor)?;
            let effect = match &outcome {
                AssignOutcome::Assigned { picker, indices } => {
                    let mut batch = vec![DraftEvent::ItemsAssigned {
                        base: BaseEvent::now(handle),
                        picker: *picker,
                        indices: indices.clone(),
                    }];
                    batch.extend(turn_advanced_event(handle, session));
                    Effect::Changed(batch)
                }
                AssignOutcome::Ignored => Effect::Unchanged,
            };
            Ok((outcome, effect))
        })
        .await
    }

    /// Skip the current turn (or start the draft from setup).
    pub async fn skip(
        self: &Arc<Self>,
        handle: SessionHandle,
        actor: ParticipantId,
    ) -> Result<SkipOutcome, DraftError> {
        self.mutate(handle, |session| {
            let outcome = session.skip(actor)?;
            let batch = match outcome {
                SkipOutcome::Started => vec![draft_started_event(handle)],
                SkipOutcome::Skipped => {
                    let mut batch = vec![DraftEvent::TurnSkipped {
                        base: BaseEvent::now(handle),
                    }];
                    batch.extend(turn_advanced_event(handle, session));
                    batch
                }
            };
            Ok((outcome, Effect::Changed(batch)))
        })
        .await
    }

    /// Roll back the most recent assign or skip.
    pub async fn undo(
        self: &Arc<Self>,
        handle: SessionHandle,
        actor: ParticipantId,
    ) -> Result<Vec<usize>, DraftError> {
        self.mutate(handle, |session| {
            let restored = session.undo(actor)?;
            let event = DraftEvent::ActionUndone {
                base: BaseEvent::now(handle),
                restored: restored.clone(),
            };
            Ok((restored, Effect::Changed(vec![event])))
        })
        .await
    }

    /// Remove participants from the roster before the draft starts.
    pub async fn remove_participants(
        self: &Arc<Self>,
        handle: SessionHandle,
        actor: ParticipantId,
        ids: &[ParticipantId],
    ) -> Result<RemovalOutcome, DraftError> {
        self.mutate(handle, |session| {
            let outcome = session.remove_participants(actor, ids)?;
            let effect = match &outcome {
                RemovalOutcome::Removed(removed) if removed.is_empty() => Effect::Unchanged,
                RemovalOutcome::Removed(removed) | RemovalOutcome::Cancelled(removed) => {
                    Effect::Changed(vec![DraftEvent::ParticipantsRemoved {
                        base: BaseEvent::now(handle),
                        removed: removed.clone(),
                    }])
                }
            };
            Ok((outcome, effect))
        })
        .await
    }

    /// Derive the current view for one attached surface. Never mutates and
    /// never resets the watchdog.
    pub async fn render(
        &self,
        handle: SessionHandle,
        surface: SurfaceId,
    ) -> Result<SurfaceView, DraftError> {
        let entry = self.lookup(handle)?;
        let state = entry.state.lock().await;
        if state.destroyed || state.session.status().is_terminal() {
            return Err(DraftError::SessionNotFound(handle));
        }
        let binding = state
            .surfaces
            .iter()
            .find(|b| b.id == surface)
            .ok_or(DraftError::UnknownSurface { surface })?;
        Ok(draft_engine::render(&state.session, binding.role))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────

    fn lookup(&self, handle: SessionHandle) -> Result<Arc<SessionEntry>, DraftError> {
        self.entries
            .get(&handle)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(DraftError::SessionNotFound(handle))
    }

    /// Run one engine operation under the session's lock, then handle
    /// watchdog, events, terminal cleanup, and render dispatch.
    async fn mutate<T, F>(self: &Arc<Self>, handle: SessionHandle, op: F) -> Result<T, DraftError>
    where
        F: FnOnce(&mut Session) -> Result<(T, Effect), DraftError>,
    {
        let entry = self.lookup(handle)?;
        let mut state = entry.state.lock().await;
        if state.destroyed || state.session.status().is_terminal() {
            // The entry is on its way out; a queued waiter sees it as gone.
            return Err(DraftError::SessionNotFound(handle));
        }

        let (value, effect) = op(&mut state.session)?;

        let mut batch = match effect {
            Effect::Changed(batch) => batch,
            Effect::Unchanged => {
                // Still activity: the watchdog restarts, but surfaces and
                // subscribers have nothing new to see.
                self.arm_watchdog(handle, &mut state);
                return Ok(value);
            }
        };

        let status = state.session.status();
        match status {
            SessionStatus::Complete => batch.push(events::draft_complete_event(handle)),
            SessionStatus::Cancelled => batch.push(events::draft_cancelled_event(handle)),
            _ => {}
        }

        let updates = ViewCoordinator::plan(&state.session, &state.surfaces);
        if status.is_terminal() {
            if let Some(token) = state.watchdog.take() {
                token.cancel();
            }
        } else {
            self.arm_watchdog(handle, &mut state);
        }
        for event in batch {
            let _ = self.emitter.emit(event);
        }
        drop(state);

        if status.is_terminal() {
            let _ = self.entries.remove(&handle);
            gauge!("draft_sessions_active").set(self.entries.len() as f64);
            info!(%handle, status = status.as_str(), "session ended");
        }

        self.coordinator.dispatch(handle, updates).await;
        Ok(value)
    }

    /// Cancel any armed watchdog and schedule a fresh one.
    ///
    /// Called with the session lock held, so a timer can never survive the
    /// mutation that should have reset it.
    fn arm_watchdog(self: &Arc<Self>, handle: SessionHandle, state: &mut SessionState) {
        if let Some(old) = state.watchdog.take() {
            old.cancel();
        }
        let token = CancellationToken::new();
        state.watchdog = Some(token.clone());

        let timeout = self.config.inactivity_timeout;
        let registry = Arc::downgrade(self);
        let guard = token.clone();
        let _ = tokio::spawn(async move {
            tokio::select! {
                () = guard.cancelled_owned() => {}
                () = tokio::time::sleep(timeout) => {
                    if let Some(registry) = registry.upgrade() {
                        registry.expire(handle, token).await;
                    }
                }
            }
        });
    }

    /// Watchdog firing path: transition to timed-out and tear down.
    #[instrument(skip(self, token))]
    async fn expire(self: Arc<Self>, handle: SessionHandle, token: CancellationToken) {
        let Ok(entry) = self.lookup(handle) else {
            return;
        };
        let mut state = entry.state.lock().await;
        // A mutation or destroy may have won the race while the timer
        // waited for the lock; its cancel makes this firing stale.
        if token.is_cancelled() || state.destroyed || state.session.status().is_terminal() {
            return;
        }

        state.session.time_out();
        state.watchdog = None;
        let updates = ViewCoordinator::plan(&state.session, &state.surfaces);
        let _ = self.emitter.emit(draft_timed_out_event(handle));
        drop(state);

        let _ = self.entries.remove(&handle);
        gauge!("draft_sessions_active").set(self.entries.len() as f64);
        counter!("draft_sessions_timed_out_total").increment(1);
        warn!(%handle, "session timed out from inactivity");

        self.coordinator.dispatch(handle, updates).await;
    }
}

/// Turn-advanced event for the seat now on the clock, if any.
fn turn_advanced_event(handle: SessionHandle, session: &Session) -> Option<DraftEvent> {
    match session.turns().cursor() {
        TurnCursor::Seat(seat) => Some(DraftEvent::TurnAdvanced {
            base: BaseEvent::now(handle),
            seat,
            round: session.turns().round(),
            reversed: session.turns().just_reversed(),
        }),
        TurnCursor::NotStarted | TurnCursor::Complete => None,
    }
}

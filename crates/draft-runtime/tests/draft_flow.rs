//! End-to-end draft flows through the public registry surface.

use std::sync::Arc;
use std::time::Duration;

use draft_core::{DraftError, ParticipantId, SessionHandle, SurfaceId};
use draft_engine::ranking::Entrant;
use draft_engine::{AssignOutcome, Banner, Control, SurfaceRole};
use draft_runtime::testutil::RecordingSurface;
use draft_runtime::{RegistryConfig, SessionRegistry};

const OWNER: ParticipantId = ParticipantId::new(1);

fn entrants(n: u64) -> Vec<Entrant> {
    (1..=n)
        .map(|i| Entrant::new(i, format!("player-{i}")))
        .collect()
}

fn items(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("relic-{i}")).collect()
}

/// The picker currently on the clock, read off the primary view.
async fn current_picker(
    registry: &Arc<SessionRegistry>,
    handle: SessionHandle,
    primary: SurfaceId,
) -> ParticipantId {
    match registry.render(handle, primary).await.unwrap().banner {
        Banner::Turn { picker, .. } => picker,
        other => panic!("expected a running turn, got {other:?}"),
    }
}

/// All (page, values) pairs currently offered by the item selects.
async fn offered_pages(
    registry: &Arc<SessionRegistry>,
    handle: SessionHandle,
    primary: SurfaceId,
) -> Vec<(usize, Vec<usize>)> {
    registry
        .render(handle, primary)
        .await
        .unwrap()
        .controls
        .iter()
        .filter_map(|control| match control {
            Control::ItemSelect { page, options, .. } => Some((
                *page,
                options.iter().map(|o| o.value as usize).collect(),
            )),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn full_draft_lifecycle() {
    let registry = SessionRegistry::new(RegistryConfig::default());
    let mut rx = registry.subscribe();

    let primary = RecordingSurface::new();
    let item_list = RecordingSurface::new();
    let broken = RecordingSurface::failing();

    // 30 items span two selection pages of the default capacity 25.
    let handle = registry
        .create(
            &entrants(3),
            items(30),
            OWNER,
            primary.binding(1000, SurfaceRole::Primary),
            vec![
                item_list.binding(1001, SurfaceRole::ItemList),
                broken.binding(1002, SurfaceRole::Primary),
            ],
        )
        .await
        .unwrap();
    let primary_id = SurfaceId::new(1000);

    registry.start(handle, OWNER).await.unwrap();
    let first_picker = current_picker(&registry, handle, primary_id).await;

    // The picker (not the owner) accumulates choices across both pages,
    // then commits.
    registry
        .select(handle, first_picker, 0, &[0, 1])
        .await
        .unwrap();
    registry.select(handle, first_picker, 1, &[26]).await.unwrap();
    let outcome = registry.assign(handle, first_picker).await.unwrap();
    match outcome {
        AssignOutcome::Assigned { picker, indices } => {
            assert_eq!(picker, first_picker);
            assert_eq!(indices, vec![0, 1, 26]);
        }
        AssignOutcome::Ignored => panic!("a non-empty buffer must assign"),
    }

    // Stable numbering: claimed relics vanish from the list surface but
    // the survivors keep their original numbers.
    let list_view = item_list.last_view().unwrap();
    assert_eq!(list_view.remaining.len(), 27);
    assert!(list_view.remaining.iter().all(|l| l.display_index != 1));
    assert!(list_view.remaining.iter().any(|l| l.display_index == 30));

    // Undo puts all three relics back and returns the turn to the picker.
    let restored = registry.undo(handle, OWNER).await.unwrap();
    assert_eq!(restored, vec![0, 1, 26]);
    assert_eq!(
        current_picker(&registry, handle, primary_id).await,
        first_picker
    );
    assert_eq!(item_list.last_view().unwrap().remaining.len(), 30);

    // Drain the pool: each turn, claim everything on offer.
    while registry.contains(handle) {
        let picker = current_picker(&registry, handle, primary_id).await;
        for (page, values) in offered_pages(&registry, handle, primary_id).await {
            registry.select(handle, picker, page, &values).await.unwrap();
        }
        let _ = registry.assign(handle, picker).await.unwrap();
    }

    // Terminal bookkeeping: the handle is gone, the list surface retired,
    // the primary ends on a control-free completed view, and the broken
    // surface never disturbed any of it.
    assert_eq!(registry.active_count(), 0);
    assert!(item_list.is_retired());
    let final_view = primary.last_view().unwrap();
    assert_eq!(final_view.banner, Banner::Complete);
    assert!(final_view.controls.is_empty());
    assert!(final_view.remaining.is_empty());
    assert!(broken.applied().is_empty());

    let types: Vec<String> = std::iter::from_fn(|| rx.try_recv().ok())
        .map(|e| e.event_type().to_owned())
        .collect();
    assert_eq!(types.first().unwrap(), "session_created");
    assert_eq!(types.last().unwrap(), "draft_complete");
    assert_eq!(
        types.iter().filter(|t| *t == "draft_complete").count(),
        1,
        "exactly one terminal notification"
    );
    assert!(types.iter().any(|t| t == "action_undone"));

    assert!(
        matches!(
            registry.render(handle, primary_id).await,
            Err(DraftError::SessionNotFound(_))
        ),
        "a destroyed session is never rendered again"
    );
}

#[tokio::test]
async fn snake_order_walks_forward_then_backward() {
    let registry = SessionRegistry::new(RegistryConfig::default());
    let primary = RecordingSurface::new();
    let handle = registry
        .create(
            &entrants(3),
            items(40),
            OWNER,
            primary.binding(2000, SurfaceRole::Primary),
            vec![],
        )
        .await
        .unwrap();
    let primary_id = SurfaceId::new(2000);

    registry.start(handle, OWNER).await.unwrap();

    let mut seats = Vec::new();
    let mut rounds = Vec::new();
    for _ in 0..6 {
        let view = registry.render(handle, primary_id).await.unwrap();
        match view.banner {
            Banner::Turn { seat, round, .. } => {
                seats.push(seat);
                rounds.push(round);
            }
            other => panic!("expected a running turn, got {other:?}"),
        }
        let _ = registry.skip(handle, OWNER).await.unwrap();
    }

    // 1-based seats: forward 1,2,3 then the boundary seat repeats and the
    // order walks back.
    assert_eq!(seats, vec![1, 2, 3, 3, 2, 1]);
    assert_eq!(rounds, vec![0, 0, 0, 1, 1, 1]);
}

#[tokio::test]
async fn concurrent_sessions_do_not_interfere() {
    let registry = SessionRegistry::new(RegistryConfig::default());

    let mut handles = Vec::new();
    for i in 0..4u64 {
        let primary = RecordingSurface::new();
        let handle = registry
            .create(
                &entrants(2),
                items(5),
                OWNER,
                primary.binding(3000 + i, SurfaceRole::Primary),
                vec![],
            )
            .await
            .unwrap();
        handles.push((handle, primary));
    }
    assert_eq!(registry.active_count(), 4);

    // Interleave operations across all sessions concurrently.
    let mut tasks = Vec::new();
    for (handle, _) in &handles {
        let registry = Arc::clone(&registry);
        let handle = *handle;
        tasks.push(tokio::spawn(async move {
            registry.start(handle, OWNER).await.unwrap();
            let _ = registry.skip(handle, OWNER).await.unwrap();
            let _ = registry.skip(handle, OWNER).await.unwrap();
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    // Every session independently reached the same place: two skips past
    // the start of a two-seat order is the boundary repeat.
    for (handle, primary) in &handles {
        assert!(registry.contains(*handle));
        match primary.last_view().unwrap().banner {
            Banner::Turn { seat, round, again, .. } => {
                assert_eq!(seat, 2);
                assert_eq!(round, 1);
                assert!(again);
            }
            other => panic!("expected a running turn, got {other:?}"),
        }
    }
}

#[tokio::test(start_paused = true)]
async fn idle_sessions_time_out_and_stop_rendering() {
    let config = RegistryConfig {
        inactivity_timeout: Duration::from_secs(600),
        ..RegistryConfig::default()
    };
    let registry = SessionRegistry::new(config);
    let mut rx = registry.subscribe();

    let primary = RecordingSurface::new();
    let item_list = RecordingSurface::new();
    let handle = registry
        .create(
            &entrants(2),
            items(3),
            OWNER,
            primary.binding(4000, SurfaceRole::Primary),
            vec![item_list.binding(4001, SurfaceRole::ItemList)],
        )
        .await
        .unwrap();
    let _ = rx.try_recv(); // session_created

    registry.start(handle, OWNER).await.unwrap();
    let _ = rx.try_recv(); // draft_started

    tokio::time::sleep(Duration::from_secs(601)).await;
    tokio::task::yield_now().await;

    assert!(!registry.contains(handle));
    assert_eq!(rx.try_recv().unwrap().event_type(), "draft_timed_out");

    // The primary keeps a final timed-out view with the unclaimed items;
    // the transient list surface is gone.
    let final_view = primary.last_view().unwrap();
    assert_eq!(final_view.banner, Banner::TimedOut);
    assert!(final_view.controls.is_empty());
    assert_eq!(final_view.remaining.len(), 3);
    assert!(item_list.is_retired());

    assert!(matches!(
        registry.render(handle, SurfaceId::new(4000)).await,
        Err(DraftError::SessionNotFound(_))
    ));
}

//! Deterministic escalation tests against the scripted simulated host.
//!
//! Paused-clock tokio time makes every verification wait and input pause
//! resolve instantly while preserving elapsed-time semantics.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use rowrelay_view::sim::{SimBehavior, SimHost, SimOp, Technique};
use tokio::sync::mpsc;

use crate::{
    EngineConfig, MoveOutcome, Notice, Notifier, ReorderController, Severity,
    bridge::{BridgeError, BridgeStep, InputBridge},
    error::{RejectReason, StrategyError},
    menu::MoveSelection,
    model,
    strategy::{AttemptContext, Strategy, StrategyId},
};

fn controller(host: &Arc<SimHost>) -> ReorderController {
    ReorderController::new(host.clone(), EngineConfig::default())
}

fn drain(rx: &mut mpsc::Receiver<Notice>) -> Vec<Notice> {
    let mut notices = Vec::new();
    while let Ok(notice) = rx.try_recv() {
        notices.push(notice);
    }
    notices
}

/// Strategy double that always faults.
struct Faulty(StrategyId);

#[async_trait]
impl Strategy for Faulty {
    fn id(&self) -> StrategyId {
        self.0
    }

    async fn attempt(&self, _cx: &AttemptContext<'_>) -> Result<bool, StrategyError> {
        Err(StrategyError::View(rowrelay_view::Error::Dispatch(
            "sensor exploded".into(),
        )))
    }
}

/// Strategy double that completes without touching the host.
struct InertAttempt(StrategyId);

#[async_trait]
impl Strategy for InertAttempt {
    fn id(&self) -> StrategyId {
        self.0
    }

    async fn attempt(&self, _cx: &AttemptContext<'_>) -> Result<bool, StrategyError> {
        Ok(true)
    }
}

#[derive(Default)]
struct RecordingBridge {
    attaches: AtomicUsize,
    detaches: AtomicUsize,
    sequences: Mutex<Vec<usize>>,
}

#[async_trait]
impl InputBridge for RecordingBridge {
    async fn attach(&self) -> Result<(), BridgeError> {
        self.attaches.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn send_input(&self, sequence: &[BridgeStep]) -> Result<(), BridgeError> {
        self.sequences
            .lock()
            .expect("bridge lock")
            .push(sequence.len());
        Ok(())
    }

    async fn detach(&self) -> Result<(), BridgeError> {
        self.detaches.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[tokio::test(start_paused = true)]
async fn store_verifies_after_hook_fails_verification() {
    // The hook is reachable but the host ignores what it is told; the
    // store dispatch is what actually lands.
    let behavior = SimBehavior {
        hook_present: true,
        ..SimBehavior::accepting(&[Technique::Store])
    };
    let host = SimHost::with_behavior(&["A", "B", "C", "D", "E"], behavior);
    let ctrl = controller(&host);

    let report = ctrl.move_item_report(0, 3).await;

    assert_eq!(report.outcome, MoveOutcome::Verified(StrategyId::Store));
    assert_eq!(host.names(), ["B", "C", "A", "D", "E"]);
    assert_eq!(report.attempts[0].strategy, StrategyId::Hook);
    assert!(report.attempts[0].attempted);
    assert!(!report.attempts[0].verification.expect("hook verified").changed);
    assert!(report.attempts[1].verification.expect("store verified").changed);
}

#[tokio::test(start_paused = true)]
async fn upward_move_lands_before_original_target() {
    let host = SimHost::new(&["X", "Y", "Z"]);
    let ctrl = controller(&host);

    assert!(ctrl.move_item(2, 0).await);
    assert_eq!(host.names(), ["Z", "X", "Y"]);
}

#[tokio::test(start_paused = true)]
async fn noop_requests_run_zero_strategies() {
    let host = SimHost::new(&["A", "B", "C"]);
    let ctrl = controller(&host);

    let same = ctrl.move_item_report(1, 1).await;
    let successor = ctrl.move_item_report(1, 2).await;

    assert_eq!(
        same.outcome,
        MoveOutcome::Rejected(RejectReason::Noop { from: 1, to: 1 })
    );
    assert_eq!(
        successor.outcome,
        MoveOutcome::Rejected(RejectReason::Noop { from: 1, to: 2 })
    );
    assert_eq!(ctrl.counters().total_attempts(), 0);
    assert_eq!(host.names(), ["A", "B", "C"]);
    assert!(host.take_ops().is_empty());
}

#[tokio::test(start_paused = true)]
async fn out_of_range_requests_are_rejected() {
    let host = SimHost::new(&["A", "B", "C"]);
    let ctrl = controller(&host);

    let report = ctrl.move_item_report(0, 7).await;
    assert_eq!(
        report.outcome,
        MoveOutcome::Rejected(RejectReason::OutOfRange {
            from: 0,
            to: 7,
            len: 3
        })
    );
    assert!(!ctrl.move_item(9, 0).await);
    assert_eq!(ctrl.counters().total_attempts(), 0);
}

#[tokio::test(start_paused = true)]
async fn empty_container_rejects_without_strategies() {
    let host = SimHost::new(&[]);
    let ctrl = controller(&host);
    assert!(!ctrl.move_item(0, 1).await);
    assert_eq!(ctrl.counters().total_attempts(), 0);
}

#[tokio::test(start_paused = true)]
async fn concurrent_move_is_rejected_not_queued() {
    let host = SimHost::with_behavior(&["A", "B", "C", "D"], SimBehavior::deaf());
    let ctrl = controller(&host);

    // The first run parks inside strategy pacing with the guard held; the
    // second must resolve immediately with a busy rejection.
    let (first, second) = tokio::join!(ctrl.move_item_report(0, 2), ctrl.move_item_report(2, 0));

    assert_eq!(second.outcome, MoveOutcome::Rejected(RejectReason::Busy));
    // The first run still terminates on its own (splice fallback).
    assert_eq!(first.outcome, MoveOutcome::Verified(StrategyId::Splice));
    assert_eq!(ctrl.counters().rejected_busy, 1);
}

#[tokio::test(start_paused = true)]
async fn all_faulting_strategies_still_resolve() {
    let host = SimHost::new(&["A", "B", "C"]);
    let (tx, mut rx) = mpsc::channel(8);
    let ctrl = controller(&host)
        .with_notifier(Notifier::new(tx))
        .with_strategies(vec![
            Box::new(Faulty(StrategyId::Hook)),
            Box::new(Faulty(StrategyId::PointerDrag)),
            Box::new(Faulty(StrategyId::Splice)),
        ]);

    let report = ctrl.move_item_report(0, 2).await;

    assert_eq!(report.outcome, MoveOutcome::Exhausted);
    assert!(report.attempts.iter().all(|a| a.fault.is_some()));
    assert_eq!(host.names(), ["A", "B", "C"]);
    let notices = drain(&mut rx);
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].severity, Severity::Error);
}

#[tokio::test(start_paused = true)]
async fn exhaustion_leaves_order_and_notifies_once() {
    let host = SimHost::new(&["A", "B", "C"]);
    let (tx, mut rx) = mpsc::channel(8);
    let ctrl = controller(&host)
        .with_notifier(Notifier::new(tx))
        .with_strategies(vec![
            Box::new(InertAttempt(StrategyId::Hook)),
            Box::new(InertAttempt(StrategyId::Store)),
            Box::new(InertAttempt(StrategyId::Keyboard)),
        ]);

    let report = ctrl.move_item_report(0, 2).await;

    assert_eq!(report.outcome, MoveOutcome::Exhausted);
    // Every attempt completed but none verified.
    assert!(report.attempts.iter().all(|a| a.attempted));
    assert!(
        report
            .attempts
            .iter()
            .all(|a| !a.verification.expect("verification ran").changed)
    );
    assert_eq!(host.names(), ["A", "B", "C"]);
    assert_eq!(drain(&mut rx).len(), 1);
    assert_eq!(ctrl.counters().exhausted, 1);
}

#[tokio::test(start_paused = true)]
async fn escalates_to_mouse_when_pointer_is_ignored() {
    let host = SimHost::with_behavior(
        &["A", "B", "C", "D", "E"],
        SimBehavior::accepting(&[Technique::Mouse]),
    );
    let ctrl = controller(&host);

    let report = ctrl.move_item_report(0, 3).await;

    assert_eq!(report.outcome, MoveOutcome::Verified(StrategyId::MouseDrag));
    assert_eq!(host.names(), ["B", "C", "A", "D", "E"]);
    let pointer = report
        .attempts
        .iter()
        .find(|a| a.strategy == StrategyId::PointerDrag)
        .expect("pointer ran");
    assert!(pointer.attempted);
    assert!(!pointer.verification.expect("pointer verified").changed);
}

#[tokio::test(start_paused = true)]
async fn native_dnd_path_persists() {
    let host = SimHost::with_behavior(
        &["A", "B", "C", "D", "E"],
        SimBehavior::accepting(&[Technique::NativeDnd]),
    );
    let ctrl = controller(&host);

    let report = ctrl.move_item_report(0, 3).await;
    assert_eq!(report.outcome, MoveOutcome::Verified(StrategyId::NativeDnd));
    assert_eq!(host.names(), ["B", "C", "A", "D", "E"]);
}

#[tokio::test(start_paused = true)]
async fn keyboard_path_persists() {
    let host = SimHost::with_behavior(
        &["X", "Y", "Z"],
        SimBehavior::accepting(&[Technique::Keyboard]),
    );
    let ctrl = controller(&host);

    let report = ctrl.move_item_report(2, 0).await;
    assert_eq!(report.outcome, MoveOutcome::Verified(StrategyId::Keyboard));
    assert_eq!(host.names(), ["Z", "X", "Y"]);
}

#[tokio::test(start_paused = true)]
async fn splice_fallback_reports_visual_only() {
    let host = SimHost::with_behavior(&["A", "B", "C", "D", "E"], SimBehavior::deaf());
    let (tx, mut rx) = mpsc::channel(8);
    let ctrl = controller(&host).with_notifier(Notifier::new(tx));

    let report = ctrl.move_item_report(0, 3).await;

    assert_eq!(report.outcome, MoveOutcome::Verified(StrategyId::Splice));
    assert!(report.visual_only());
    assert_eq!(host.names(), ["B", "C", "A", "D", "E"]);
    let notices = drain(&mut rx);
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].severity, Severity::Warn);
    assert!(!host.announcements().is_empty());
}

#[tokio::test(start_paused = true)]
async fn bridge_replays_pointer_sequence_when_enabled() {
    let host = SimHost::with_behavior(
        &["A", "B", "C"],
        SimBehavior::accepting(&[Technique::Pointer]),
    );
    let bridge = Arc::new(RecordingBridge::default());
    let config = EngineConfig {
        bridge_enabled: true,
        ..EngineConfig::default()
    };
    let ctrl = ReorderController::new(host.clone(), config).with_bridge(bridge.clone());

    assert!(ctrl.move_item(0, 2).await);

    assert_eq!(bridge.attaches.load(Ordering::SeqCst), 1);
    assert_eq!(bridge.detaches.load(Ordering::SeqCst), 1);
    let sequences = bridge.sequences.lock().expect("bridge lock");
    assert_eq!(sequences.len(), 1);
    assert!(sequences[0] > 0);
}

#[tokio::test(start_paused = true)]
async fn bridge_is_left_alone_when_disabled() {
    let host = SimHost::with_behavior(
        &["A", "B", "C"],
        SimBehavior::accepting(&[Technique::Pointer]),
    );
    let bridge = Arc::new(RecordingBridge::default());
    let ctrl = controller(&host).with_bridge(bridge.clone());

    assert!(ctrl.move_item(0, 2).await);
    assert_eq!(bridge.attaches.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn drag_styles_are_cleared_even_on_fault() {
    let behavior = SimBehavior {
        fail_dispatch: vec![Technique::Pointer],
        ..SimBehavior::deaf()
    };
    let host = SimHost::with_behavior(&["A", "B", "C"], behavior);
    let ctrl = controller(&host);

    let report = ctrl.move_item_report(0, 2).await;
    assert_eq!(report.outcome, MoveOutcome::Verified(StrategyId::Splice));

    let row = host.handle_at(2).expect("moved row still mounted");
    let ops = host.take_ops();
    let set = ops
        .iter()
        .position(|op| matches!(op, SimOp::DragStyle(h, true) if *h == row));
    let cleared = ops
        .iter()
        .rposition(|op| matches!(op, SimOp::DragStyle(h, false) if *h == row));
    match (set, cleared) {
        (Some(on), Some(off)) => assert!(on < off, "style cleared after set"),
        other => panic!("missing drag style ops: {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn rename_payloads_travel_with_their_rows() {
    let host = SimHost::with_behavior(&["A", "B", "C", "D", "E"], SimBehavior::deaf());
    host.set_rename(0, "renamed_a");
    let ctrl = controller(&host);

    assert!(ctrl.move_item(0, 3).await);

    let renames = host.rename_values();
    assert_eq!(renames[2].as_deref(), Some("renamed_a"));
    assert!(renames[0].is_none());
}

#[tokio::test(start_paused = true)]
async fn move_selection_resolves_by_stable_tag() {
    let host = SimHost::new(&["A", "B", "C"]);
    let ctrl = controller(&host);

    let items = model::snapshot(host.as_ref()).await;
    let c = items[2].id;

    assert!(ctrl.move_selection(c, MoveSelection::Top).await);
    assert_eq!(host.names(), ["C", "A", "B"]);

    // Re-resolve after the move: "after A" from here is a real move.
    let items = model::snapshot(host.as_ref()).await;
    let a = items
        .iter()
        .find(|item| item.name == "A")
        .expect("A present")
        .id;
    assert!(ctrl.move_selection(c, MoveSelection::After(a)).await);
    assert_eq!(host.names(), ["A", "C", "B"]);

    // C now sits just before the last row, so End resolves to a no-op and
    // nothing runs.
    assert!(!ctrl.move_selection(c, MoveSelection::End).await);
    assert_eq!(host.names(), ["A", "C", "B"]);
}

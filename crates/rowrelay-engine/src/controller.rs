//! Escalation controller: single-flight orchestration of one logical move
//! request across the strategy set.

use std::sync::{Arc, atomic::AtomicBool};

use rowrelay_view::{ItemId, driver::ListDriver};
use tracing::{debug, info};

use crate::{
    bridge::InputBridge,
    config::EngineConfig,
    error::RejectReason,
    menu::{self, MoveSelection},
    metrics::{CountersSnapshot, EngineCounters},
    model,
    notify::{Notifier, Severity},
    session::MoveSession,
    strategy::{AttemptContext, Strategy, StrategyId, default_stack},
    watch::{OrderWatcher, VerificationOutcome},
};

/// Outcome of one strategy invocation within a run.
#[derive(Clone, Debug)]
pub struct AttemptOutcome {
    /// Which strategy ran.
    pub strategy: StrategyId,
    /// Whether the attempt executed to completion.
    pub attempted: bool,
    /// Fault message when the attempt threw.
    pub fault: Option<String>,
    /// Verification result, present only for completed attempts.
    pub verification: Option<VerificationOutcome>,
}

/// Terminal disposition of a move request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// A strategy's change was verified in the live view.
    Verified(StrategyId),
    /// Rejected before any strategy ran.
    Rejected(RejectReason),
    /// Every strategy ran without a verified change.
    Exhausted,
}

/// Full per-run report for diagnostics and the tester.
#[derive(Clone, Debug)]
pub struct MoveReport {
    /// Terminal disposition.
    pub outcome: MoveOutcome,
    /// Per-strategy outcomes, in the order they ran.
    pub attempts: Vec<AttemptOutcome>,
}

impl MoveReport {
    /// Whether the visible order now reflects the request.
    #[must_use]
    pub const fn moved(&self) -> bool {
        matches!(self.outcome, MoveOutcome::Verified(_))
    }

    /// Whether the change is visual-only rather than verified-persisted:
    /// the last-resort splice rewrites the view without any evidence the
    /// host's authoritative state followed.
    #[must_use]
    pub const fn visual_only(&self) -> bool {
        matches!(self.outcome, MoveOutcome::Verified(StrategyId::Splice))
    }

    const fn rejected(reason: RejectReason) -> Self {
        Self {
            outcome: MoveOutcome::Rejected(reason),
            attempts: Vec::new(),
        }
    }
}

/// Orchestrates one logical move request at a time over a live view.
pub struct ReorderController {
    driver: Arc<dyn ListDriver>,
    strategies: Vec<Box<dyn Strategy>>,
    config: EngineConfig,
    notifier: Notifier,
    bridge: Option<Arc<dyn InputBridge>>,
    in_flight: Arc<AtomicBool>,
    counters: EngineCounters,
}

impl ReorderController {
    /// Controller with the default strategy stack and no notification
    /// sink or bridge.
    #[must_use]
    pub fn new(driver: Arc<dyn ListDriver>, config: EngineConfig) -> Self {
        Self {
            driver,
            strategies: default_stack(),
            config,
            notifier: Notifier::disconnected(),
            bridge: None,
            in_flight: Arc::new(AtomicBool::new(false)),
            counters: EngineCounters::default(),
        }
    }

    /// Attach a notification sink.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = notifier;
        self
    }

    /// Attach a privileged input bridge. The bridge is used only when
    /// configuration enables it.
    #[must_use]
    pub fn with_bridge(mut self, bridge: Arc<dyn InputBridge>) -> Self {
        self.bridge = Some(bridge);
        self
    }

    /// Replace the strategy stack. Primarily a seam for tests
    /// substituting fakes per strategy.
    #[must_use]
    pub fn with_strategies(mut self, strategies: Vec<Box<dyn Strategy>>) -> Self {
        self.strategies = strategies;
        self
    }

    /// Snapshot the escalation counters.
    #[must_use]
    pub fn counters(&self) -> CountersSnapshot {
        self.counters.snapshot()
    }

    /// Zero the escalation counters.
    pub fn reset_counters(&self) {
        self.counters.reset();
    }

    /// Move the item at `from` so it lands immediately before the item
    /// currently at `to`. Resolves `true` only for a verified change;
    /// never rejects.
    pub async fn move_item(&self, from: usize, to: usize) -> bool {
        self.move_item_report(from, to).await.moved()
    }

    /// As [`move_item`](Self::move_item), returning the full report.
    pub async fn move_item_report(&self, from: usize, to: usize) -> MoveReport {
        // Single-flight: a concurrent request is rejected outright, never
        // queued. The session is released on every path below by Drop.
        let Some(_session) = MoveSession::try_begin(&self.in_flight) else {
            debug!(from, to, "move_rejected: busy");
            self.counters.record_rejected_busy();
            return MoveReport::rejected(RejectReason::Busy);
        };

        let items = model::snapshot(self.driver.as_ref()).await;
        let len = items.len();
        if from >= len || to >= len {
            debug!(from, to, len, "move_rejected: out_of_range");
            self.counters.record_rejected_invalid();
            return MoveReport::rejected(RejectReason::OutOfRange { from, to, len });
        }
        if model::is_noop(from, to) {
            debug!(from, to, "move_rejected: noop");
            self.counters.record_rejected_invalid();
            return MoveReport::rejected(RejectReason::Noop { from, to });
        }

        self.counters.record_run();
        let source_name = items[from].name.clone();
        debug!(from, to, source = %source_name, "move_start");

        let mut watcher = OrderWatcher::arm(self.driver.as_ref()).await;
        let mut attempts = Vec::with_capacity(self.strategies.len());
        for (idx, strategy) in self.strategies.iter().enumerate() {
            let id = strategy.id();
            let cx = AttemptContext {
                driver: self.driver.as_ref(),
                items: &items,
                from,
                to,
                config: &self.config,
                bridge: self.bridge.as_deref(),
            };
            match strategy.attempt(&cx).await {
                Ok(false) => {
                    debug!(strategy = id.as_str(), "attempt_skipped");
                    self.counters.record_skip(id);
                    attempts.push(AttemptOutcome {
                        strategy: id,
                        attempted: false,
                        fault: None,
                        verification: None,
                    });
                }
                Err(err) => {
                    debug!(strategy = id.as_str(), error = %err, "attempt_fault");
                    self.counters.record_fault(id);
                    attempts.push(AttemptOutcome {
                        strategy: id,
                        attempted: false,
                        fault: Some(err.to_string()),
                        verification: None,
                    });
                }
                Ok(true) => {
                    self.counters.record_attempted(id);
                    let timeout = if id.quick_verify() {
                        self.config.quick_verify()
                    } else {
                        self.config.verify()
                    };
                    let outcome = watcher.wait_for_change(timeout).await;
                    debug!(
                        strategy = id.as_str(),
                        attempt = idx + 1,
                        changed = outcome.changed,
                        elapsed_ms = outcome.elapsed.as_millis() as u64,
                        "attempt_verified"
                    );
                    let changed = outcome.changed;
                    attempts.push(AttemptOutcome {
                        strategy: id,
                        attempted: true,
                        fault: None,
                        verification: Some(outcome),
                    });
                    if changed {
                        self.counters.record_verified(id);
                        if id == StrategyId::Splice {
                            // Visually reordered, not verified-persisted:
                            // the user should not mistake one for the
                            // other.
                            self.notifier.notify(
                                Severity::Warn,
                                format!(
                                    "Reordered \"{source_name}\" on screen; the host may not have saved the change"
                                ),
                            );
                        }
                        info!(strategy = id.as_str(), from, to, "move_verified");
                        return MoveReport {
                            outcome: MoveOutcome::Verified(id),
                            attempts,
                        };
                    }
                }
            }
        }

        self.counters.record_exhausted();
        debug!(from, to, "move_exhausted");
        self.notifier
            .notify(Severity::Error, format!("Could not move \"{source_name}\""));
        MoveReport {
            outcome: MoveOutcome::Exhausted,
            attempts,
        }
    }

    /// Resolve a menu selection for `source` and run the move. Resolves
    /// `false` when the selection no longer maps to a valid request.
    pub async fn move_selection(&self, source: ItemId, selection: MoveSelection) -> bool {
        let items = model::snapshot(self.driver.as_ref()).await;
        let Some(request) = menu::resolve(&items, source, selection) else {
            debug!(source = %source, "selection_unresolved");
            return false;
        };
        self.move_item(request.from, request.to).await
    }
}

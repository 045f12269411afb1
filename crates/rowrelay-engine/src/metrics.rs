//! Escalation counters for diagnostics.
//!
//! Counters are owned per controller instance because controllers are
//! per-list; there is no process-global registry to pollute when several
//! lists live on one page.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::strategy::StrategyId;

#[derive(Default)]
struct StrategyCounters {
    attempts: AtomicU64,
    verified: AtomicU64,
    faults: AtomicU64,
    skipped: AtomicU64,
}

impl StrategyCounters {
    fn snapshot(&self) -> StrategySnapshot {
        StrategySnapshot {
            attempts: self.attempts.load(Ordering::Relaxed),
            verified: self.verified.load(Ordering::Relaxed),
            faults: self.faults.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
        }
    }

    fn reset(&self) {
        self.attempts.store(0, Ordering::Relaxed);
        self.verified.store(0, Ordering::Relaxed);
        self.faults.store(0, Ordering::Relaxed);
        self.skipped.store(0, Ordering::Relaxed);
    }
}

/// Aggregate counters for escalation runs.
#[derive(Default)]
pub(crate) struct EngineCounters {
    buckets: [StrategyCounters; StrategyId::ALL.len()],
    runs: AtomicU64,
    rejected_invalid: AtomicU64,
    rejected_busy: AtomicU64,
    exhausted: AtomicU64,
}

impl EngineCounters {
    fn bucket(&self, id: StrategyId) -> &StrategyCounters {
        &self.buckets[id.index()]
    }

    pub(crate) fn record_run(&self) {
        self.runs.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rejected_invalid(&self) {
        self.rejected_invalid.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rejected_busy(&self) {
        self.rejected_busy.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_exhausted(&self) {
        self.exhausted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_skip(&self, id: StrategyId) {
        self.bucket(id).skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_fault(&self, id: StrategyId) {
        self.bucket(id).faults.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_attempted(&self, id: StrategyId) {
        self.bucket(id).attempts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_verified(&self, id: StrategyId) {
        self.bucket(id).verified.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> CountersSnapshot {
        CountersSnapshot {
            runs: self.runs.load(Ordering::Relaxed),
            rejected_invalid: self.rejected_invalid.load(Ordering::Relaxed),
            rejected_busy: self.rejected_busy.load(Ordering::Relaxed),
            exhausted: self.exhausted.load(Ordering::Relaxed),
            strategies: StrategyId::ALL.map(|id| (id, self.bucket(id).snapshot())),
        }
    }

    pub(crate) fn reset(&self) {
        self.runs.store(0, Ordering::Relaxed);
        self.rejected_invalid.store(0, Ordering::Relaxed);
        self.rejected_busy.store(0, Ordering::Relaxed);
        self.exhausted.store(0, Ordering::Relaxed);
        for bucket in &self.buckets {
            bucket.reset();
        }
    }
}

/// Snapshot of one strategy's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StrategySnapshot {
    /// Attempts that executed to completion.
    pub attempts: u64,
    /// Attempts whose change was verified.
    pub verified: u64,
    /// Attempts that faulted.
    pub faults: u64,
    /// Attempts skipped for missing preconditions.
    pub skipped: u64,
}

/// Snapshot of all escalation counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountersSnapshot {
    /// Escalation runs that passed validation and walked the stack.
    pub runs: u64,
    /// Requests rejected for invalid or no-op indices.
    pub rejected_invalid: u64,
    /// Requests rejected because a run was in flight.
    pub rejected_busy: u64,
    /// Runs that exhausted every strategy.
    pub exhausted: u64,
    /// Per-strategy counters, in escalation priority order.
    pub strategies: [(StrategyId, StrategySnapshot); StrategyId::ALL.len()],
}

impl CountersSnapshot {
    /// Total attempts that executed, across strategies.
    #[must_use]
    pub fn total_attempts(&self) -> u64 {
        self.strategies.iter().map(|(_, s)| s.attempts).sum()
    }

    /// Counters for one strategy.
    #[must_use]
    pub fn strategy(&self, id: StrategyId) -> StrategySnapshot {
        self.strategies[id.index()].1
    }
}

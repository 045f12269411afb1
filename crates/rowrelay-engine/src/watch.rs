//! Verification watcher: observe the live view for a bounded interval and
//! report whether the visible order actually changed.
//!
//! One watcher is armed per escalation run, immediately before the first
//! strategy attempt; every attempt's wait compares against that baseline.
//! The subscription detaches when the watcher drops, so no observers leak
//! across requests.

use std::time::Duration;

use rowrelay_view::{driver::ListDriver, events::EventCursor};
use tokio::time::Instant;

use crate::model;

/// Result of one bounded verification wait.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VerificationOutcome {
    /// Whether the display-name order diverged from the baseline.
    pub changed: bool,
    /// Time spent waiting.
    pub elapsed: Duration,
}

/// Watches the container for a change in display-name order.
pub struct OrderWatcher<'d> {
    driver: &'d dyn ListDriver,
    cursor: EventCursor,
    baseline: String,
}

impl<'d> OrderWatcher<'d> {
    /// Subscribe to mutations, then capture the baseline order string.
    /// Subscribing first means a change racing the snapshot still wakes
    /// the first wait.
    pub async fn arm(driver: &'d dyn ListDriver) -> OrderWatcher<'d> {
        let cursor = driver.subscribe();
        let baseline = model::order_key(&model::snapshot(driver).await);
        Self {
            driver,
            cursor,
            baseline,
        }
    }

    /// Order string captured when the watcher was armed.
    #[must_use]
    pub fn baseline(&self) -> &str {
        &self.baseline
    }

    /// Resolve `true` as soon as the visible order differs from the
    /// baseline, `false` once `timeout` elapses without a difference.
    pub async fn wait_for_change(&mut self, timeout: Duration) -> VerificationOutcome {
        let start = Instant::now();
        let deadline = start + timeout;
        loop {
            // Re-snapshot up front: the change may have landed while the
            // strategy was still dispatching.
            let key = model::order_key(&model::snapshot(self.driver).await);
            if key != self.baseline {
                return VerificationOutcome {
                    changed: true,
                    elapsed: start.elapsed(),
                };
            }
            if self.cursor.next_until(deadline).await.is_none() {
                return VerificationOutcome {
                    changed: false,
                    elapsed: start.elapsed(),
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rowrelay_view::sim::SimHost;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn quiet_container_resolves_false_no_earlier_than_timeout() {
        let host = SimHost::new(&["A", "B", "C"]);
        let mut watcher = OrderWatcher::arm(host.as_ref()).await;
        let start = Instant::now();
        let outcome = watcher.wait_for_change(Duration::from_millis(1500)).await;
        assert!(!outcome.changed);
        assert!(start.elapsed() >= Duration::from_millis(1500));
        assert!(outcome.elapsed >= Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn unrelated_mutations_do_not_count_as_change() {
        let host = SimHost::new(&["A", "B", "C"]);
        let mut watcher = OrderWatcher::arm(host.as_ref()).await;
        host.touch();
        host.touch();
        let outcome = watcher.wait_for_change(Duration::from_millis(200)).await;
        assert!(!outcome.changed);
        assert!(outcome.elapsed >= Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn order_change_resolves_true() {
        let host = SimHost::new(&["A", "B", "C"]);
        let mut watcher = OrderWatcher::arm(host.as_ref()).await;
        assert_eq!(watcher.baseline(), "A|B|C");

        let reordered = vec![
            host.handle_at(1).unwrap(),
            host.handle_at(0).unwrap(),
            host.handle_at(2).unwrap(),
        ];
        host.apply_visual_order(&reordered).await.unwrap();

        let outcome = watcher.wait_for_change(Duration::from_millis(1500)).await;
        assert!(outcome.changed);
        assert!(outcome.elapsed < Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn change_before_wait_is_still_detected() {
        let host = SimHost::new(&["A", "B"]);
        let mut watcher = OrderWatcher::arm(host.as_ref()).await;
        // The "attempt" completes before wait_for_change is called.
        let reordered = vec![host.handle_at(1).unwrap(), host.handle_at(0).unwrap()];
        host.apply_visual_order(&reordered).await.unwrap();

        let outcome = watcher.wait_for_change(Duration::from_millis(100)).await;
        assert!(outcome.changed);
    }
}

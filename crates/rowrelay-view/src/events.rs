//! Mutation event stream for the live view.
//!
//! Drivers publish a coarse event whenever the observed container mutates;
//! the verification watcher re-snapshots on each event and compares order
//! strings. Subscribers each own a bounded ring so a slow consumer never
//! blocks the driver; overflow is counted, not fatal, because the watcher
//! re-reads current state rather than replaying history.

use std::{
    collections::VecDeque,
    sync::{
        Arc, Weak,
        atomic::{AtomicBool, Ordering},
    },
};

use parking_lot::Mutex;
use tokio::{
    sync::Notify,
    time::{Instant, timeout_at},
};
use tracing::trace;

/// Per-subscriber ring capacity.
const EVENT_CAPACITY: usize = 1024;

/// Kind of mutation observed on the list container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MutationKind {
    /// Children added, removed, or reordered.
    ChildList,
    /// An attribute (including inline style/position) changed.
    Attributes,
    /// Text content changed.
    CharacterData,
}

/// Events published by a live-view driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewEvent {
    /// The container subtree mutated.
    Mutated(MutationKind),
}

struct Ring {
    events: VecDeque<ViewEvent>,
    lost: u64,
}

struct StreamInner {
    ring: Mutex<Ring>,
    notify: Notify,
    closed: AtomicBool,
}

impl StreamInner {
    fn push(&self, event: ViewEvent) {
        if self.closed.load(Ordering::Acquire) {
            return;
        }
        let mut ring = self.ring.lock();
        if ring.events.len() == EVENT_CAPACITY {
            ring.events.pop_front();
            ring.lost = ring.lost.saturating_add(1);
            trace!(lost = ring.lost, "event_ring_overflow");
        }
        ring.events.push_back(event);
        drop(ring);
        self.notify.notify_waiters();
    }
}

/// Publisher half of the mutation stream, owned by the driver.
#[derive(Default)]
pub struct EventHub {
    subs: Mutex<Vec<Weak<StreamInner>>>,
}

impl EventHub {
    /// Create an empty hub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish an event to every live subscriber.
    pub fn publish(&self, event: ViewEvent) {
        let mut subs = self.subs.lock();
        subs.retain(|weak| match weak.upgrade() {
            Some(inner) => {
                inner.push(event);
                true
            }
            None => false,
        });
    }

    /// Create a new subscription cursor.
    #[must_use]
    pub fn subscribe(&self) -> EventCursor {
        let inner = Arc::new(StreamInner {
            ring: Mutex::new(Ring {
                events: VecDeque::new(),
                lost: 0,
            }),
            notify: Notify::new(),
            closed: AtomicBool::new(false),
        });
        self.subs.lock().push(Arc::downgrade(&inner));
        EventCursor { inner }
    }

    /// Close every subscription; pending cursors observe the close after
    /// draining buffered events.
    pub fn close(&self) {
        let subs = self.subs.lock();
        for weak in subs.iter() {
            if let Some(inner) = weak.upgrade() {
                inner.closed.store(true, Ordering::Release);
                inner.notify.notify_waiters();
            }
        }
    }
}

/// Subscriber cursor over the mutation stream.
///
/// Dropping the cursor detaches the observation.
pub struct EventCursor {
    inner: Arc<StreamInner>,
}

impl EventCursor {
    /// Pop the next buffered event, if any.
    pub fn try_next(&mut self) -> Option<ViewEvent> {
        self.inner.ring.lock().events.pop_front()
    }

    /// Wait for the next event until `deadline`.
    ///
    /// Returns `None` once the deadline passes or the stream closes with
    /// no buffered events remaining.
    pub async fn next_until(&mut self, deadline: Instant) -> Option<ViewEvent> {
        loop {
            let inner = &self.inner;
            let notified = inner.notify.notified();
            if let Some(event) = inner.ring.lock().events.pop_front() {
                return Some(event);
            }
            if inner.closed.load(Ordering::Acquire) {
                return None;
            }
            if timeout_at(deadline, notified).await.is_err() {
                return None;
            }
        }
    }

    /// Whether the publisher closed this stream.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    /// Events dropped from this subscriber's ring due to overflow.
    #[must_use]
    pub fn lost(&self) -> u64 {
        self.inner.ring.lock().lost
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn delivers_published_events_in_order() {
        let hub = EventHub::new();
        let mut cursor = hub.subscribe();
        hub.publish(ViewEvent::Mutated(MutationKind::ChildList));
        hub.publish(ViewEvent::Mutated(MutationKind::Attributes));

        let deadline = Instant::now() + Duration::from_millis(10);
        assert_eq!(
            cursor.next_until(deadline).await,
            Some(ViewEvent::Mutated(MutationKind::ChildList))
        );
        assert_eq!(
            cursor.next_until(deadline).await,
            Some(ViewEvent::Mutated(MutationKind::Attributes))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn next_until_times_out_without_events() {
        let hub = EventHub::new();
        let mut cursor = hub.subscribe();
        let start = Instant::now();
        let got = cursor
            .next_until(Instant::now() + Duration::from_millis(50))
            .await;
        assert!(got.is_none());
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test(start_paused = true)]
    async fn close_wakes_waiters() {
        let hub = EventHub::new();
        let mut cursor = hub.subscribe();
        hub.close();
        let got = cursor
            .next_until(Instant::now() + Duration::from_secs(60))
            .await;
        assert!(got.is_none());
        assert!(cursor.is_closed());
    }

    #[test]
    fn overflow_counts_lost_events() {
        let hub = EventHub::new();
        let mut cursor = hub.subscribe();
        for _ in 0..(EVENT_CAPACITY + 3) {
            hub.publish(ViewEvent::Mutated(MutationKind::ChildList));
        }
        assert_eq!(cursor.lost(), 3);
        let mut drained = 0usize;
        while cursor.try_next().is_some() {
            drained += 1;
        }
        assert_eq!(drained, EVENT_CAPACITY);
    }
}

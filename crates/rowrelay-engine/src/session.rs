//! Single-flight guard for escalation runs.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Exclusive token held for the duration of one escalation run, including
/// verification.
///
/// The flag is owned by the controller instance rather than module scope,
/// so independent controllers (one per list on a page) never share lock
/// state. Dropping the session releases the flag on every exit path.
#[derive(Debug)]
pub(crate) struct MoveSession {
    flag: Arc<AtomicBool>,
}

impl MoveSession {
    /// Claim the flag, or report that a run is already in flight.
    pub(crate) fn try_begin(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self {
                flag: Arc::clone(flag),
            })
    }
}

impl Drop for MoveSession {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_begin_fails_until_first_drops() {
        let flag = Arc::new(AtomicBool::new(false));
        let first = MoveSession::try_begin(&flag).expect("first claim");
        assert!(MoveSession::try_begin(&flag).is_none());
        drop(first);
        assert!(MoveSession::try_begin(&flag).is_some());
    }

    #[test]
    fn independent_flags_do_not_interfere() {
        let left = Arc::new(AtomicBool::new(false));
        let right = Arc::new(AtomicBool::new(false));
        let _held = MoveSession::try_begin(&left).expect("left claim");
        assert!(MoveSession::try_begin(&right).is_some());
    }
}

//! Strategy set: independent techniques for inducing the host to accept a
//! reorder, in escalation priority order.
//!
//! "Attempted" means the technique executed without faulting; only the
//! verification watcher establishes that a reorder persisted. Strategies
//! assume nothing about earlier strategies' side effects and clear any
//! transient styles they apply, so each is independently retryable.

mod common;
mod dragdrop;
mod hook;
mod keyboard;
mod mouse;
mod pointer;
mod splice;
mod store;

use std::fmt;

use async_trait::async_trait;
use rowrelay_view::driver::ListDriver;

use crate::{bridge::InputBridge, config::EngineConfig, error::StrategyError, model::Item};

/// Identity of a strategy variant, in escalation priority order: cheapest
/// and most likely to persist first, visually convincing fallbacks last.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StrategyId {
    /// Invoke the host's private drag-end callback directly.
    Hook,
    /// Dispatch the reorder action to the host's state store.
    Store,
    /// Simulated pointer-event drag, segmented per row.
    PointerDrag,
    /// Simulated legacy mouse-event drag.
    MouseDrag,
    /// Native drag-and-drop protocol sequence.
    NativeDnd,
    /// Accessible keyboard lift/move/drop sequence.
    Keyboard,
    /// Visual-only rewrite of rendered order; last resort.
    Splice,
}

impl StrategyId {
    /// All variants, in escalation priority order.
    pub const ALL: [Self; 7] = [
        Self::Hook,
        Self::Store,
        Self::PointerDrag,
        Self::MouseDrag,
        Self::NativeDnd,
        Self::Keyboard,
        Self::Splice,
    ];

    /// Short identifier used in logs and reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hook => "hook",
            Self::Store => "store",
            Self::PointerDrag => "pointer-drag",
            Self::MouseDrag => "mouse-drag",
            Self::NativeDnd => "dnd",
            Self::Keyboard => "keyboard",
            Self::Splice => "splice",
        }
    }

    /// Bucket index for counters.
    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Hook => 0,
            Self::Store => 1,
            Self::PointerDrag => 2,
            Self::MouseDrag => 3,
            Self::NativeDnd => 4,
            Self::Keyboard => 5,
            Self::Splice => 6,
        }
    }

    /// Whether verification uses the short bound. Store dispatch and the
    /// visual splice re-render synchronously when they work at all; the
    /// input-simulation paths need the host's sensor debounce to play out.
    pub(crate) const fn quick_verify(self) -> bool {
        matches!(self, Self::Store | Self::Splice)
    }
}

impl fmt::Display for StrategyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a strategy may consult during one attempt.
///
/// `from` and `to` are validated by the controller before the context is
/// built: both index into `items`, and the request is not a no-op.
pub struct AttemptContext<'a> {
    /// Live-view driver.
    pub driver: &'a dyn ListDriver,
    /// Snapshot the indices were issued against, in visual order.
    pub items: &'a [Item],
    /// Source index in `items`.
    pub from: usize,
    /// Destination index in `items`; the source lands immediately before
    /// the item currently at this position.
    pub to: usize,
    /// Engine tunables.
    pub config: &'a EngineConfig,
    /// Privileged input bridge, when the embedding provides one.
    pub bridge: Option<&'a dyn InputBridge>,
}

impl AttemptContext<'_> {
    /// The item being moved.
    #[must_use]
    pub fn source(&self) -> &Item {
        &self.items[self.from]
    }

    /// The item the source is inserted before.
    #[must_use]
    pub fn target(&self) -> &Item {
        &self.items[self.to]
    }
}

/// One reorder technique.
#[async_trait]
pub trait Strategy: Send + Sync {
    /// Stable identity for logs, counters, and reports.
    fn id(&self) -> StrategyId;

    /// Execute the technique. `Ok(true)` when the sequence ran to
    /// completion, `Ok(false)` when a precondition is absent (no hook, no
    /// store) and verification should be skipped. Persistence is judged
    /// by the watcher, never here.
    async fn attempt(&self, cx: &AttemptContext<'_>) -> Result<bool, StrategyError>;
}

/// Build the default escalation stack.
#[must_use]
pub fn default_stack() -> Vec<Box<dyn Strategy>> {
    vec![
        Box::new(hook::HookInvoke),
        Box::new(store::StoreDispatch),
        Box::new(pointer::PointerDrag),
        Box::new(mouse::MouseDrag),
        Box::new(dragdrop::NativeDnd),
        Box::new(keyboard::KeyboardLift),
        Box::new(splice::VisualSplice),
    ]
}

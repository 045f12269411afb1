//! Adaptive reorder engine for virtualized third-party lists.
//!
//! The host application renders an ordered list whose internal state is
//! not reachable; the only dependable way to change the order is to make
//! the host believe its own interaction layer did it. Given a move
//! request, the [`ReorderController`] walks a fixed, ordered
//! [strategy set](strategy) — private hook invocation, store dispatch,
//! pointer/mouse/native-dnd/keyboard input simulation, and a visual-only
//! splice as last resort — verifying after each attempt whether the live
//! view actually changed, and stops at the first strategy that did.
//!
//! Design invariants:
//! - at most one move in flight per controller; concurrent requests are
//!   rejected, not queued;
//! - per-strategy faults are swallowed and escalate to the next strategy;
//!   `move_item` always resolves to a boolean;
//! - the visible order is the source of truth — nothing is persisted or
//!   cached across requests.

mod config;
mod controller;
mod error;
mod metrics;
mod notify;
mod session;
mod watch;

pub mod bridge;
pub mod menu;
pub mod model;
pub mod strategy;

pub use config::{EngineConfig, KeyboardTuning, PointerTuning};
pub use controller::{AttemptOutcome, MoveOutcome, MoveReport, ReorderController};
pub use error::{RejectReason, StrategyError};
pub use metrics::{CountersSnapshot, StrategySnapshot};
pub use notify::{Notice, Notifier, Severity};
pub use watch::{OrderWatcher, VerificationOutcome};

#[cfg(test)]
mod deterministic_tests;
#[cfg(test)]
mod property_tests;

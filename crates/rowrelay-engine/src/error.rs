//! Error taxonomy for escalation runs.
//!
//! `move_item` itself never fails: per-strategy faults are swallowed and
//! converted into "try next strategy", and everything terminal is encoded
//! in the returned report. These types classify what happened for logs,
//! counters, and diagnostics.

use std::fmt;

use thiserror::Error;

use crate::bridge::BridgeError;

/// Why a move request was rejected before any strategy ran.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    /// An index falls outside the current item count.
    OutOfRange {
        /// Requested source index.
        from: usize,
        /// Requested destination index.
        to: usize,
        /// Item count at the time of the request.
        len: usize,
    },
    /// The request changes nothing under the insert-before contract.
    Noop {
        /// Requested source index.
        from: usize,
        /// Requested destination index.
        to: usize,
    },
    /// Another move is already in flight on this controller.
    Busy,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { from, to, len } => {
                write!(f, "indices out of range: from={from} to={to} len={len}")
            }
            Self::Noop { from, to } => write!(f, "no-op move: from={from} to={to}"),
            Self::Busy => write!(f, "a move is already in flight"),
        }
    }
}

/// Faults a strategy can raise during an attempt. Recovered locally by the
/// controller; escalation continues with the next strategy.
#[derive(Debug, Error)]
pub enum StrategyError {
    /// The live-view driver refused an operation.
    #[error(transparent)]
    View(#[from] rowrelay_view::Error),
    /// The privileged input bridge failed.
    #[error("input bridge: {0}")]
    Bridge(#[from] BridgeError),
    /// A synthesized payload could not be encoded.
    #[error("payload encode: {0}")]
    Encode(#[from] serde_json::Error),
}

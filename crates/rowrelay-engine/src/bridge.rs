//! Optional privileged input bridge.
//!
//! Some hosts distinguish trusted device input from script-synthesized
//! events. When the embedding can attach a debugging/inspection session to
//! the page, it exposes that capability here and the pointer strategy
//! replays its segment plan through it. The bridge is out of process and
//! best-effort: every operation is idempotent and safe to call
//! redundantly.

use async_trait::async_trait;
use rowrelay_view::input::{InputTarget, SyntheticInput};
use thiserror::Error;

/// Errors raised by a privileged input bridge.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// The debugging session could not attach.
    #[error("bridge attach failed: {0}")]
    Attach(String),
    /// The bridge rejected part of an input sequence.
    #[error("bridge rejected input: {0}")]
    Input(String),
}

/// One step of a bridge-relayed input sequence.
pub type BridgeStep = (InputTarget, SyntheticInput);

/// Out-of-process channel dispatching low-level input with real
/// input-device semantics.
#[async_trait]
pub trait InputBridge: Send + Sync {
    /// Attach a debugging session to the current page. Attaching twice is
    /// a no-op.
    async fn attach(&self) -> Result<(), BridgeError>;

    /// Replay an input sequence with trusted-device semantics.
    async fn send_input(&self, sequence: &[BridgeStep]) -> Result<(), BridgeError>;

    /// Detach the session. Detaching when unattached is a no-op.
    async fn detach(&self) -> Result<(), BridgeError>;
}

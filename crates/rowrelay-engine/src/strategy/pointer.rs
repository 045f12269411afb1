//! Strategy 3: realistic pointer-sequence simulation.
//!
//! The sequence a pointer sensor expects: pointer-down on the row, a move
//! crossing the activation threshold, incremental moves one row-height per
//! segment with sub-step interpolation, pointer-up. Capture semantics are
//! the driver's side of the contract. When the embedding provides a
//! privileged input bridge and configuration enables it, the same segment
//! plan is replayed through the bridge, which carries real input-device
//! semantics that software dispatch cannot.

use async_trait::async_trait;
use tracing::debug;

use crate::{
    error::StrategyError,
    strategy::{
        AttemptContext, Strategy, StrategyId,
        common::{DragKind, run_segmented_drag},
    },
};

/// Pointer-sequence simulation.
pub(super) struct PointerDrag;

#[async_trait]
impl Strategy for PointerDrag {
    fn id(&self) -> StrategyId {
        StrategyId::PointerDrag
    }

    async fn attempt(&self, cx: &AttemptContext<'_>) -> Result<bool, StrategyError> {
        let row = cx.source().row;
        if let Err(err) = cx.driver.set_drag_style(row, true).await {
            debug!("drag_style_failed: {err}");
        }
        let run = run_segmented_drag(cx, DragKind::Pointer).await;
        // The affordance is transient; clear it on every path.
        if let Err(err) = cx.driver.set_drag_style(row, false).await {
            debug!("drag_style_reset_failed: {err}");
        }
        let steps = run?;

        if cx.config.bridge_enabled
            && let Some(bridge) = cx.bridge
        {
            debug!(steps = steps.len(), "bridge_replay");
            bridge.attach().await?;
            let sent = bridge.send_input(&steps).await;
            if let Err(err) = bridge.detach().await {
                debug!("bridge_detach_failed: {err}");
            }
            sent?;
        }
        Ok(true)
    }
}

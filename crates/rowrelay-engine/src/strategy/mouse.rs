//! Strategy 4: legacy mouse-event sequence simulation, for hosts whose
//! sensor never adopted pointer events.

use async_trait::async_trait;
use tracing::debug;

use crate::{
    error::StrategyError,
    strategy::{
        AttemptContext, Strategy, StrategyId,
        common::{DragKind, run_segmented_drag},
    },
};

/// Mouse-event sequence simulation.
pub(super) struct MouseDrag;

#[async_trait]
impl Strategy for MouseDrag {
    fn id(&self) -> StrategyId {
        StrategyId::MouseDrag
    }

    async fn attempt(&self, cx: &AttemptContext<'_>) -> Result<bool, StrategyError> {
        let row = cx.source().row;
        if let Err(err) = cx.driver.set_drag_style(row, true).await {
            debug!("drag_style_failed: {err}");
        }
        let run = run_segmented_drag(cx, DragKind::Mouse).await;
        if let Err(err) = cx.driver.set_drag_style(row, false).await {
            debug!("drag_style_reset_failed: {err}");
        }
        run.map(|_| true)
    }
}

//! Strategy 5: native drag-and-drop protocol simulation.
//!
//! Full dragstart → dragenter → dragover → drop → dragend exchange with a
//! synthesized transfer payload, for hosts wired to the native protocol
//! rather than a pointer sensor.

use async_trait::async_trait;
use rowrelay_view::{
    driver::ReorderAction,
    geom::Point,
    input::{DragInput, DragPhase, InputTarget, SyntheticInput},
};
use tokio::time::sleep;
use tracing::debug;

use crate::{
    error::StrategyError,
    model,
    strategy::{AttemptContext, Strategy, StrategyId},
};

/// Native drag-and-drop protocol simulation.
pub(super) struct NativeDnd;

#[async_trait]
impl Strategy for NativeDnd {
    fn id(&self) -> StrategyId {
        StrategyId::NativeDnd
    }

    async fn attempt(&self, cx: &AttemptContext<'_>) -> Result<bool, StrategyError> {
        let source = cx.source();
        let target = cx.target();
        cx.driver.scroll_into_view(source.row).await?;
        cx.driver.scroll_into_view(target.row).await?;

        let source_rect = cx.driver.row_rect(source.row).await?;
        let grab = source_rect.center();
        // Drop in the middle of the destination slot.
        let insert = model::splice_index(cx.from, cx.to);
        let drop_at = Point::new(
            grab.x,
            (insert as f64 + 0.5) * cx.config.row_height_px,
        );
        let payload = serde_json::to_string(&ReorderAction {
            from: cx.from,
            to: insert,
        })?;
        debug!(drop_y = drop_at.y, "dnd_sequence");

        let over = InputTarget::Row(target.row);
        let origin = InputTarget::Row(source.row);
        cx.driver
            .dispatch(
                origin,
                SyntheticInput::Drag(
                    DragInput::at(DragPhase::Start, grab).with_payload(payload.clone()),
                ),
            )
            .await?;
        cx.driver
            .dispatch(over, SyntheticInput::Drag(DragInput::at(DragPhase::Enter, drop_at)))
            .await?;
        cx.driver
            .dispatch(over, SyntheticInput::Drag(DragInput::at(DragPhase::Over, drop_at)))
            .await?;
        sleep(cx.config.pointer.dwell()).await;
        cx.driver
            .dispatch(
                over,
                SyntheticInput::Drag(DragInput::at(DragPhase::Drop, drop_at).with_payload(payload)),
            )
            .await?;
        cx.driver
            .dispatch(origin, SyntheticInput::Drag(DragInput::at(DragPhase::End, drop_at)))
            .await?;
        Ok(true)
    }
}

//! Strategy 7, last resort: visual-only DOM splice.
//!
//! Rewrites rendered positions and index labels so the user sees the
//! requested order even when no technique reached the host's state. This
//! always changes the visible order, so verification reports success; the
//! controller is responsible for reporting it as visual-only rather than
//! verified-persisted. Rename payloads travel with their rows.

use async_trait::async_trait;
use rowrelay_view::RowHandle;
use tracing::debug;

use crate::{
    error::StrategyError,
    model,
    strategy::{AttemptContext, Strategy, StrategyId},
};

/// Visual-only splice.
pub(super) struct VisualSplice;

#[async_trait]
impl Strategy for VisualSplice {
    fn id(&self) -> StrategyId {
        StrategyId::Splice
    }

    async fn attempt(&self, cx: &AttemptContext<'_>) -> Result<bool, StrategyError> {
        let order: Vec<RowHandle> = model::apply_move(cx.items, cx.from, cx.to)
            .iter()
            .map(|item| item.row)
            .collect();
        cx.driver.apply_visual_order(&order).await?;

        // Mirror the announcement the host's own drop path would emit, so
        // assistive tech hears about the change too.
        let text = format!(
            "Draggable item {} was dropped over droppable area {}",
            cx.source().name,
            cx.target().name
        );
        if let Err(err) = cx.driver.announce(&text).await {
            debug!("announce_failed: {err}");
        }
        Ok(true)
    }
}

//! Strategy 1: invoke the host's private drag-end callback directly.
//!
//! When the rendered node gives us a path to the callback the host's own
//! sensor would fire, calling it with a synthesized end-of-drag record is
//! the cheapest technique and the most likely to reach authoritative
//! state.

use async_trait::async_trait;
use rowrelay_view::driver::DragEndRecord;
use tracing::debug;

use crate::{
    error::StrategyError,
    model,
    strategy::{AttemptContext, Strategy, StrategyId},
};

/// Internal-handle invocation.
pub(super) struct HookInvoke;

#[async_trait]
impl Strategy for HookInvoke {
    fn id(&self) -> StrategyId {
        StrategyId::Hook
    }

    async fn attempt(&self, cx: &AttemptContext<'_>) -> Result<bool, StrategyError> {
        let Some(hook) = cx.driver.reorder_hook().await? else {
            debug!("hook_absent");
            return Ok(false);
        };
        let record = DragEndRecord {
            item: cx.source().row,
            over: Some(cx.target().row),
            old_index: cx.from,
            new_index: model::splice_index(cx.from, cx.to),
        };
        debug!(
            old_index = record.old_index,
            new_index = record.new_index,
            "hook_invoke"
        );
        cx.driver.invoke_reorder_hook(hook, record).await?;
        Ok(true)
    }
}

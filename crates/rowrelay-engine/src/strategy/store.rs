//! Strategy 2: dispatch the reorder action to the host's state store.

use async_trait::async_trait;
use rowrelay_view::driver::ReorderAction;
use tracing::debug;

use crate::{
    error::StrategyError,
    model,
    strategy::{AttemptContext, Strategy, StrategyId},
};

/// State-layer action dispatch.
pub(super) struct StoreDispatch;

#[async_trait]
impl Strategy for StoreDispatch {
    fn id(&self) -> StrategyId {
        StrategyId::Store
    }

    async fn attempt(&self, cx: &AttemptContext<'_>) -> Result<bool, StrategyError> {
        let Some(store) = cx.driver.store().await? else {
            debug!("store_absent");
            return Ok(false);
        };
        let action = ReorderAction {
            from: cx.from,
            to: model::splice_index(cx.from, cx.to),
        };
        debug!(from = action.from, to = action.to, "store_dispatch");
        cx.driver.dispatch_store(store, action).await?;
        Ok(true)
    }
}

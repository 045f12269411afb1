//! Strategy 6: accessible keyboard sequence.
//!
//! Mirrors the host's keyboard-accessible reorder path: focus the drag
//! handle, Space to lift, one arrow press per row of travel, Space to
//! drop. Key-up events follow each key-down because real sensors track
//! both.

use async_trait::async_trait;
use rowrelay_view::input::{InputTarget, Key, KeyInput, SyntheticInput};
use tokio::time::sleep;
use tracing::debug;

use crate::{
    error::StrategyError,
    model,
    strategy::{AttemptContext, Strategy, StrategyId},
};

/// Accessible keyboard lift/move/drop.
pub(super) struct KeyboardLift;

impl KeyboardLift {
    async fn press(
        cx: &AttemptContext<'_>,
        target: InputTarget,
        key: Key,
    ) -> Result<(), StrategyError> {
        cx.driver
            .dispatch(target, SyntheticInput::Key(KeyInput::down(key)))
            .await?;
        sleep(cx.config.keyboard.press()).await;
        cx.driver
            .dispatch(target, SyntheticInput::Key(KeyInput::up(key)))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl Strategy for KeyboardLift {
    fn id(&self) -> StrategyId {
        StrategyId::Keyboard
    }

    async fn attempt(&self, cx: &AttemptContext<'_>) -> Result<bool, StrategyError> {
        let row = cx.source().row;
        let handle = InputTarget::Handle(row);
        let tuning = &cx.config.keyboard;

        cx.driver.scroll_into_view(row).await?;
        cx.driver.focus(handle).await?;

        // Lift.
        cx.driver
            .dispatch(handle, SyntheticInput::Key(KeyInput::down(Key::Space)))
            .await?;
        sleep(tuning.lift_hold()).await;
        cx.driver
            .dispatch(handle, SyntheticInput::Key(KeyInput::up(Key::Space)))
            .await?;
        sleep(tuning.lift_settle()).await;

        // One step per row of travel.
        let travel = model::row_travel(cx.from, cx.to);
        let key = if travel > 0 { Key::ArrowDown } else { Key::ArrowUp };
        debug!(steps = travel.unsigned_abs(), key = ?key, "keyboard_steps");
        for _ in 0..travel.unsigned_abs() {
            Self::press(cx, handle, key).await?;
            sleep(tuning.step_pause()).await;
        }

        // Drop.
        sleep(tuning.drop_settle()).await;
        Self::press(cx, handle, Key::Space).await?;
        Ok(true)
    }
}

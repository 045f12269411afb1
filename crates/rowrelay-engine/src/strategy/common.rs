//! Shared drag planning for the pointer and mouse strategies.

use rowrelay_view::{
    geom::Point,
    input::{InputTarget, MouseInput, PointerInput, SyntheticInput},
};
use tokio::time::sleep;

use crate::{bridge::BridgeStep, error::StrategyError, model, strategy::AttemptContext};

/// Pointer id used by synthesized drags; sensors track capture per id.
const POINTER_ID: u32 = 1;

/// Which event family a segmented drag emits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum DragKind {
    /// Pointer events.
    Pointer,
    /// Legacy mouse events.
    Mouse,
}

/// Plan for a segmented software drag: one row of travel per segment so a
/// virtualized host has time to re-mount rows in between.
struct DragPlan {
    /// Grab point at the source row's center.
    start: Point,
    /// Number of one-row segments.
    segments: u64,
    /// -1.0 upward, 1.0 downward.
    direction: f64,
}

async fn plan_drag(cx: &AttemptContext<'_>) -> Result<DragPlan, StrategyError> {
    let source = cx.source();
    let target = cx.target();
    // Virtualized list safety: both ends must be mounted before we read
    // geometry.
    cx.driver.scroll_into_view(source.row).await?;
    cx.driver.scroll_into_view(target.row).await?;
    let rect = cx.driver.row_rect(source.row).await?;
    let travel = model::row_travel(cx.from, cx.to);
    Ok(DragPlan {
        start: rect.center(),
        segments: travel.unsigned_abs(),
        direction: if travel < 0 { -1.0 } else { 1.0 },
    })
}

fn press(kind: DragKind, at: Point) -> SyntheticInput {
    match kind {
        DragKind::Pointer => SyntheticInput::Pointer(PointerInput::down(at, POINTER_ID)),
        DragKind::Mouse => SyntheticInput::Mouse(MouseInput::down(at)),
    }
}

fn glide(kind: DragKind, at: Point) -> SyntheticInput {
    match kind {
        DragKind::Pointer => SyntheticInput::Pointer(PointerInput::moved(at, POINTER_ID)),
        DragKind::Mouse => SyntheticInput::Mouse(MouseInput::moved(at)),
    }
}

fn release(kind: DragKind, at: Point) -> SyntheticInput {
    match kind {
        DragKind::Pointer => SyntheticInput::Pointer(PointerInput::up(at, POINTER_ID)),
        DragKind::Mouse => SyntheticInput::Mouse(MouseInput::up(at)),
    }
}

async fn send(
    cx: &AttemptContext<'_>,
    steps: &mut Vec<BridgeStep>,
    target: InputTarget,
    input: SyntheticInput,
) -> Result<(), StrategyError> {
    steps.push((target, input.clone()));
    cx.driver.dispatch(target, input).await?;
    Ok(())
}

/// Run a segmented drag: press on the source row, cross the sensor
/// threshold, interpolate one row of travel, release, pause, repeat.
///
/// Returns the dispatched sequence so the pointer strategy can replay it
/// through a privileged bridge.
pub(super) async fn run_segmented_drag(
    cx: &AttemptContext<'_>,
    kind: DragKind,
) -> Result<Vec<BridgeStep>, StrategyError> {
    let plan = plan_drag(cx).await?;
    let tuning = &cx.config.pointer;
    let row_height = cx.config.row_height_px;
    let grab = InputTarget::Row(cx.source().row);
    let mut steps = Vec::new();

    let x = plan.start.x;
    let mut y = plan.start.y;
    for _ in 0..plan.segments {
        send(cx, &mut steps, grab, press(kind, Point::new(x, y))).await?;

        // Cross the activation threshold, then let the sensor arm.
        let threshold_y = y + plan.direction * tuning.threshold_px;
        send(
            cx,
            &mut steps,
            InputTarget::Document,
            glide(kind, Point::new(x, threshold_y)),
        )
        .await?;
        sleep(tuning.dwell()).await;

        let end_y = y + plan.direction * row_height;
        for step in 1..=tuning.steps_per_row {
            let t = f64::from(step) / f64::from(tuning.steps_per_row);
            let step_y = y + plan.direction * row_height * t;
            send(
                cx,
                &mut steps,
                InputTarget::Document,
                glide(kind, Point::new(x, step_y)),
            )
            .await?;
            sleep(tuning.step_delay()).await;
        }

        send(
            cx,
            &mut steps,
            InputTarget::Document,
            release(kind, Point::new(x, end_y)),
        )
        .await?;
        sleep(tuning.segment_pause()).await;
        y = end_y;
    }

    Ok(steps)
}

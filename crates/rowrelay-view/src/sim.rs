//! Simulated host list for deterministic tests and the tester binary.
//!
//! `SimHost` behaves like the interesting parts of the real host: rows are
//! absolutely positioned inside a virtualized container, a drag sensor
//! activates after a small movement threshold, an accessible keyboard path
//! lifts and drops rows, and an optional private hook / state store accept
//! synthesized reorders. Which techniques actually persist an order change
//! is scripted per instance, so tests can force any escalation path.

use std::{collections::VecDeque, sync::Arc};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::{
    Error, ItemId, Result, RowHandle,
    driver::{DragEndRecord, HookHandle, ListDriver, ReorderAction, RowProbe, StoreHandle},
    events::{EventCursor, EventHub, MutationKind, ViewEvent},
    geom::Rect,
    input::{DragPhase, InputTarget, Key, KeyPhase, PointerPhase, SyntheticInput},
};

/// Interaction techniques the simulated host can accept as a persisted
/// reorder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Technique {
    /// Direct invocation of the private drag-end hook.
    Hook,
    /// Synthesized action dispatched to the state store.
    Store,
    /// Pointer-event drag sensor.
    Pointer,
    /// Legacy mouse-event drag sensor.
    Mouse,
    /// Native drag-and-drop protocol.
    NativeDnd,
    /// Accessible keyboard lift/move/drop.
    Keyboard,
}

/// Behavior knobs for a [`SimHost`] instance.
#[derive(Clone, Debug)]
pub struct SimBehavior {
    /// Techniques that persist an order change.
    pub accept: Vec<Technique>,
    /// Whether the private drag-end hook is reachable.
    pub hook_present: bool,
    /// Whether the state store is exposed.
    pub store_present: bool,
    /// Rendered row height in pixels.
    pub row_height: f64,
    /// Sensor activation distance in pixels.
    pub drag_threshold: f64,
    /// Techniques whose input dispatch errors outright.
    pub fail_dispatch: Vec<Technique>,
    /// Virtualization window over visual indices, `[start, end)`. `None`
    /// mounts everything.
    pub mounted: Option<(usize, usize)>,
}

impl Default for SimBehavior {
    fn default() -> Self {
        Self {
            accept: vec![
                Technique::Hook,
                Technique::Store,
                Technique::Pointer,
                Technique::Mouse,
                Technique::NativeDnd,
                Technique::Keyboard,
            ],
            hook_present: true,
            store_present: true,
            row_height: 56.0,
            drag_threshold: 8.0,
            fail_dispatch: Vec::new(),
            mounted: None,
        }
    }
}

impl SimBehavior {
    /// Accept only the given techniques; hook and store are reachable only
    /// when their technique is listed.
    #[must_use]
    pub fn accepting(techniques: &[Technique]) -> Self {
        Self {
            accept: techniques.to_vec(),
            hook_present: techniques.contains(&Technique::Hook),
            store_present: techniques.contains(&Technique::Store),
            ..Self::default()
        }
    }

    /// A host that ignores every technique and exposes neither hook nor
    /// store.
    #[must_use]
    pub fn deaf() -> Self {
        Self::accepting(&[])
    }

    fn accepts(&self, technique: Technique) -> bool {
        self.accept.contains(&technique)
    }

    fn fails(&self, technique: Technique) -> bool {
        self.fail_dispatch.contains(&technique)
    }
}

/// Coarse input classification recorded in the operation log.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputKind {
    /// Pointer event with its phase.
    Pointer(PointerPhase),
    /// Mouse event with its phase.
    Mouse(PointerPhase),
    /// Drag protocol event with its phase.
    Drag(DragPhase),
    /// Keyboard event with its phase.
    Key(KeyPhase),
}

/// Operations recorded by the simulated host, for assertions.
#[derive(Clone, Debug, PartialEq)]
pub enum SimOp {
    /// A synthetic input arrived.
    Input(InputTarget, InputKind),
    /// Focus moved.
    Focus(InputTarget),
    /// A row was scrolled into view.
    ScrollIntoView(RowHandle),
    /// The drag affordance style changed.
    DragStyle(RowHandle, bool),
    /// The private hook was invoked.
    HookCall {
        /// Visual index the drag started from.
        old_index: usize,
        /// Insert index handed to the host splice.
        new_index: usize,
    },
    /// A store action was dispatched.
    StoreDispatch(ReorderAction),
    /// The visual order was rewritten directly.
    VisualSplice,
    /// Live-region text was written.
    Announce(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GrabKind {
    Pointer,
    Mouse,
}

struct DragGrab {
    kind: GrabKind,
    row: RowHandle,
    start_y: f64,
    active: bool,
}

struct SimRow {
    handle: RowHandle,
    name: String,
    rename: Option<String>,
    tag: Option<ItemId>,
}

struct SimState {
    /// Rows in DOM order; stable across reorders.
    rows: Vec<SimRow>,
    /// Current visual order.
    visual: Vec<RowHandle>,
    behavior: SimBehavior,
    grab: Option<DragGrab>,
    drag_source: Option<RowHandle>,
    focused: Option<RowHandle>,
    lifted: Option<RowHandle>,
    next_tag: u64,
    ops: VecDeque<SimOp>,
    announcements: Vec<String>,
}

impl SimState {
    fn visual_index(&self, row: RowHandle) -> Option<usize> {
        self.visual.iter().position(|&h| h == row)
    }

    fn row(&self, handle: RowHandle) -> Option<&SimRow> {
        self.rows.iter().find(|r| r.handle == handle)
    }

    /// Remove the row at `from` and re-insert it at `insert` within the
    /// reduced list. Returns whether the order actually changed.
    fn splice(&mut self, from: usize, insert: usize) -> bool {
        if from >= self.visual.len() {
            return false;
        }
        let handle = self.visual.remove(from);
        let at = insert.min(self.visual.len());
        self.visual.insert(at, handle);
        from != at
    }

    /// Shift `row` by `delta` visual positions, clamped to the list.
    fn shift(&mut self, row: RowHandle, delta: i64) -> bool {
        let Some(from) = self.visual_index(row) else {
            return false;
        };
        let len = self.visual.len() as i64;
        let to = (from as i64 + delta).clamp(0, len - 1) as usize;
        self.splice(from, to)
    }
}

/// In-process host implementation of [`ListDriver`].
pub struct SimHost {
    state: Mutex<SimState>,
    hub: EventHub,
}

impl SimHost {
    /// Build a host with the given display names and default behavior.
    #[must_use]
    pub fn new(names: &[&str]) -> Arc<Self> {
        Self::with_behavior(names, SimBehavior::default())
    }

    /// Build a host with explicit behavior.
    #[must_use]
    pub fn with_behavior(names: &[&str], behavior: SimBehavior) -> Arc<Self> {
        let rows: Vec<SimRow> = names
            .iter()
            .enumerate()
            .map(|(i, name)| SimRow {
                handle: RowHandle::new(i as u64 + 1),
                name: (*name).to_string(),
                rename: None,
                tag: None,
            })
            .collect();
        let visual = rows.iter().map(|r| r.handle).collect();
        Arc::new(Self {
            state: Mutex::new(SimState {
                rows,
                visual,
                behavior,
                grab: None,
                drag_source: None,
                focused: None,
                lifted: None,
                next_tag: 1,
                ops: VecDeque::new(),
                announcements: Vec::new(),
            }),
            hub: EventHub::new(),
        })
    }

    /// Display names in current visual order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let state = self.state.lock();
        state
            .visual
            .iter()
            .filter_map(|&h| state.row(h).map(|r| r.name.clone()))
            .collect()
    }

    /// Visual order as a single comparable string.
    #[must_use]
    pub fn order_key(&self) -> String {
        self.names().join("|")
    }

    /// Rename payloads in current visual order.
    #[must_use]
    pub fn rename_values(&self) -> Vec<Option<String>> {
        let state = self.state.lock();
        state
            .visual
            .iter()
            .filter_map(|&h| state.row(h).map(|r| r.rename.clone()))
            .collect()
    }

    /// Set the rename payload of the row at a visual index.
    pub fn set_rename(&self, visual_index: usize, value: &str) {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        if let Some(&handle) = state.visual.get(visual_index)
            && let Some(row) = state.rows.iter_mut().find(|r| r.handle == handle)
        {
            row.rename = Some(value.to_string());
        }
    }

    /// Replace the behavior knobs.
    pub fn set_behavior(&self, behavior: SimBehavior) {
        self.state.lock().behavior = behavior;
    }

    /// Drain the recorded operation log.
    #[must_use]
    pub fn take_ops(&self) -> Vec<SimOp> {
        self.state.lock().ops.drain(..).collect()
    }

    /// Live-region announcements written so far.
    #[must_use]
    pub fn announcements(&self) -> Vec<String> {
        self.state.lock().announcements.clone()
    }

    /// Handle of the row at a visual index, for scripting scenarios.
    #[must_use]
    pub fn handle_at(&self, visual_index: usize) -> Option<RowHandle> {
        self.state.lock().visual.get(visual_index).copied()
    }

    /// Publish a mutation that does not change the order, as a busy host
    /// re-rendering unrelated chrome would.
    pub fn touch(&self) {
        self.hub.publish(ViewEvent::Mutated(MutationKind::Attributes));
    }

    fn record(&self, op: SimOp) {
        self.state.lock().ops.push_back(op);
    }

    fn publish_reorder(&self, kind: MutationKind) {
        self.hub.publish(ViewEvent::Mutated(kind));
    }

    fn technique_of(input: &SyntheticInput) -> Technique {
        match input {
            SyntheticInput::Pointer(_) => Technique::Pointer,
            SyntheticInput::Mouse(_) => Technique::Mouse,
            SyntheticInput::Drag(_) => Technique::NativeDnd,
            SyntheticInput::Key(_) => Technique::Keyboard,
        }
    }

    fn kind_of(input: &SyntheticInput) -> InputKind {
        match input {
            SyntheticInput::Pointer(p) => InputKind::Pointer(p.phase),
            SyntheticInput::Mouse(m) => InputKind::Mouse(m.phase),
            SyntheticInput::Drag(d) => InputKind::Drag(d.phase),
            SyntheticInput::Key(k) => InputKind::Key(k.phase),
        }
    }

    fn target_row(target: InputTarget) -> Option<RowHandle> {
        match target {
            InputTarget::Row(h) | InputTarget::Handle(h) => Some(h),
            InputTarget::Container | InputTarget::Document => None,
        }
    }

    /// Run the pointer/mouse grab state machine. Returns whether the
    /// visual order changed.
    fn drag_machine(
        state: &mut SimState,
        kind: GrabKind,
        phase: PointerPhase,
        target: InputTarget,
        y: f64,
        accepted: bool,
    ) -> bool {
        match phase {
            PointerPhase::Down => {
                if let Some(row) = Self::target_row(target) {
                    state.grab = Some(DragGrab {
                        kind,
                        row,
                        start_y: y,
                        active: false,
                    });
                }
                false
            }
            PointerPhase::Move => {
                let threshold = state.behavior.drag_threshold;
                if let Some(grab) = state.grab.as_mut()
                    && grab.kind == kind
                    && (y - grab.start_y).abs() >= threshold
                {
                    grab.active = true;
                }
                false
            }
            PointerPhase::Up => {
                let Some(grab) = state.grab.take() else {
                    return false;
                };
                if grab.kind != kind || !grab.active || !accepted {
                    return false;
                }
                let delta = ((y - grab.start_y) / state.behavior.row_height).round() as i64;
                state.shift(grab.row, delta)
            }
        }
    }

    fn keyboard_machine(state: &mut SimState, key: Key, target: InputTarget) -> bool {
        let Some(row) = Self::target_row(target) else {
            return false;
        };
        if state.focused != Some(row) {
            return false;
        }
        match key {
            Key::Space => {
                if state.lifted == Some(row) {
                    state.lifted = None;
                } else {
                    state.lifted = Some(row);
                }
                false
            }
            Key::ArrowDown | Key::ArrowUp => {
                if state.lifted != Some(row) || !state.behavior.accepts(Technique::Keyboard) {
                    return false;
                }
                let delta = if key == Key::ArrowDown { 1 } else { -1 };
                state.shift(row, delta)
            }
            Key::Escape => {
                state.lifted = None;
                false
            }
        }
    }
}

#[async_trait]
impl ListDriver for SimHost {
    async fn probe_rows(&self) -> Result<Vec<RowProbe>> {
        let state = self.state.lock();
        let probes = state
            .rows
            .iter()
            .filter_map(|row| {
                let vi = state.visual_index(row.handle)?;
                if let Some((start, end)) = state.behavior.mounted
                    && (vi < start || vi >= end)
                {
                    return None;
                }
                Some(RowProbe {
                    row: row.handle,
                    name: row.name.clone(),
                    rename: row.rename.clone(),
                    top: vi as f64 * state.behavior.row_height,
                    tag: row.tag,
                })
            })
            .collect();
        Ok(probes)
    }

    async fn ensure_tag(&self, row: RowHandle) -> Result<ItemId> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let slot = state
            .rows
            .iter_mut()
            .find(|r| r.handle == row)
            .ok_or(Error::RowGone(row))?;
        match slot.tag {
            Some(tag) => Ok(tag),
            None => {
                let tag = ItemId::new(state.next_tag);
                slot.tag = Some(tag);
                state.next_tag += 1;
                Ok(tag)
            }
        }
    }

    async fn row_rect(&self, row: RowHandle) -> Result<Rect> {
        let state = self.state.lock();
        let vi = state.visual_index(row).ok_or(Error::RowGone(row))?;
        let height = state.behavior.row_height;
        Ok(Rect::new(0.0, vi as f64 * height, 320.0, height))
    }

    async fn scroll_into_view(&self, row: RowHandle) -> Result<()> {
        self.record(SimOp::ScrollIntoView(row));
        Ok(())
    }

    async fn focus(&self, target: InputTarget) -> Result<()> {
        self.record(SimOp::Focus(target));
        self.state.lock().focused = Self::target_row(target);
        Ok(())
    }

    async fn dispatch(&self, target: InputTarget, input: SyntheticInput) -> Result<()> {
        self.record(SimOp::Input(target, Self::kind_of(&input)));
        let technique = Self::technique_of(&input);
        let changed = {
            let mut state = self.state.lock();
            if state.behavior.fails(technique) {
                return Err(Error::Dispatch(format!("{technique:?} sensor rejected")));
            }
            let accepted = state.behavior.accepts(technique);
            match input {
                SyntheticInput::Pointer(p) => Self::drag_machine(
                    &mut state,
                    GrabKind::Pointer,
                    p.phase,
                    target,
                    p.at.y,
                    accepted,
                ),
                SyntheticInput::Mouse(m) => Self::drag_machine(
                    &mut state,
                    GrabKind::Mouse,
                    m.phase,
                    target,
                    m.at.y,
                    accepted,
                ),
                SyntheticInput::Drag(d) => match d.phase {
                    DragPhase::Start => {
                        state.drag_source = Self::target_row(target);
                        false
                    }
                    DragPhase::Drop => {
                        let Some(source) = state.drag_source else {
                            return Ok(());
                        };
                        if !accepted {
                            return Ok(());
                        }
                        let Some(from) = state.visual_index(source) else {
                            return Ok(());
                        };
                        let insert = (d.at.y / state.behavior.row_height).floor().max(0.0) as usize;
                        state.splice(from, insert)
                    }
                    DragPhase::End => {
                        state.drag_source = None;
                        false
                    }
                    DragPhase::Enter | DragPhase::Over => false,
                },
                SyntheticInput::Key(k) => {
                    if k.phase == KeyPhase::Down {
                        Self::keyboard_machine(&mut state, k.key, target)
                    } else {
                        false
                    }
                }
            }
        };
        if changed {
            self.publish_reorder(MutationKind::Attributes);
        }
        Ok(())
    }

    async fn set_drag_style(&self, row: RowHandle, active: bool) -> Result<()> {
        self.record(SimOp::DragStyle(row, active));
        Ok(())
    }

    async fn reorder_hook(&self) -> Result<Option<HookHandle>> {
        let present = self.state.lock().behavior.hook_present;
        Ok(present.then(|| HookHandle::new(1)))
    }

    async fn invoke_reorder_hook(&self, _hook: HookHandle, record: DragEndRecord) -> Result<()> {
        self.record(SimOp::HookCall {
            old_index: record.old_index,
            new_index: record.new_index,
        });
        let changed = {
            let mut state = self.state.lock();
            if !state.behavior.hook_present {
                return Err(Error::HookUnavailable);
            }
            if !state.behavior.accepts(Technique::Hook) {
                false
            } else {
                let Some(from) = state.visual_index(record.item) else {
                    return Err(Error::RowGone(record.item));
                };
                state.splice(from, record.new_index)
            }
        };
        if changed {
            self.publish_reorder(MutationKind::Attributes);
        }
        Ok(())
    }

    async fn store(&self) -> Result<Option<StoreHandle>> {
        let present = self.state.lock().behavior.store_present;
        Ok(present.then(|| StoreHandle::new(1)))
    }

    async fn dispatch_store(&self, _store: StoreHandle, action: ReorderAction) -> Result<()> {
        self.record(SimOp::StoreDispatch(action));
        let changed = {
            let mut state = self.state.lock();
            if !state.behavior.store_present {
                return Err(Error::StoreUnavailable);
            }
            if state.behavior.accepts(Technique::Store) {
                state.splice(action.from, action.to)
            } else {
                false
            }
        };
        if changed {
            self.publish_reorder(MutationKind::Attributes);
        }
        Ok(())
    }

    async fn apply_visual_order(&self, rows: &[RowHandle]) -> Result<()> {
        self.record(SimOp::VisualSplice);
        let changed = {
            let mut state = self.state.lock();
            let mut order: Vec<RowHandle> = rows
                .iter()
                .copied()
                .filter(|&h| state.visual.contains(&h))
                .collect();
            for &h in &state.visual {
                if !order.contains(&h) {
                    order.push(h);
                }
            }
            let changed = order != state.visual;
            state.visual = order;
            changed
        };
        if changed {
            self.publish_reorder(MutationKind::ChildList);
        }
        Ok(())
    }

    async fn announce(&self, text: &str) -> Result<()> {
        self.record(SimOp::Announce(text.to_string()));
        self.state.lock().announcements.push(text.to_string());
        self.hub
            .publish(ViewEvent::Mutated(MutationKind::CharacterData));
        Ok(())
    }

    fn subscribe(&self) -> EventCursor {
        self.hub.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        geom::Point,
        input::{KeyInput, MouseInput, PointerInput},
    };

    fn pointer_drag(host: &SimHost, row: RowHandle, start_y: f64, end_y: f64) {
        let target = InputTarget::Row(row);
        block_on(async {
            host.dispatch(
                target,
                SyntheticInput::Pointer(PointerInput::down(Point::new(10.0, start_y), 1)),
            )
            .await
            .unwrap();
            host.dispatch(
                InputTarget::Document,
                SyntheticInput::Pointer(PointerInput::moved(Point::new(10.0, start_y + 16.0), 1)),
            )
            .await
            .unwrap();
            host.dispatch(
                InputTarget::Document,
                SyntheticInput::Pointer(PointerInput::up(Point::new(10.0, end_y), 1)),
            )
            .await
            .unwrap();
        });
    }

    /// Drive a future to completion on a throwaway single-thread runtime.
    fn block_on<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("runtime")
            .block_on(future)
    }

    #[test]
    fn probe_orders_by_rendered_top_not_dom_order() {
        let host = SimHost::new(&["A", "B", "C"]);
        // Reorder visually so DOM order and visual order diverge.
        let a = host.handle_at(0).unwrap();
        block_on(host.apply_visual_order(&[
            host.handle_at(1).unwrap(),
            host.handle_at(2).unwrap(),
            a,
        ]))
        .unwrap();

        let probes = block_on(host.probe_rows()).unwrap();
        // DOM order is still A,B,C but tops reflect the new visual order.
        assert_eq!(probes[0].name, "A");
        assert_eq!(probes[0].top, 112.0);
        assert_eq!(probes[1].top, 0.0);
        assert_eq!(probes[2].top, 56.0);
    }

    #[test]
    fn pointer_drag_moves_one_row_when_accepted() {
        let host = SimHost::with_behavior(
            &["A", "B", "C"],
            SimBehavior::accepting(&[Technique::Pointer]),
        );
        let a = host.handle_at(0).unwrap();
        pointer_drag(&host, a, 28.0, 84.0);
        assert_eq!(host.order_key(), "B|A|C");
    }

    #[test]
    fn pointer_drag_is_ignored_when_not_accepted() {
        let host =
            SimHost::with_behavior(&["A", "B", "C"], SimBehavior::accepting(&[Technique::Mouse]));
        let a = host.handle_at(0).unwrap();
        pointer_drag(&host, a, 28.0, 84.0);
        assert_eq!(host.order_key(), "A|B|C");
    }

    #[test]
    fn mouse_drag_moves_row() {
        let host =
            SimHost::with_behavior(&["A", "B", "C"], SimBehavior::accepting(&[Technique::Mouse]));
        let c = host.handle_at(2).unwrap();
        block_on(async {
            host.dispatch(
                InputTarget::Row(c),
                SyntheticInput::Mouse(MouseInput::down(Point::new(10.0, 140.0))),
            )
            .await
            .unwrap();
            host.dispatch(
                InputTarget::Document,
                SyntheticInput::Mouse(MouseInput::moved(Point::new(10.0, 124.0))),
            )
            .await
            .unwrap();
            host.dispatch(
                InputTarget::Document,
                SyntheticInput::Mouse(MouseInput::up(Point::new(10.0, 28.0))),
            )
            .await
            .unwrap();
        });
        assert_eq!(host.order_key(), "C|A|B");
    }

    #[test]
    fn keyboard_lift_requires_focus() {
        let host = SimHost::with_behavior(
            &["A", "B", "C"],
            SimBehavior::accepting(&[Technique::Keyboard]),
        );
        let a = host.handle_at(0).unwrap();
        block_on(async {
            // No focus: the sequence is ignored.
            host.dispatch(
                InputTarget::Row(a),
                SyntheticInput::Key(KeyInput::down(Key::Space)),
            )
            .await
            .unwrap();
            host.dispatch(
                InputTarget::Row(a),
                SyntheticInput::Key(KeyInput::down(Key::ArrowDown)),
            )
            .await
            .unwrap();
            assert_eq!(host.order_key(), "A|B|C");

            host.focus(InputTarget::Row(a)).await.unwrap();
            host.dispatch(
                InputTarget::Row(a),
                SyntheticInput::Key(KeyInput::down(Key::Space)),
            )
            .await
            .unwrap();
            host.dispatch(
                InputTarget::Row(a),
                SyntheticInput::Key(KeyInput::down(Key::ArrowDown)),
            )
            .await
            .unwrap();
            host.dispatch(
                InputTarget::Row(a),
                SyntheticInput::Key(KeyInput::down(Key::Space)),
            )
            .await
            .unwrap();
        });
        assert_eq!(host.order_key(), "B|A|C");
    }

    #[test]
    fn ensure_tag_is_stable_and_unique() {
        let host = SimHost::new(&["A", "B"]);
        let a = host.handle_at(0).unwrap();
        let b = host.handle_at(1).unwrap();
        block_on(async {
            let tag_a = host.ensure_tag(a).await.unwrap();
            let tag_b = host.ensure_tag(b).await.unwrap();
            assert_ne!(tag_a, tag_b);
            assert_eq!(host.ensure_tag(a).await.unwrap(), tag_a);
        });
    }

    #[test]
    fn mounted_window_hides_rows_outside_viewport() {
        let behavior = SimBehavior {
            mounted: Some((1, 3)),
            ..SimBehavior::default()
        };
        let host = SimHost::with_behavior(&["A", "B", "C", "D"], behavior);
        let probes = block_on(host.probe_rows()).unwrap();
        let names: Vec<&str> = probes.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["B", "C"]);
    }
}

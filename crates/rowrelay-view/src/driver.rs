//! The `ListDriver` trait: everything the engine may ask of a live view.
//!
//! Vendor-specific selectors, class names, and bridge plumbing live behind
//! this trait in the embedding. The engine assumes only "one item per row,
//! rows identified by stable offsets" and keeps no element references of
//! its own beyond a single call.

use async_trait::async_trait;
use serde::Serialize;

use crate::{
    ItemId, Result, RowHandle,
    events::EventCursor,
    geom::Rect,
    input::{InputTarget, SyntheticInput},
};

/// One row as observed by the container query.
#[derive(Clone, Debug, PartialEq)]
pub struct RowProbe {
    /// Handle to the mounted row element.
    pub row: RowHandle,
    /// Display-name text.
    pub name: String,
    /// Opaque rename side payload, when the row carries a rename input.
    pub rename: Option<String>,
    /// Rendered vertical offset. Virtualized hosts position rows
    /// absolutely, so this — not probe order — determines visual order.
    pub top: f64,
    /// Stable identity tag, if one was assigned on an earlier sight.
    pub tag: Option<ItemId>,
}

/// Opaque reference to the host's private drag-end callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HookHandle(u64);

impl HookHandle {
    /// Wrap a raw driver-assigned value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

/// Opaque reference to the host's central state store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StoreHandle(u64);

impl StoreHandle {
    /// Wrap a raw driver-assigned value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

/// Synthesized end-of-drag record mirroring what the host's own sensor
/// hands to its drag-end callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DragEndRecord {
    /// The dragged row.
    pub item: RowHandle,
    /// The row the drag ended over, when one exists.
    pub over: Option<RowHandle>,
    /// Visual index the drag started from.
    pub old_index: usize,
    /// Index the host's own splice should insert at.
    pub new_index: usize,
}

/// Reorder action shape dispatched to the host's state store. The driver
/// maps this to whatever action type the host's reducer expects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderAction {
    /// Index the item is removed from.
    pub from: usize,
    /// Index the reduced list inserts at.
    pub to: usize,
}

/// Live-view operations the engine depends on.
///
/// All methods are safe to call at any time; drivers answer from current
/// page state and report rows that vanished mid-call as
/// [`Error::RowGone`](crate::Error::RowGone).
#[async_trait]
pub trait ListDriver: Send + Sync {
    /// Query the container for mounted rows.
    ///
    /// Returns an empty list when the container is not present; virtualized
    /// hosts may mount only a window of the logical items. Probe order is
    /// DOM order, which callers must not confuse with visual order.
    async fn probe_rows(&self) -> Result<Vec<RowProbe>>;

    /// Assign (or return the existing) stable identity tag for a row.
    async fn ensure_tag(&self, row: RowHandle) -> Result<ItemId>;

    /// Rendered rectangle of a row.
    async fn row_rect(&self, row: RowHandle) -> Result<Rect>;

    /// Scroll the row into the visible viewport.
    async fn scroll_into_view(&self, row: RowHandle) -> Result<()>;

    /// Move keyboard focus to the target.
    async fn focus(&self, target: InputTarget) -> Result<()>;

    /// Dispatch one synthesized input event. Pointer capture semantics are
    /// the driver's responsibility: a captured pointer keeps routing to its
    /// capture target until release.
    async fn dispatch(&self, target: InputTarget, input: SyntheticInput) -> Result<()>;

    /// Set or clear the transient visual drag affordance on a row.
    /// Strategies always clear what they set, even on failure.
    async fn set_drag_style(&self, row: RowHandle, active: bool) -> Result<()>;

    /// Locate the host's private drag-end callback, if reachable.
    async fn reorder_hook(&self) -> Result<Option<HookHandle>>;

    /// Invoke a previously located drag-end callback.
    async fn invoke_reorder_hook(&self, hook: HookHandle, record: DragEndRecord) -> Result<()>;

    /// Locate the host's central state store, if exposed.
    async fn store(&self) -> Result<Option<StoreHandle>>;

    /// Dispatch a synthesized reorder action to the store.
    async fn dispatch_store(&self, store: StoreHandle, action: ReorderAction) -> Result<()>;

    /// Rewrite rendered offsets and index labels so rows appear in the
    /// given order. Purely visual; carries rename payloads along with
    /// their rows. The last-resort splice strategy is the only caller.
    async fn apply_visual_order(&self, rows: &[RowHandle]) -> Result<()>;

    /// Write the accessibility live-region announcement text.
    async fn announce(&self, text: &str) -> Result<()>;

    /// Subscribe to container mutations.
    fn subscribe(&self) -> EventCursor;
}

//! Item model: stateless snapshots of the visually ordered list, and the
//! index math shared by strategies and the menu adapter.
//!
//! Snapshots are rebuilt from the live view on every query and never
//! cached across event-loop turns; the host may re-render between calls
//! and the visible order is the only source of truth.

use rowrelay_view::{ItemId, RowHandle, driver::ListDriver};
use tracing::debug;

/// One reorderable item in current visual order.
#[derive(Clone, Debug)]
pub struct Item {
    /// Stable identity tag.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Opaque rename side payload.
    pub rename: Option<String>,
    /// Rendered vertical offset the ordering was derived from.
    pub top: f64,
    /// Handle to the mounted row. Valid for this snapshot only.
    pub row: RowHandle,
}

/// Read the currently mounted items, ordered by rendered position.
///
/// Identity tags are assigned on first sight. Returns an empty list when
/// the container is absent; treated by callers as "no-op, retry later".
/// Rows that vanish mid-snapshot are dropped rather than failing the
/// whole query.
pub async fn snapshot(driver: &dyn ListDriver) -> Vec<Item> {
    let mut probes = match driver.probe_rows().await {
        Ok(probes) => probes,
        Err(err) => {
            debug!("probe_failed: {err}");
            return Vec::new();
        }
    };
    probes.sort_by(|a, b| a.top.total_cmp(&b.top));

    let mut items = Vec::with_capacity(probes.len());
    for probe in probes {
        let id = match probe.tag {
            Some(tag) => tag,
            None => match driver.ensure_tag(probe.row).await {
                Ok(tag) => tag,
                Err(err) => {
                    debug!("tag_failed: {} {err}", probe.row);
                    continue;
                }
            },
        };
        items.push(Item {
            id,
            name: probe.name,
            rename: probe.rename,
            top: probe.top,
            row: probe.row,
        });
    }
    items
}

/// Display-name order as a single comparable string.
#[must_use]
pub fn order_key(items: &[Item]) -> String {
    let names: Vec<&str> = items.iter().map(|item| item.name.as_str()).collect();
    names.join("|")
}

/// Whether `(from, to)` changes nothing under the insert-before contract:
/// inserting an item before itself or before its own successor is the
/// identity.
#[must_use]
pub const fn is_noop(from: usize, to: usize) -> bool {
    to == from || to == from + 1
}

/// Insert position within the reduced list (after removing `from`) that
/// places the moved item immediately before the item originally at `to`.
#[must_use]
pub const fn splice_index(from: usize, to: usize) -> usize {
    if from < to { to - 1 } else { to }
}

/// Signed number of visual rows the source travels.
#[must_use]
pub const fn row_travel(from: usize, to: usize) -> i64 {
    splice_index(from, to) as i64 - from as i64
}

/// Apply the contract move to a slice. Out-of-range or no-op requests
/// return the input unchanged.
#[must_use]
pub fn apply_move<T: Clone>(list: &[T], from: usize, to: usize) -> Vec<T> {
    let mut out = list.to_vec();
    if from >= out.len() || to >= out.len() || is_noop(from, to) {
        return out;
    }
    let item = out.remove(from);
    out.insert(splice_index(from, to), item);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_down_lands_before_original_target() {
        let order = ["A", "B", "C", "D", "E"];
        assert_eq!(apply_move(&order, 0, 3), ["B", "C", "A", "D", "E"]);
    }

    #[test]
    fn move_up_lands_before_original_target() {
        let order = ["X", "Y", "Z"];
        assert_eq!(apply_move(&order, 2, 0), ["Z", "X", "Y"]);
    }

    #[test]
    fn noop_requests_leave_order_unchanged() {
        let order = ["A", "B", "C"];
        assert!(is_noop(1, 1));
        assert!(is_noop(1, 2));
        assert_eq!(apply_move(&order, 1, 1), order);
        assert_eq!(apply_move(&order, 1, 2), order);
    }

    #[test]
    fn travel_counts_rows_not_raw_index_delta() {
        // Down moves travel one less than the raw delta because the
        // removal shifts everything after the source up by one.
        assert_eq!(row_travel(0, 3), 2);
        assert_eq!(row_travel(2, 0), -2);
        assert_eq!(row_travel(1, 3), 1);
    }
}

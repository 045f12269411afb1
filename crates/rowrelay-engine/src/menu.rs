//! Dropdown/menu adapter: translate a user's "move after X" selection
//! into an index pair for the controller.
//!
//! Thin and stateless: selections are resolved against the snapshot taken
//! at resolution time, by stable tag rather than position, because the
//! host may have re-rendered since the menu was built.

use rowrelay_view::ItemId;
use tracing::debug;

use crate::model::{self, Item};

/// A user's reorder selection for one source item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveSelection {
    /// Move to the first position.
    Top,
    /// Move to the last expressible position.
    End,
    /// Move immediately after the given item.
    After(ItemId),
}

/// Index pair consumed by the controller. Both indices are positions in
/// the visual order current at resolution time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveRequest {
    /// Source position.
    pub from: usize,
    /// Destination position; the source lands immediately before the item
    /// currently here.
    pub to: usize,
}

/// Resolve a selection against the current snapshot.
///
/// Returns `None` when the source or target is gone from the view or the
/// resulting move is a no-op, so callers never hand the controller a
/// request it would reject.
#[must_use]
pub fn resolve(items: &[Item], source: ItemId, selection: MoveSelection) -> Option<MoveRequest> {
    let len = items.len();
    let from = items.iter().position(|item| item.id == source)?;
    let to = match selection {
        MoveSelection::Top => 0,
        MoveSelection::End => len - 1,
        MoveSelection::After(target) => {
            let anchor = items.iter().position(|item| item.id == target)?;
            // "After the last item" is not expressible as an insert-before
            // index; cap at the last row.
            (anchor + 1).min(len - 1)
        }
    };
    if model::is_noop(from, to) {
        debug!(from, to, "menu_noop");
        return None;
    }
    Some(MoveRequest { from, to })
}

#[cfg(test)]
mod tests {
    use rowrelay_view::RowHandle;

    use super::*;

    fn items(names: &[&str]) -> Vec<Item> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| Item {
                id: ItemId::new(i as u64 + 1),
                name: (*name).to_string(),
                rename: None,
                top: i as f64 * 56.0,
                row: RowHandle::new(i as u64 + 1),
            })
            .collect()
    }

    fn apply(items: &[Item], request: MoveRequest) -> Vec<String> {
        model::apply_move(items, request.from, request.to)
            .iter()
            .map(|item| item.name.clone())
            .collect()
    }

    #[test]
    fn after_earlier_item_lands_right_after_it() {
        let items = items(&["A", "B", "C", "D", "E"]);
        let request = resolve(&items, ItemId::new(5), MoveSelection::After(ItemId::new(1)))
            .expect("resolves");
        assert_eq!(request, MoveRequest { from: 4, to: 1 });
        assert_eq!(apply(&items, request), ["A", "E", "B", "C", "D"]);
    }

    #[test]
    fn after_later_item_lands_right_after_it() {
        let items = items(&["A", "B", "C", "D", "E"]);
        let request = resolve(&items, ItemId::new(1), MoveSelection::After(ItemId::new(3)))
            .expect("resolves");
        assert_eq!(request, MoveRequest { from: 0, to: 3 });
        assert_eq!(apply(&items, request), ["B", "C", "A", "D", "E"]);
    }

    #[test]
    fn after_immediate_predecessor_is_a_noop() {
        let items = items(&["A", "B", "C"]);
        assert!(resolve(&items, ItemId::new(2), MoveSelection::After(ItemId::new(1))).is_none());
    }

    #[test]
    fn after_self_is_a_noop() {
        let items = items(&["A", "B", "C"]);
        assert!(resolve(&items, ItemId::new(2), MoveSelection::After(ItemId::new(2))).is_none());
    }

    #[test]
    fn top_moves_before_first() {
        let items = items(&["A", "B", "C"]);
        let request = resolve(&items, ItemId::new(3), MoveSelection::Top).expect("resolves");
        assert_eq!(apply(&items, request), ["C", "A", "B"]);
    }

    #[test]
    fn top_for_first_item_is_a_noop() {
        let items = items(&["A", "B", "C"]);
        assert!(resolve(&items, ItemId::new(1), MoveSelection::Top).is_none());
    }

    #[test]
    fn end_caps_at_last_expressible_slot() {
        let items = items(&["A", "B", "C", "D"]);
        let request = resolve(&items, ItemId::new(1), MoveSelection::End).expect("resolves");
        assert_eq!(request.to, 3);
        assert_eq!(apply(&items, request), ["B", "C", "A", "D"]);
    }

    #[test]
    fn end_for_last_item_is_a_noop() {
        let items = items(&["A", "B", "C"]);
        assert!(resolve(&items, ItemId::new(3), MoveSelection::End).is_none());
    }

    #[test]
    fn vanished_source_or_target_resolves_nothing() {
        let items = items(&["A", "B"]);
        assert!(resolve(&items, ItemId::new(9), MoveSelection::Top).is_none());
        assert!(resolve(&items, ItemId::new(1), MoveSelection::After(ItemId::new(9))).is_none());
    }
}

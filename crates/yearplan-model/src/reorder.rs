//! Adjacent-swap reordering for ordered entries (columns and rows).
//!
//! Entries are kept sorted by their `order` field; ascending order is the
//! left-to-right (columns) or top-to-bottom (rows) position.

use serde::{Deserialize, Serialize};

/// Direction of a one-step move. For columns, `Up` moves left.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

/// An entry with an identity and a position.
pub trait Ordered {
    type Id: PartialEq;

    fn id(&self) -> &Self::Id;
    fn order(&self) -> u32;
    fn set_order(&mut self, order: u32);
}

/// Sort entries by ascending `order`.
pub fn sort_by_order<T: Ordered>(items: &mut [T]) {
    items.sort_by_key(|item| item.order());
}

/// Reassign `order` as `0..len` following the current slice position.
pub fn normalize_order<T: Ordered>(items: &mut [T]) {
    for (idx, item) in items.iter_mut().enumerate() {
        item.set_order(idx as u32);
    }
}

pub fn position_of<T: Ordered>(items: &[T], id: &T::Id) -> Option<usize> {
    items.iter().position(|item| item.id() == id)
}

/// Index of the neighbor `id` would swap with, or `None` at a boundary or
/// when `id` is unknown.
pub fn neighbor_index<T: Ordered>(items: &[T], id: &T::Id, direction: Direction) -> Option<usize> {
    let idx = position_of(items, id)?;
    match direction {
        Direction::Up => idx.checked_sub(1),
        Direction::Down => (idx + 1 < items.len()).then_some(idx + 1),
    }
}

/// Whether moving `id` in `direction` would change anything.
pub fn can_move<T: Ordered>(items: &[T], id: &T::Id, direction: Direction) -> bool {
    neighbor_index(items, id, direction).is_some()
}

/// Swap `id` with its neighbor in `direction`, exchanging both `order`
/// values and slice positions.
///
/// Boundary moves and unknown ids leave `items` untouched and return `false`.
/// Expects `items` sorted by order.
pub fn swap_adjacent<T: Ordered>(items: &mut [T], id: &T::Id, direction: Direction) -> bool {
    let Some(idx) = position_of(items, id) else {
        return false;
    };
    let Some(other) = neighbor_index(items, id, direction) else {
        return false;
    };

    let a = items[idx].order();
    let b = items[other].order();
    items[idx].set_order(b);
    items[other].set_order(a);
    items.swap(idx, other);
    true
}

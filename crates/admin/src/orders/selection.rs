//! Client-local set of selected order ids.

use order_desk_core::OrderId;

/// Selected orders, kept in the order they were selected.
///
/// Pages are small, so a `Vec` with linear lookups is enough.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: Vec<OrderId>,
}

impl SelectionSet {
    /// Empty selection.
    #[must_use]
    pub const fn new() -> Self {
        Self { ids: Vec::new() }
    }

    /// Whether `id` is selected.
    #[must_use]
    pub fn contains(&self, id: OrderId) -> bool {
        self.ids.contains(&id)
    }

    /// Select `id`. Returns `false` if it was already selected.
    pub fn insert(&mut self, id: OrderId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Flip the selection state of `id`.
    pub fn toggle(&mut self, id: OrderId) {
        if self.contains(id) {
            self.ids.retain(|selected| *selected != id);
        } else {
            self.ids.push(id);
        }
    }

    /// Replace the selection with `ids`, dropping duplicates.
    pub fn select_all(&mut self, ids: impl IntoIterator<Item = OrderId>) {
        self.ids.clear();
        for id in ids {
            self.insert(id);
        }
    }

    /// Keep only ids for which `present` returns true.
    pub fn retain(&mut self, mut present: impl FnMut(OrderId) -> bool) {
        self.ids.retain(|id| present(*id));
    }

    /// Deselect everything.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Selected ids in selection order.
    #[must_use]
    pub fn ids(&self) -> &[OrderId] {
        &self.ids
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

//! Ordered, duplicate-free lists of item IDs.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ItemId;

/// An ordered set of item IDs: the children of a group or the root of a diagram.
///
/// Order is paint order, first item at the bottom. Every operation returns a
/// new container. The container does not check that the IDs exist; that is the
/// owning [`Diagram`](crate::Diagram)'s job. Clones share the ID list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ItemId>", into = "Vec<ItemId>")]
pub struct DiagramContainer {
    ids: Arc<[ItemId]>,
}

impl Default for DiagramContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagramContainer {
    /// Create an empty container.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ids: Arc::from(Vec::new()),
        }
    }

    /// Create a container from IDs, dropping later duplicates.
    #[must_use]
    pub fn from_ids<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = ItemId>,
    {
        let mut unique: Vec<ItemId> = Vec::new();
        for id in ids {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        Self { ids: unique.into() }
    }

    /// The IDs in order.
    #[must_use]
    pub fn ids(&self) -> &[ItemId] {
        &self.ids
    }

    /// Iterate the IDs in order.
    pub fn iter(&self) -> std::slice::Iter<'_, ItemId> {
        self.ids.iter()
    }

    /// Number of IDs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the container is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Whether `id` is listed.
    #[must_use]
    pub fn contains(&self, id: &ItemId) -> bool {
        self.ids.contains(id)
    }

    /// Position of `id`, if listed.
    #[must_use]
    pub fn index_of(&self, id: &ItemId) -> Option<usize> {
        self.ids.iter().position(|x| x == id)
    }

    /// Append `id` at the top. Unchanged if already present.
    #[must_use]
    pub fn add(&self, id: ItemId) -> Self {
        let len = self.ids.len();
        self.insert(len, id)
    }

    /// Insert `id` at `index` (clamped). Unchanged if already present.
    #[must_use]
    pub fn insert(&self, index: usize, id: ItemId) -> Self {
        if self.contains(&id) {
            return self.clone();
        }
        let mut ids = self.ids.to_vec();
        ids.insert(index.min(ids.len()), id);
        Self { ids: ids.into() }
    }

    /// Remove every ID in `ids`.
    #[must_use]
    pub fn remove(&self, ids: &[ItemId]) -> Self {
        Self {
            ids: self
                .ids
                .iter()
                .filter(|id| !ids.contains(id))
                .cloned()
                .collect(),
        }
    }

    /// Replace `target` with `replacement` in place.
    #[must_use]
    pub fn replace_with(&self, target: &ItemId, replacement: &[ItemId]) -> Self {
        let mut ids = Vec::with_capacity(self.ids.len() + replacement.len());
        for id in self.ids.iter() {
            if id == target {
                ids.extend(replacement.iter().cloned());
            } else {
                ids.push(id.clone());
            }
        }
        Self::from_ids(ids)
    }

    /// Move the listed `ids` so the first of them lands at `index`, keeping
    /// their relative order. IDs not in the container are ignored.
    #[must_use]
    pub fn move_to(&self, ids: &[ItemId], index: usize) -> Self {
        let moving: Vec<ItemId> = self
            .ids
            .iter()
            .filter(|id| ids.contains(id))
            .cloned()
            .collect();
        let mut rest = self.remove(&moving).ids.to_vec();

        let at = index.min(rest.len());
        rest.splice(at..at, moving);
        Self { ids: rest.into() }
    }
}

impl From<Vec<ItemId>> for DiagramContainer {
    fn from(ids: Vec<ItemId>) -> Self {
        Self::from_ids(ids)
    }
}

impl From<DiagramContainer> for Vec<ItemId> {
    fn from(container: DiagramContainer) -> Self {
        container.ids.to_vec()
    }
}

impl<'a> IntoIterator for &'a DiagramContainer {
    type Item = &'a ItemId;
    type IntoIter = std::slice::Iter<'a, ItemId>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<ItemId> {
        names.iter().map(|n| ItemId::from(*n)).collect()
    }

    #[test]
    fn test_from_ids_drops_duplicates() {
        let c = DiagramContainer::from_ids(ids(&["a", "b", "a", "c"]));
        assert_eq!(c.ids(), ids(&["a", "b", "c"]).as_slice());
    }

    #[test]
    fn test_add_is_idempotent() {
        let c = DiagramContainer::new().add("a".into()).add("a".into());
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn test_move_to_front_and_back() {
        let c = DiagramContainer::from_ids(ids(&["a", "b", "c", "d"]));

        let front = c.move_to(&ids(&["a", "c"]), usize::MAX);
        assert_eq!(front.ids(), ids(&["b", "d", "a", "c"]).as_slice());

        let back = c.move_to(&ids(&["d"]), 0);
        assert_eq!(back.ids(), ids(&["d", "a", "b", "c"]).as_slice());
    }

    #[test]
    fn test_replace_with_splices() {
        let c = DiagramContainer::from_ids(ids(&["a", "g", "d"]));
        let r = c.replace_with(&"g".into(), &ids(&["b", "c"]));
        assert_eq!(r.ids(), ids(&["a", "b", "c", "d"]).as_slice());
    }

    #[test]
    fn test_original_unchanged() {
        let c = DiagramContainer::from_ids(ids(&["a"]));
        let _ = c.add("b".into());
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn test_clones_share_ids() {
        let c = DiagramContainer::from_ids(ids(&["a", "b"]));
        let copy = c.clone();
        assert!(Arc::ptr_eq(&c.ids, &copy.ids));
    }
}

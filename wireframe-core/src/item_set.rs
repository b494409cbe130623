//! Expansion of a selection into every item it covers.

use std::collections::HashSet;
use std::sync::Arc;

use crate::{Diagram, DiagramItem, ItemId, Shape};

/// The items named by a selection together with everything nested in the
/// selected groups.
///
/// Items appear in pre-order: a group before its children, children in paint
/// order. Each item is listed once even if it was selected both directly and
/// through a group.
#[derive(Debug, Clone, Default)]
pub struct ItemSet {
    all_items: Vec<DiagramItem>,
    all_shapes: Vec<Arc<Shape>>,
}

impl ItemSet {
    /// Expand `ids` against `diagram`. Unknown IDs are skipped.
    #[must_use]
    pub fn from_diagram(ids: &[ItemId], diagram: &Diagram) -> Self {
        let mut set = Self::default();
        let mut seen: HashSet<ItemId> = HashSet::new();

        for id in ids {
            set.visit(id, diagram, &mut seen);
        }

        set
    }

    fn visit(&mut self, id: &ItemId, diagram: &Diagram, seen: &mut HashSet<ItemId>) {
        let mut stack = vec![id];

        while let Some(id) = stack.pop() {
            if seen.contains(id) {
                continue;
            }
            let Some(item) = diagram.item(id) else {
                continue;
            };
            seen.insert(id.clone());

            match item {
                DiagramItem::Shape(shape) => self.all_shapes.push(Arc::clone(shape)),
                DiagramItem::Group(group) => stack.extend(group.child_ids.iter().rev()),
            }
            self.all_items.push(item.clone());
        }
    }

    /// Every covered item, groups included.
    #[must_use]
    pub fn all_items(&self) -> &[DiagramItem] {
        &self.all_items
    }

    /// Every covered shape.
    #[must_use]
    pub fn all_shapes(&self) -> &[Arc<Shape>] {
        &self.all_shapes
    }

    /// IDs of every covered item.
    #[must_use]
    pub fn item_ids(&self) -> Vec<ItemId> {
        self.all_items.iter().map(|i| i.id().clone()).collect()
    }

    /// IDs of every covered shape.
    #[must_use]
    pub fn shape_ids(&self) -> Vec<ItemId> {
        self.all_shapes.iter().map(|s| s.id.clone()).collect()
    }

    /// Whether nothing was covered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.all_items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Shape, Transform};

    #[test]
    fn test_group_expands_recursively() {
        let mut d = Diagram::new("d".into());
        for name in ["a", "b", "c"] {
            d = d
                .add_item(None, Shape::new(name, "Rectangle", Transform::default()))
                .expect("add");
        }
        let d = d
            .group_items("inner", &["b".into(), "c".into()])
            .and_then(|d| d.group_items("outer", &["a".into(), "inner".into()]))
            .expect("group");

        let set = ItemSet::from_diagram(&["outer".into(), "b".into()], &d);

        let names: Vec<String> = set.item_ids().iter().map(ToString::to_string).collect();
        assert_eq!(names, vec!["outer", "a", "inner", "b", "c"]);
        assert_eq!(set.shape_ids().len(), 3);
    }

    #[test]
    fn test_unknown_ids_are_skipped() {
        let d = Diagram::new("d".into());
        assert!(ItemSet::from_diagram(&["nope".into()], &d).is_empty());
    }
}

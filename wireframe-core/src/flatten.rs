//! Linearization of the item tree into paint order.

use std::collections::HashSet;
use std::sync::Arc;

use crate::{Diagram, DiagramItem, ItemId, Shape};

/// Flatten `diagram` into its drawable shapes in paint order.
///
/// Pre-order depth-first walk of the root container, descending into groups.
/// Groups themselves are never emitted. Later shapes paint above earlier ones.
/// Container entries without a matching item are skipped, and an ID is never
/// visited twice even if the tree is malformed.
#[must_use]
pub fn flatten(diagram: &Diagram) -> Vec<Arc<Shape>> {
    let mut shapes = Vec::with_capacity(diagram.len());
    let mut visited: HashSet<&ItemId> = HashSet::new();
    let mut stack: Vec<&ItemId> = diagram.root().iter().rev().collect();

    while let Some(id) = stack.pop() {
        if !visited.insert(id) {
            continue;
        }

        match diagram.item(id) {
            Some(DiagramItem::Shape(shape)) => shapes.push(Arc::clone(shape)),
            Some(DiagramItem::Group(group)) => stack.extend(group.child_ids.iter().rev()),
            None => tracing::debug!(diagram = %diagram.id(), item = %id, "Skipping dangling item id"),
        }
    }

    shapes
}

/// Flatten an optional diagram; no diagram yields no shapes.
#[must_use]
pub fn flatten_optional(diagram: Option<&Diagram>) -> Vec<Arc<Shape>> {
    diagram.map(flatten).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DiagramContainer, Group, Transform};

    fn shape(id: &str) -> DiagramItem {
        Shape::new(id, "Rectangle", Transform::default()).into()
    }

    fn container(names: &[&str]) -> DiagramContainer {
        DiagramContainer::from_ids(names.iter().map(|n| ItemId::from(*n)))
    }

    fn names(shapes: &[Arc<Shape>]) -> Vec<&str> {
        shapes.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn test_flatten_depth_first() {
        // root = [A, G(=[B, C]), D]
        let group = Group::new("G", Transform::default(), container(&["B", "C"]));
        let diagram = Diagram::from_parts(
            "d".into(),
            vec![shape("A"), shape("B"), shape("C"), shape("D"), group.into()],
            container(&["A", "G", "D"]),
        )
        .expect("valid tree");

        assert_eq!(names(&flatten(&diagram)), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_flatten_nested_groups() {
        let inner = Group::new("I", Transform::default(), container(&["C"]));
        let outer = Group::new("O", Transform::default(), container(&["B", "I", "D"]));
        let diagram = Diagram::from_parts(
            "d".into(),
            vec![shape("A"), shape("B"), shape("C"), shape("D"), inner.into(), outer.into()],
            container(&["O", "A"]),
        )
        .expect("valid tree");

        assert_eq!(names(&flatten(&diagram)), vec!["B", "C", "D", "A"]);
    }

    #[test]
    fn test_flatten_skips_dangling_ids() {
        let diagram = Diagram::from_parts(
            "d".into(),
            vec![shape("A"), shape("B")],
            container(&["A", "ghost", "B"]),
        )
        .expect("dangling ids are tolerated");

        assert_eq!(names(&flatten(&diagram)), vec!["A", "B"]);
    }

    #[test]
    fn test_flatten_none_is_empty() {
        assert!(flatten_optional(None).is_empty());
    }
}

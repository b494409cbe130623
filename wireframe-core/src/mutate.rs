//! Style and geometry edits applied to a selection of items.

use std::sync::Arc;

use crate::{AppearanceLookup, Diagram, DiagramItem, ItemId, ItemSet, Shape, Transform};

/// Set `appearance[key] = value` on every shape covered by `item_ids`.
///
/// Groups are expanded to all shapes nested in them. A shape is only changed
/// if its renderer is known to `lookup` and either `force` is set or the
/// renderer's default appearance declares `key`. Shapes with an unknown
/// renderer are never changed, even when forced.
#[must_use]
pub fn change_appearance(
    diagram: &Diagram,
    item_ids: &[ItemId],
    key: &str,
    value: &serde_json::Value,
    force: bool,
    lookup: &dyn AppearanceLookup,
) -> Diagram {
    let set = ItemSet::from_diagram(item_ids, diagram);

    diagram.update_items(&set.shape_ids(), |item| {
        let Some(shape) = item.as_shape() else {
            return item.clone();
        };

        let Some(defaults) = lookup.default_appearance(&shape.renderer) else {
            tracing::trace!(item = %shape.id, renderer = %shape.renderer, "Unknown renderer, skipping");
            return item.clone();
        };

        if !(force || defaults.contains_key(key)) {
            tracing::trace!(item = %shape.id, renderer = %shape.renderer, key, "Appearance key not declared, skipping");
            return item.clone();
        }
        if shape.appearance.get(key) == Some(value) {
            return item.clone();
        }

        let updated = Shape::clone(shape).with_appearance(key, value.clone());
        DiagramItem::Shape(Arc::new(updated))
    })
}

/// Re-map every item covered by `item_ids` (groups and their contents) from
/// `old_bounds` to `new_bounds`.
#[must_use]
pub fn transform_items(
    diagram: &Diagram,
    item_ids: &[ItemId],
    old_bounds: &Transform,
    new_bounds: &Transform,
) -> Diagram {
    let set = ItemSet::from_diagram(item_ids, diagram);

    diagram.update_items(&set.item_ids(), |item| {
        item.transform_by_bounds(old_bounds, new_bounds)
    })
}

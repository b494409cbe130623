//! Serializable edit records.
//!
//! Every mutation the renderer core consumes is a plain record so that the
//! surrounding state layer can log, replay and undo it.

use serde::{Deserialize, Serialize};

use crate::{DiagramId, ItemId, Transform};

/// A diagram or editor mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum Action {
    /// Change one appearance key on a set of items.
    #[serde(rename = "items/appearance")]
    ChangeItemsAppearance {
        /// Target diagram.
        diagram_id: DiagramId,
        /// Target items; groups expand to their shapes.
        item_ids: Vec<ItemId>,
        /// Appearance key.
        key: String,
        /// New value.
        value: serde_json::Value,
        /// Apply even if the renderer does not declare `key`.
        #[serde(default)]
        force: bool,
    },

    /// Re-map items from one bounding box to another.
    #[serde(rename = "items/transform")]
    TransformItems {
        /// Target diagram.
        diagram_id: DiagramId,
        /// Target items; groups expand to all nested items.
        item_ids: Vec<ItemId>,
        /// Bounds before the edit.
        old_bounds: Transform,
        /// Bounds after the edit.
        new_bounds: Transform,
    },

    /// Resize the canvas.
    #[serde(rename = "editor/size")]
    ResizeCanvas {
        /// New width in pixels.
        width: f32,
        /// New height in pixels.
        height: f32,
    },

    /// Change the canvas background color.
    #[serde(rename = "editor/color")]
    ChangeCanvasColor {
        /// New color as `#rgb` or `#rrggbb`.
        color: String,
    },
}

impl Action {
    /// Build a [`Action::ChangeItemsAppearance`].
    #[must_use]
    pub fn change_appearance(
        diagram_id: DiagramId,
        item_ids: Vec<ItemId>,
        key: impl Into<String>,
        value: serde_json::Value,
        force: bool,
    ) -> Self {
        Self::ChangeItemsAppearance {
            diagram_id,
            item_ids,
            key: key.into(),
            value,
            force,
        }
    }

    /// Build a [`Action::TransformItems`].
    #[must_use]
    pub fn transform_items(
        diagram_id: DiagramId,
        item_ids: Vec<ItemId>,
        old_bounds: Transform,
        new_bounds: Transform,
    ) -> Self {
        Self::TransformItems {
            diagram_id,
            item_ids,
            old_bounds,
            new_bounds,
        }
    }

    /// The record's type tag.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ChangeItemsAppearance { .. } => "items/appearance",
            Self::TransformItems { .. } => "items/transform",
            Self::ResizeCanvas { .. } => "editor/size",
            Self::ChangeCanvasColor { .. } => "editor/color",
        }
    }

    /// The diagram this action edits, if it targets one.
    #[must_use]
    pub fn diagram_id(&self) -> Option<&DiagramId> {
        match self {
            Self::ChangeItemsAppearance { diagram_id, .. }
            | Self::TransformItems { diagram_id, .. } => Some(diagram_id),
            Self::ResizeCanvas { .. } | Self::ChangeCanvasColor { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_is_plain_record() {
        let action = Action::change_appearance(
            "d".into(),
            vec!["a".into()],
            "TEXT",
            json!("Hello"),
            false,
        );

        let value = serde_json::to_value(&action).expect("serialize");
        assert_eq!(value["type"], action.kind());
        assert_eq!(value["diagramId"], "d");
        assert_eq!(value["itemIds"], json!(["a"]));

        let back: Action = serde_json::from_value(value).expect("deserialize");
        assert_eq!(back, action);
    }

    #[test]
    fn test_canvas_actions_have_no_diagram() {
        let action: Action =
            serde_json::from_value(json!({"type": "editor/size", "width": 800, "height": 600}))
                .expect("deserialize");
        assert!(action.diagram_id().is_none());
        assert_eq!(action.kind(), "editor/size");
    }
}

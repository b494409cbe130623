//! Editor state: the ordered diagrams of a document plus canvas settings.

use serde::{Deserialize, Serialize};

use crate::mutate::{change_appearance, transform_items};
use crate::{Action, AppearanceLookup, Color, Diagram, DiagramError, DiagramId, DiagramResult, Vec2};

/// Smallest allowed canvas dimension in pixels.
pub const MIN_CANVAS_SIZE: f32 = 100.0;

/// Largest allowed canvas dimension in pixels.
pub const MAX_CANVAS_SIZE: f32 = 3000.0;

/// Default canvas dimension in pixels.
const DEFAULT_CANVAS_SIZE: f32 = 1000.0;

/// The complete editor state.
///
/// Like [`Diagram`], this is a value: every edit returns a new state that
/// shares all untouched diagrams with the old one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorState {
    diagrams: imbl::HashMap<DiagramId, Diagram>,
    diagram_order: imbl::Vector<DiagramId>,
    size: Vec2,
    color: Color,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorState {
    /// Create a state without diagrams, a 1000x1000 canvas and a white background.
    #[must_use]
    pub fn new() -> Self {
        Self {
            diagrams: imbl::HashMap::new(),
            diagram_order: imbl::Vector::new(),
            size: Vec2::new(DEFAULT_CANVAS_SIZE, DEFAULT_CANVAS_SIZE),
            color: Color::white(),
        }
    }

    /// Canvas size.
    #[must_use]
    pub const fn size(&self) -> Vec2 {
        self.size
    }

    /// Canvas background color.
    #[must_use]
    pub fn color(&self) -> &Color {
        &self.color
    }

    /// Look up a diagram.
    #[must_use]
    pub fn diagram(&self, id: &DiagramId) -> Option<&Diagram> {
        self.diagrams.get(id)
    }

    /// Diagrams in page order.
    #[must_use]
    pub fn ordered_diagrams(&self) -> Vec<&Diagram> {
        self.diagram_order
            .iter()
            .filter_map(|id| self.diagrams.get(id))
            .collect()
    }

    /// Append a diagram as the last page.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::InvalidOperation`] if a diagram with the same ID exists.
    pub fn add_diagram(&self, diagram: Diagram) -> DiagramResult<Self> {
        let id = diagram.id().clone();
        if self.diagrams.contains_key(&id) {
            return Err(DiagramError::InvalidOperation(format!(
                "diagram {id} already exists"
            )));
        }

        let mut next = self.clone();
        next.diagram_order.push_back(id.clone());
        next.diagrams.insert(id, diagram);
        Ok(next)
    }

    /// Remove a diagram. Unknown IDs are ignored.
    #[must_use]
    pub fn remove_diagram(&self, id: &DiagramId) -> Self {
        let mut next = self.clone();
        next.diagrams.remove(id);
        next.diagram_order.retain(|d| d != id);
        next
    }

    /// Replace a diagram with `f(diagram)`.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::DiagramNotFound`] if `id` is unknown.
    pub fn update_diagram<F>(&self, id: &DiagramId, f: F) -> DiagramResult<Self>
    where
        F: FnOnce(&Diagram) -> Diagram,
    {
        let diagram = self
            .diagrams
            .get(id)
            .ok_or_else(|| DiagramError::DiagramNotFound(id.to_string()))?;
        let updated = f(diagram);

        let mut next = self.clone();
        next.diagrams.insert(id.clone(), updated);
        Ok(next)
    }

    /// Resize the canvas, clamping each dimension to
    /// [`MIN_CANVAS_SIZE`]..=[`MAX_CANVAS_SIZE`].
    #[must_use]
    pub fn resize_canvas(&self, width: f32, height: f32) -> Self {
        let clamp = |v: f32| {
            if v.is_finite() {
                v.clamp(MIN_CANVAS_SIZE, MAX_CANVAS_SIZE)
            } else {
                DEFAULT_CANVAS_SIZE
            }
        };

        Self {
            size: Vec2::new(clamp(width), clamp(height)),
            ..self.clone()
        }
    }

    /// Change the canvas background color.
    ///
    /// # Errors
    ///
    /// Returns [`DiagramError::InvalidColor`] if `color` is not `#rgb` or `#rrggbb`.
    pub fn change_canvas_color(&self, color: &str) -> DiagramResult<Self> {
        let color = Color::parse(color)?;
        Ok(Self {
            color,
            ..self.clone()
        })
    }

    /// Apply an edit record.
    ///
    /// # Errors
    ///
    /// Returns an error if the target diagram is unknown or a color is invalid.
    pub fn apply(&self, action: &Action, lookup: &dyn AppearanceLookup) -> DiagramResult<Self> {
        tracing::debug!(action = action.kind(), "Applying action");

        match action {
            Action::ChangeItemsAppearance {
                diagram_id,
                item_ids,
                key,
                value,
                force,
            } => self.update_diagram(diagram_id, |diagram| {
                change_appearance(diagram, item_ids, key, value, *force, lookup)
            }),
            Action::TransformItems {
                diagram_id,
                item_ids,
                old_bounds,
                new_bounds,
            } => self.update_diagram(diagram_id, |diagram| {
                transform_items(diagram, item_ids, old_bounds, new_bounds)
            }),
            Action::ResizeCanvas { width, height } => Ok(self.resize_canvas(*width, *height)),
            Action::ChangeCanvasColor { color } => self.change_canvas_color(color),
        }
    }

    /// Serialize the state to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> DiagramResult<String> {
        serde_json::to_string(self).map_err(DiagramError::Serialization)
    }

    /// Deserialize a state from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a diagram breaks the tree invariant.
    pub fn from_json(json: &str) -> DiagramResult<Self> {
        serde_json::from_str(json).map_err(DiagramError::Serialization)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Appearance, Shape, Transform};

    fn no_renderers(_: &str) -> Option<Appearance> {
        None
    }

    #[test]
    fn test_resize_clamps() {
        let state = EditorState::new().resize_canvas(50.0, 5000.0);
        assert_eq!(state.size(), Vec2::new(MIN_CANVAS_SIZE, MAX_CANVAS_SIZE));
    }

    #[test]
    fn test_apply_color_action() {
        let state = EditorState::new();
        let next = state
            .apply(
                &Action::ChangeCanvasColor {
                    color: "#ABC".to_string(),
                },
                &no_renderers,
            )
            .expect("apply");

        assert_eq!(next.color().as_str(), "#aabbcc");
        assert_eq!(state.color(), &Color::white());
    }

    #[test]
    fn test_apply_to_unknown_diagram_fails() {
        let action = Action::transform_items(
            "missing".into(),
            vec![],
            Transform::default(),
            Transform::default(),
        );
        assert!(matches!(
            EditorState::new().apply(&action, &no_renderers),
            Err(DiagramError::DiagramNotFound(_))
        ));
    }

    #[test]
    fn test_ordered_diagrams_follow_insertion() {
        let state = EditorState::new()
            .add_diagram(Diagram::new("one".into()))
            .and_then(|s| s.add_diagram(Diagram::new("two".into())))
            .expect("add");

        let ids: Vec<&str> = state.ordered_diagrams().iter().map(|d| d.id().as_str()).collect();
        assert_eq!(ids, vec!["one", "two"]);

        let state = state.remove_diagram(&"one".into());
        assert_eq!(state.ordered_diagrams().len(), 1);
    }

    #[test]
    fn test_json_round_trip() {
        let diagram = Diagram::new("one".into())
            .add_item(None, Shape::new("a", "Button", Transform::default()))
            .expect("add");
        let state = EditorState::new().add_diagram(diagram).expect("add");

        let json = state.to_json().expect("serialize");
        let back = EditorState::from_json(&json).expect("deserialize");
        assert_eq!(back, state);
    }
}

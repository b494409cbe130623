//! Integration tests for editing a document through action records.

use serde_json::json;
use wireframe_core::appearance::keys;
use wireframe_core::{
    flatten, Action, Appearance, Diagram, DiagramError, DiagramId, DiagramItem, EditorState,
    ItemId, Rotation, Shape, Transform, Vec2,
};

// =============================================================================
// Helper Functions
// =============================================================================

/// Renderers known to these tests: only `Rectangle` declares the text key.
fn lookup(renderer: &str) -> Option<Appearance> {
    match renderer {
        "Rectangle" => Some(Appearance::from([(keys::TEXT.to_string(), json!(""))])),
        _ => None,
    }
}

fn id(value: &str) -> ItemId {
    ItemId::from(value)
}

fn square(item: &str, renderer: &str, x: f32) -> Shape {
    let t = Transform::new(Vec2::new(x, 50.0), Vec2::new(20.0, 20.0), Rotation::ZERO);
    Shape::new(item, renderer, t)
}

/// Editor with one diagram `d`: group `g` holding `a` and `b`, plus `c`.
fn editor() -> EditorState {
    let diagram = Diagram::new(DiagramId::from("d"))
        .add_item(None, square("a", "Rectangle", 50.0))
        .and_then(|d| d.add_item(None, square("b", "Rectangle", 150.0)))
        .and_then(|d| d.add_item(None, square("c", "Other", 250.0)))
        .and_then(|d| d.group_items("g", &[id("a"), id("b")]))
        .expect("diagram");

    EditorState::new().add_diagram(diagram).expect("add diagram")
}

fn shape_of<'a>(state: &'a EditorState, item: &str) -> &'a Shape {
    state
        .diagram(&DiagramId::from("d"))
        .and_then(|d| d.item(&id(item)))
        .and_then(DiagramItem::as_shape)
        .expect("shape")
}

// =============================================================================
// Action Tests
// =============================================================================

#[test]
fn test_scaling_group_bounds_scales_members() {
    let state = editor();
    let group_bounds = *state
        .diagram(&DiagramId::from("d"))
        .and_then(|d| d.item(&id("g")))
        .expect("group")
        .transform();
    assert!(group_bounds.approx_eq(
        &Transform::new(Vec2::new(100.0, 50.0), Vec2::new(120.0, 20.0), Rotation::ZERO),
        1e-4
    ));

    let wider = group_bounds.resize_to(Vec2::new(240.0, 40.0));
    let action = Action::transform_items(DiagramId::from("d"), vec![id("g")], group_bounds, wider);
    let next = state.apply(&action, &lookup).expect("apply");

    let a = shape_of(&next, "a").transform;
    let b = shape_of(&next, "b").transform;
    assert!(a.approx_eq(
        &Transform::new(Vec2::new(60.0, 60.0), Vec2::new(40.0, 40.0), Rotation::ZERO),
        1e-3
    ));
    assert!(b.approx_eq(
        &Transform::new(Vec2::new(260.0, 60.0), Vec2::new(40.0, 40.0), Rotation::ZERO),
        1e-3
    ));

    let untouched = shape_of(&next, "c").transform;
    assert_eq!(untouched, shape_of(&state, "c").transform);
}

#[test]
fn test_appearance_action_respects_declared_keys() {
    let state = editor();
    let action = Action::change_appearance(
        DiagramId::from("d"),
        vec![id("g"), id("c")],
        keys::TEXT,
        json!("Hello"),
        false,
    );

    let next = state.apply(&action, &lookup).expect("apply");

    assert_eq!(shape_of(&next, "a").appearance_str(keys::TEXT), Some("Hello"));
    assert_eq!(shape_of(&next, "b").appearance_str(keys::TEXT), Some("Hello"));
    assert_eq!(shape_of(&next, "c").appearance_str(keys::TEXT), None);
    assert_eq!(shape_of(&state, "a").appearance_str(keys::TEXT), None);
}

#[test]
fn test_actions_parse_from_json_records() {
    let records = json!([
        { "type": "items/appearance", "diagramId": "d", "itemIds": ["a", "c"], "key": "STROKE_COLOR", "value": "#333333", "force": true },
        { "type": "editor/size", "width": 50.0, "height": 5000.0 },
        { "type": "editor/color", "color": "#ABC" }
    ]);
    let actions: Vec<Action> = serde_json::from_value(records).expect("parse actions");

    let next = actions
        .iter()
        .try_fold(editor(), |state, action| state.apply(action, &lookup))
        .expect("apply all");

    assert_eq!(shape_of(&next, "a").appearance_str("STROKE_COLOR"), Some("#333333"));
    assert_eq!(shape_of(&next, "c").appearance_str("STROKE_COLOR"), None);
    assert_eq!(next.size(), Vec2::new(100.0, 3000.0));
    assert_eq!(next.color().as_str(), "#aabbcc");
}

#[test]
fn test_action_on_missing_diagram_fails() {
    let action = Action::change_appearance(
        DiagramId::from("missing"),
        vec![id("a")],
        keys::TEXT,
        json!("x"),
        true,
    );

    let result = editor().apply(&action, &lookup);
    assert!(matches!(result, Err(DiagramError::DiagramNotFound(_))));
}

// =============================================================================
// Persistence Tests
// =============================================================================

#[test]
fn test_document_survives_json_round_trip() {
    let state = editor()
        .change_canvas_color("#202020")
        .expect("color")
        .resize_canvas(800.0, 600.0);

    let json = state.to_json().expect("serialize");
    let restored = EditorState::from_json(&json).expect("deserialize");

    assert_eq!(restored.size(), state.size());
    assert_eq!(restored.color(), state.color());

    let id = DiagramId::from("d");
    let before = state.diagram(&id).expect("diagram");
    let after = restored.diagram(&id).expect("diagram");
    assert_eq!(before, after);
    assert_eq!(flatten(before), flatten(after));
}

#[test]
fn test_loading_cyclic_document_fails() {
    let transform = json!({ "position": { "x": 0.0, "y": 0.0 }, "size": { "x": 1.0, "y": 1.0 } });
    let json = json!({
        "id": "d",
        "items": {
            "g": { "type": "Group", "id": "g", "transform": transform, "child_ids": ["h"] },
            "h": { "type": "Group", "id": "h", "transform": transform, "child_ids": ["g"] }
        },
        "root": ["g"]
    });

    let result = serde_json::from_value::<Diagram>(json);
    assert!(result.is_err());
}

#[test]
fn test_loading_acyclic_document_succeeds() {
    let transform = json!({ "position": { "x": 0.0, "y": 0.0 }, "size": { "x": 1.0, "y": 1.0 } });
    let json = json!({
        "id": "d",
        "items": {
            "g": { "type": "Group", "id": "g", "transform": transform, "child_ids": ["a"] },
            "a": { "type": "Shape", "id": "a", "renderer": "Rectangle", "transform": transform }
        },
        "root": ["g"]
    });

    let diagram: Diagram = serde_json::from_value(json).expect("valid document");
    let ids: Vec<ItemId> = flatten(&diagram).iter().map(|s| s.id.clone()).collect();
    assert_eq!(ids, vec![id("a")]);
}

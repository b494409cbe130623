//! Integration tests for page export.

use serde_json::json;
use wireframe_core::appearance::keys;
use wireframe_core::{Diagram, DiagramId, EditorState, Rotation, Shape, Transform, Vec2};
use wireframe_renderer::{
    register_default_shapes, ExportConfig, PageExporter, RenderError, RendererService, TextMetrics,
};

// =============================================================================
// Helper Functions
// =============================================================================

/// Registry with the built-in shapes.
fn registry() -> RendererService {
    let mut registry = RendererService::new();
    register_default_shapes(&mut registry);
    registry
}

/// Diagram with one shape per `(id, renderer)` pair.
fn diagram(id: &str, shapes: &[(&str, &str)]) -> Diagram {
    let t = Transform::new(Vec2::new(100.0, 100.0), Vec2::new(80.0, 40.0), Rotation::ZERO);
    shapes
        .iter()
        .try_fold(Diagram::new(DiagramId::from(id)), |d, (item, renderer)| {
            d.add_item(None, Shape::new(*item, *renderer, t))
        })
        .expect("diagram")
}

// =============================================================================
// Page Tests
// =============================================================================

#[test]
fn test_one_page_per_diagram_in_order() {
    let registry = registry();
    let first = diagram("first", &[("a", "Rectangle")]);
    let second = diagram("second", &[("b", "Button"), ("c", "Label")]);

    let pages = PageExporter::with_defaults()
        .render_pages([&first, &second], &registry)
        .expect("export");

    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].index, 0);
    assert_eq!(pages[0].diagram_id, DiagramId::from("first"));
    assert_eq!(pages[0].drawn, 1);
    assert_eq!(pages[1].index, 1);
    assert_eq!(pages[1].diagram_id, DiagramId::from("second"));
    assert_eq!(pages[1].drawn, 2);
}

#[test]
fn test_page_is_standalone_svg_with_offset_group() {
    let registry = registry();
    let page = PageExporter::with_defaults()
        .render_page(0, &diagram("d", &[("a", "Rectangle")]), &registry)
        .expect("export");

    assert!(page.svg.starts_with("<svg"));
    assert!(page.svg.ends_with("</svg>"));
    assert!(page.svg.contains("width=\"1000\""));
    assert!(page.svg.contains("translate(0.5 0.5)"));
}

#[test]
fn test_page_uses_editor_size_and_color() {
    let registry = registry();
    let state = EditorState::new()
        .resize_canvas(640.0, 480.0)
        .change_canvas_color("#123456")
        .expect("color");

    let exporter = PageExporter::new(ExportConfig::from_editor(&state));
    let page = exporter
        .render_page(0, &diagram("d", &[]), &registry)
        .expect("export");

    assert!(page.svg.contains("width=\"640\""));
    assert!(page.svg.contains("height=\"480\""));
    assert!(page.svg.contains("fill=\"#123456\""));
    assert_eq!(page.drawn, 0);
}

#[test]
fn test_unknown_renderer_is_counted_not_fatal() {
    let registry = registry();
    let d = diagram("d", &[("a", "Rectangle"), ("x", "Nope")]);

    let pages = PageExporter::with_defaults()
        .render_pages([&d], &registry)
        .expect("export");

    assert_eq!(pages[0].drawn, 1);
    assert_eq!(pages[0].skipped_unregistered, 1);
}

#[test]
fn test_no_diagrams_gives_no_pages() {
    let pages = PageExporter::with_defaults()
        .render_pages(std::iter::empty(), &registry())
        .expect("export");
    assert!(pages.is_empty());
}

#[test]
fn test_invalid_page_size_is_rejected() {
    let registry = registry();
    let d = diagram("d", &[("a", "Rectangle")]);

    for (w, h) in [(0.0, 100.0), (100.0, -1.0), (f32::NAN, 100.0)] {
        let exporter = PageExporter::new(ExportConfig::default().with_page_size(w, h));
        let result = exporter.render_pages([&d], &registry);
        assert!(
            matches!(result, Err(RenderError::InvalidPageSize(_))),
            "{w}x{h} should be rejected"
        );
    }
}

#[test]
fn test_title_is_carried_to_page() {
    let registry = registry();
    let d = diagram("d", &[]).with_title(Some("Login".to_string()));

    let page = PageExporter::with_defaults()
        .render_page(3, &d, &registry)
        .expect("export");

    assert_eq!(page.index, 3);
    assert_eq!(page.title.as_deref(), Some("Login"));
}

/// Diagram with a single label showing `text`.
fn label(text: &str) -> Diagram {
    let t = Transform::new(Vec2::new(100.0, 40.0), Vec2::new(180.0, 40.0), Rotation::ZERO);
    let shape = Shape::new("l", "Label", t).with_appearance(keys::TEXT, json!(text));
    Diagram::new(DiagramId::from("d"))
        .add_item(None, shape)
        .expect("diagram")
}

#[test]
fn test_page_text_uses_measuring_font() {
    // Machines without installed fonts have nothing to compare against.
    let Some(metrics) = TextMetrics::system("sans-serif") else {
        return;
    };
    let family = metrics.font().expect("font").family().to_string();

    let page = PageExporter::with_defaults()
        .with_metrics(metrics)
        .render_page(0, &label("Hello"), &registry())
        .expect("export");

    assert!(page.svg.contains(&format!("font-family=\"{family}\"")));
}

#[cfg(feature = "export")]
#[test]
fn test_page_rasterizes_to_png() {
    let registry = registry();
    let exporter = PageExporter::new(ExportConfig::default().with_page_size(64.0, 32.0));
    let page = exporter
        .render_page(0, &diagram("d", &[("a", "Rectangle")]), &registry)
        .expect("export");

    let png = exporter.to_png(&page).expect("png");
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
}

#[cfg(feature = "export")]
#[test]
fn test_rasterized_page_draws_text() {
    let Some(metrics) = TextMetrics::system("sans-serif") else {
        return;
    };
    let registry = registry();
    let exporter = PageExporter::new(ExportConfig::default().with_page_size(200.0, 80.0))
        .with_metrics(metrics);

    let render = |text: &str| {
        let page = exporter.render_page(0, &label(text), &registry).expect("export");
        exporter.to_png(&page).expect("png")
    };

    assert_ne!(render("HELLO WORLD"), render(""));
}

use serde_json::json;
use wireframe_core::appearance::keys;
use wireframe_core::{Appearance, Vec2};

use super::{draw_text, DEFAULT_FONT_FAMILY};
use crate::configurable::{Configurable, ConfigurableFactory};
use crate::plugin::{RenderContext, ShapePlugin};

/// Plain box with optional centered text.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rectangle;

impl ShapePlugin for Rectangle {
    fn identifier(&self) -> &str {
        "Rectangle"
    }

    fn default_appearance(&self) -> Appearance {
        Appearance::from([
            (keys::BACKGROUND_COLOR.to_string(), json!("#ffffff")),
            (keys::FOREGROUND_COLOR.to_string(), json!("#000000")),
            (keys::STROKE_COLOR.to_string(), json!("#333333")),
            (keys::STROKE_THICKNESS.to_string(), json!(1)),
            (keys::TEXT.to_string(), json!("")),
            (keys::TEXT_ALIGNMENT.to_string(), json!("center")),
            (keys::FONT_SIZE.to_string(), json!(14)),
            (keys::FONT_FAMILY.to_string(), json!(DEFAULT_FONT_FAMILY)),
        ])
    }

    fn default_size(&self) -> Vec2 {
        Vec2::new(100.0, 60.0)
    }

    fn configurables(&self, factory: &ConfigurableFactory) -> Vec<Configurable> {
        vec![
            factory.color(keys::BACKGROUND_COLOR, "Background"),
            factory.color(keys::STROKE_COLOR, "Border"),
            factory.slider(keys::STROKE_THICKNESS, "Border Width", 0.0, 10.0),
            factory.text(keys::TEXT, "Text"),
            factory.selection(keys::TEXT_ALIGNMENT, "Alignment", &["left", "center", "right"]),
        ]
    }

    fn render(&self, ctx: &mut RenderContext<'_>) {
        let rect = ctx.rect();
        let fill = ctx.color_value(keys::BACKGROUND_COLOR, "#ffffff");
        let stroke = ctx.color_value(keys::STROKE_COLOR, "#333333");
        let thickness = ctx.f32_value(keys::STROKE_THICKNESS, 1.0);

        ctx.rectangle(rect, 0.0)
            .fill(&fill)
            .stroke(&stroke, thickness);

        let inset = thickness.max(0.0) + 4.0;
        draw_text(ctx, rect.deflate(inset, inset));
    }
}
